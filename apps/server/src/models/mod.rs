//! Domain models for catalog search results

pub mod catalog;
pub mod page;

pub use catalog::{Dataset, FlowJob, FlowJobRow};
pub use page::ResultPage;
