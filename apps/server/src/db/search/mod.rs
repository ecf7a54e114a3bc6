//! Faceted search over catalog datasets and flow/job pairs

pub mod engine;
pub(crate) mod escape;
pub mod filter_spec;
pub mod query_builder;

pub use engine::SearchEngine;
pub use filter_spec::{DatasetFilter, FlowJobFilter, PageRequest, PageWindow};
