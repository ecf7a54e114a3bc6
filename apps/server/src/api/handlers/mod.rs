//! Request handlers

pub mod lookups;
pub mod metrics;
pub mod search;
