//! Route definitions

pub mod advsearch;
