//! Facet clause builders.
//!
//! Each builder turns one normalized facet into a predicate, or `None` when
//! the facet is empty.

mod dataset;
mod fields;
mod flow_job;
mod fulltext;

pub(in crate::db::search::query_builder) use dataset::{scope_clause, sources_clause, table_clause};
pub(in crate::db::search::query_builder) use fields::{
    field_any_clause, field_not_clause, FieldConjunction,
};
pub(in crate::db::search::query_builder) use flow_job::{appcode_clause, flow_clause, job_clause};
pub(in crate::db::search::query_builder) use fulltext::comment_match_clause;

use super::predicate::Predicate;
use crate::db::search::escape::contains_pattern;
use crate::db::search::filter_spec::FacetValues;

/// How a facet's values are compared against its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FacetMatch {
    /// Case-insensitive substring (`ILIKE '%v%'`).
    Substring,
    /// Exact membership (`= ANY` / `<> ALL`).
    Exact,
}

fn facet_clause(column: &'static str, facet: &FacetValues, mode: FacetMatch) -> Option<Predicate> {
    let side = |values: &[String], negated: bool| -> Option<Predicate> {
        if values.is_empty() {
            return None;
        }
        Some(match mode {
            FacetMatch::Substring => Predicate::Like {
                column,
                patterns: values.iter().map(|v| contains_pattern(v)).collect(),
                negated,
            },
            FacetMatch::Exact => Predicate::AnyOf {
                column,
                values: values.to_vec(),
                negated,
            },
        })
    };

    let parts: Vec<Predicate> = [side(&facet.include, false), side(&facet.exclude, true)]
        .into_iter()
        .flatten()
        .collect();

    match parts.len() {
        0 => None,
        1 => parts.into_iter().next(),
        _ => Some(Predicate::And(parts)),
    }
}
