use super::super::predicate::Predicate;
use super::{facet_clause, FacetMatch};
use crate::db::search::filter_spec::FacetValues;

pub(in crate::db::search::query_builder) fn scope_clause(scope: &FacetValues) -> Option<Predicate> {
    facet_clause("d.parent_name", scope, FacetMatch::Exact)
}

pub(in crate::db::search::query_builder) fn table_clause(table: &FacetValues) -> Option<Predicate> {
    facet_clause("d.name", table, FacetMatch::Substring)
}

pub(in crate::db::search::query_builder) fn sources_clause(sources: &[String]) -> Option<Predicate> {
    if sources.is_empty() {
        return None;
    }
    Some(Predicate::AnyOf {
        column: "d.source",
        values: sources.to_vec(),
        negated: false,
    })
}
