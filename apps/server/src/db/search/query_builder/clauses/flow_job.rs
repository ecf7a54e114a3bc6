use super::super::predicate::Predicate;
use super::{facet_clause, FacetMatch};
use crate::db::search::filter_spec::FacetValues;

pub(in crate::db::search::query_builder) fn appcode_clause(appcode: &FacetValues) -> Option<Predicate> {
    facet_clause("a.app_code", appcode, FacetMatch::Exact)
}

pub(in crate::db::search::query_builder) fn flow_clause(flow: &FacetValues) -> Option<Predicate> {
    facet_clause("f.flow_name", flow, FacetMatch::Substring)
}

pub(in crate::db::search::query_builder) fn job_clause(job: &FacetValues) -> Option<Predicate> {
    facet_clause("j.job_name", job, FacetMatch::Substring)
}
