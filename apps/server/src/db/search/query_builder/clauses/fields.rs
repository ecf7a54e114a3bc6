//! Field-name facets: `any`, `all` and `not`.

use super::super::bind::{push_bigint, push_text_array};
use super::super::predicate::{Predicate, SubSelect};
use super::super::BindValue;
use crate::db::search::escape::contains_pattern;

const FIELD_DATASETS: &str = "SELECT f.dataset_id FROM dict_field_detail f";

fn field_name_matches(terms: &[String]) -> Predicate {
    Predicate::Like {
        column: "f.field_name",
        patterns: terms.iter().map(|t| contains_pattern(t)).collect(),
        negated: false,
    }
}

/// Datasets having at least one field that matches any term.
pub(in crate::db::search::query_builder) fn field_any_clause(terms: &[String]) -> Option<Predicate> {
    if terms.is_empty() {
        return None;
    }
    Some(Predicate::Membership {
        column: "d.id",
        selects: vec![SubSelect::new(FIELD_DATASETS, Some(field_name_matches(terms)))],
        negated: false,
    })
}

/// Datasets with no field matching any term.
pub(in crate::db::search::query_builder) fn field_not_clause(terms: &[String]) -> Option<Predicate> {
    if terms.is_empty() {
        return None;
    }
    Some(Predicate::Membership {
        column: "d.id",
        selects: vec![SubSelect::new(FIELD_DATASETS, Some(field_name_matches(terms)))],
        negated: true,
    })
}

/// Datasets where every term matches at least one of their fields.
///
/// Computed once as a materialized CTE: field rows are joined against the
/// numbered term list, grouped per dataset, and kept only when every term
/// ordinal was hit. An empty intersection leaves the CTE empty, so the
/// membership clause matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldConjunction {
    terms: Vec<String>,
}

impl FieldConjunction {
    pub const CTE_NAME: &'static str = "all_fields";

    pub fn new(terms: &[String]) -> Option<Self> {
        if terms.is_empty() {
            return None;
        }
        Some(Self {
            terms: terms.to_vec(),
        })
    }

    pub(in crate::db::search::query_builder) fn compile_cte(
        &self,
        bind_params: &mut Vec<BindValue>,
    ) -> String {
        let patterns: Vec<String> = self.terms.iter().map(|t| contains_pattern(t)).collect();
        let patterns_idx = push_text_array(bind_params, patterns);
        let count_idx = push_bigint(bind_params, self.terms.len() as i64);
        format!(
            "WITH {} AS MATERIALIZED (\
             SELECT fa.dataset_id FROM dict_field_detail fa \
             JOIN unnest(${}::text[]) WITH ORDINALITY AS t(pattern, ord) \
             ON fa.field_name ILIKE t.pattern ESCAPE E'\\\\' \
             GROUP BY fa.dataset_id \
             HAVING COUNT(DISTINCT t.ord) = ${}) ",
            Self::CTE_NAME,
            patterns_idx,
            count_idx
        )
    }

    pub(in crate::db::search::query_builder) fn membership(&self) -> Predicate {
        Predicate::Membership {
            column: "d.id",
            selects: vec![SubSelect::new("SELECT dataset_id FROM all_fields", None)],
            negated: false,
        }
    }
}
