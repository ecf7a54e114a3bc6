use super::super::predicate::{Predicate, SubSelect};
use crate::db::search::escape::text_search_terms;

/// Datasets whose own comments or field comments contain a word starting
/// with any word of the free text.
pub(in crate::db::search::query_builder) fn comment_match_clause(text: &str) -> Predicate {
    let terms = text_search_terms(text);
    Predicate::Membership {
        column: "d.id",
        selects: vec![
            SubSelect::new(
                "SELECT c.dataset_id FROM comments c",
                Some(Predicate::PrefixMatch {
                    column: "c.text",
                    terms: terms.clone(),
                }),
            ),
            SubSelect::new(
                "SELECT dfc.dataset_id FROM dict_dataset_field_comment dfc \
                 JOIN field_comments fc ON fc.id = dfc.comment_id",
                Some(Predicate::PrefixMatch {
                    column: "fc.comment",
                    terms,
                }),
            ),
        ],
        negated: false,
    }
}
