//! Immutable predicate tree compiled to `$n`-parameterized SQL.
//!
//! Caller text only ever reaches the database through the bind list. Column
//! names and sub-select heads are `&'static str` so they cannot carry input.

use super::bind::{push_bigint_array, push_text, push_text_array};
use super::BindValue;

/// `ESCAPE` clause paired with patterns built by `escape_like_pattern`.
const LIKE_ESCAPE: &str = "ESCAPE E'\\\\'";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `col ILIKE $a OR col ILIKE $b ...`, or the `NOT ILIKE ... AND ...`
    /// conjunction when negated. Patterns must already be LIKE-escaped.
    Like {
        column: &'static str,
        patterns: Vec<String>,
        negated: bool,
    },
    /// `col = ANY($n)` / `col <> ALL($n)` over a bound `text[]`.
    AnyOf {
        column: &'static str,
        values: Vec<String>,
        negated: bool,
    },
    /// `col = ANY($n::bigint[])`. An empty id list matches nothing.
    IdIn { column: &'static str, ids: Vec<i64> },
    /// `col [NOT] IN (<select> UNION <select> ...)`.
    Membership {
        column: &'static str,
        selects: Vec<SubSelect>,
        negated: bool,
    },
    /// Full-text match where any term matches as a word prefix:
    /// `'t1':* | 't2':* ...` built in SQL from a bound `text[]`. No terms
    /// matches nothing.
    PrefixMatch {
        column: &'static str,
        terms: Vec<String>,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

/// One branch of a membership sub-query: a fixed projection plus an optional filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubSelect {
    /// `SELECT <id> FROM <relation>` head.
    pub head: &'static str,
    pub filter: Option<Predicate>,
}

impl SubSelect {
    pub fn new(head: &'static str, filter: Option<Predicate>) -> Self {
        Self { head, filter }
    }
}

impl Predicate {
    /// Compile into SQL text, pushing every value onto `bind_params`.
    ///
    /// Returns `None` when the predicate constrains nothing (no values, or
    /// only empty children). Fragments with two or more parts come back
    /// parenthesized.
    pub fn compile(&self, bind_params: &mut Vec<BindValue>) -> Option<String> {
        match self {
            Predicate::Like {
                column,
                patterns,
                negated,
            } => {
                let (op, joiner) = if *negated {
                    ("NOT ILIKE", " AND ")
                } else {
                    ("ILIKE", " OR ")
                };
                let parts: Vec<String> = patterns
                    .iter()
                    .map(|p| {
                        let idx = push_text(bind_params, p.clone());
                        format!("{} {} ${} {}", column, op, idx, LIKE_ESCAPE)
                    })
                    .collect();
                join_parts(parts, joiner)
            }

            Predicate::AnyOf {
                column,
                values,
                negated,
            } => {
                if values.is_empty() {
                    return None;
                }
                let idx = push_text_array(bind_params, values.clone());
                if *negated {
                    Some(format!("{} <> ALL(${}::text[])", column, idx))
                } else {
                    Some(format!("{} = ANY(${}::text[])", column, idx))
                }
            }

            Predicate::IdIn { column, ids } => {
                let idx = push_bigint_array(bind_params, ids.clone());
                Some(format!("{} = ANY(${}::bigint[])", column, idx))
            }

            Predicate::Membership {
                column,
                selects,
                negated,
            } => {
                if selects.is_empty() {
                    return None;
                }
                let branches: Vec<String> = selects
                    .iter()
                    .map(|s| match s.filter.as_ref().and_then(|f| f.compile(bind_params)) {
                        Some(clause) => format!("{} WHERE {}", s.head, clause),
                        None => s.head.to_string(),
                    })
                    .collect();
                let op = if *negated { "NOT IN" } else { "IN" };
                Some(format!("{} {} ({})", column, op, branches.join(" UNION ")))
            }

            Predicate::PrefixMatch { column, terms } => {
                if terms.is_empty() {
                    return Some("FALSE".to_string());
                }
                let idx = push_text_array(bind_params, terms.clone());
                Some(format!(
                    "to_tsvector('simple', {}) @@ to_tsquery('simple', array_to_string(\
                     ARRAY(SELECT quote_literal(t) || ':*' FROM unnest(${}::text[]) AS t), ' | '))",
                    column, idx
                ))
            }

            Predicate::And(children) => {
                let parts: Vec<String> = children
                    .iter()
                    .filter_map(|c| c.compile(bind_params))
                    .collect();
                join_parts(parts, " AND ")
            }

            Predicate::Or(children) => {
                let parts: Vec<String> = children
                    .iter()
                    .filter_map(|c| c.compile(bind_params))
                    .collect();
                join_parts(parts, " OR ")
            }
        }
    }
}

fn join_parts(mut parts: Vec<String>, joiner: &str) -> Option<String> {
    if parts.is_empty() {
        None
    } else if parts.len() == 1 {
        Some(parts.remove(0))
    } else {
        Some(format!("({})", parts.join(joiner)))
    }
}

/// Running WHERE clause: the first fragment gets `WHERE`, every later one `AND`.
#[derive(Debug, Clone, Default)]
pub struct WhereTree {
    sql: String,
    needs_and: bool,
}

impl WhereTree {
    pub fn push(&mut self, fragment: &str) {
        if self.needs_and {
            self.sql.push_str(" AND ");
        } else {
            self.sql.push_str(" WHERE ");
        }
        self.sql.push_str(fragment);
        self.needs_and = true;
    }

    pub fn is_empty(&self) -> bool {
        !self.needs_and
    }

    pub fn into_sql(self) -> String {
        self.sql
    }
}
