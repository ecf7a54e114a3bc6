//! Declarative ORDER BY specifications.
//!
//! A ranking is an ordered list of keys. Tiered keys become a `CASE` whose
//! conditions are ordinary predicates, so their patterns are bound like any
//! other value. Only the tier numbers are written into the SQL text.

use super::predicate::Predicate;
use super::BindValue;
use crate::config::{NamespaceTier, SearchConfig};
use crate::db::search::escape::{
    contains_pattern, escape_like_pattern, prefix_pattern, suffix_pattern,
};

const NAME_EXACT_TIER: i32 = 0;
const NAME_PREFIX_TIER: i32 = 2;
const NAME_SUFFIX_TIER: i32 = 3;
const NAME_SUBSTRING_TIER: i32 = 4;
const NAME_FALLBACK_TIER: i32 = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tier {
    pub condition: Predicate,
    pub rank: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderKey {
    /// `CASE WHEN <tier> THEN <rank> ... ELSE <fallback> END`, ascending.
    Tiered { tiers: Vec<Tier>, fallback: i32 },
    /// Plain ascending column.
    Column(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSpec {
    keys: Vec<OrderKey>,
}

impl OrderSpec {
    pub fn new(keys: Vec<OrderKey>) -> Self {
        Self { keys }
    }

    pub fn columns(columns: &[&'static str]) -> Self {
        Self {
            keys: columns.iter().map(|c| OrderKey::Column(*c)).collect(),
        }
    }

    pub fn compile(&self, bind_params: &mut Vec<BindValue>) -> Option<String> {
        let items: Vec<String> = self
            .keys
            .iter()
            .filter_map(|key| match key {
                OrderKey::Column(column) => Some(column.to_string()),
                OrderKey::Tiered { tiers, fallback } => {
                    let mut arms = Vec::new();
                    for tier in tiers {
                        if let Some(cond) = tier.condition.compile(bind_params) {
                            arms.push(format!("WHEN {} THEN {}", cond, tier.rank));
                        }
                    }
                    if arms.is_empty() {
                        return None;
                    }
                    Some(format!("CASE {} ELSE {} END", arms.join(" "), fallback))
                }
            })
            .collect();

        if items.is_empty() {
            None
        } else {
            Some(items.join(", "))
        }
    }
}

/// Dataset ranking: name relevance, then URN namespace, then a stable tiebreak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingPolicy {
    namespaces: Vec<NamespaceTier>,
    fallback_tier: i32,
}

impl RankingPolicy {
    pub fn new(namespaces: Vec<NamespaceTier>, fallback_tier: i32) -> Self {
        Self {
            namespaces,
            fallback_tier,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(
            config.namespace_priority.clone(),
            config.fallback_namespace_tier,
        )
    }

    /// Ordering for structured dataset results. Name tiers apply only when
    /// `name_terms` is non-empty.
    pub fn for_datasets(&self, name_terms: &[String]) -> OrderSpec {
        let mut keys = Vec::new();
        if !name_terms.is_empty() {
            keys.push(name_tiers(name_terms));
        }
        if let Some(key) = self.namespace_key() {
            keys.push(key);
        }
        keys.push(OrderKey::Column("d.urn"));
        keys.push(OrderKey::Column("d.id"));
        OrderSpec::new(keys)
    }

    /// Ordering for comment-only matches.
    pub fn for_fulltext(&self) -> OrderSpec {
        OrderSpec::columns(&["d.name", "d.id"])
    }

    fn namespace_key(&self) -> Option<OrderKey> {
        if self.namespaces.is_empty() {
            return None;
        }
        let tiers = self
            .namespaces
            .iter()
            .map(|ns| Tier {
                condition: Predicate::Like {
                    column: "d.urn",
                    patterns: vec![prefix_pattern(&ns.prefix)],
                    negated: false,
                },
                rank: ns.tier,
            })
            .collect();
        Some(OrderKey::Tiered {
            tiers,
            fallback: self.fallback_tier,
        })
    }
}

fn name_tiers(terms: &[String]) -> OrderKey {
    let tier = |rank: i32, pattern: fn(&str) -> String| Tier {
        condition: Predicate::Like {
            column: "d.name",
            patterns: terms.iter().map(|t| pattern(t)).collect(),
            negated: false,
        },
        rank,
    };
    OrderKey::Tiered {
        tiers: vec![
            tier(NAME_EXACT_TIER, escape_like_pattern),
            tier(NAME_PREFIX_TIER, prefix_pattern),
            tier(NAME_SUFFIX_TIER, suffix_pattern),
            tier(NAME_SUBSTRING_TIER, contains_pattern),
        ],
        fallback: NAME_FALLBACK_TIER,
    }
}
