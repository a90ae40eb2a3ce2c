//! Completeness rules for the p-adic field table
//!
//! The table is exhaustive for every degree up to 15 over any p. Above
//! that, coverage is patchy and tied to specific degrees: degree 16 is
//! enumerated for p = 2 and 3 only, and degree 18 for primes up to 7.
//! A filler derives the degree from ramification index and residue
//! degree (n = e * f), so searches phrased in terms of e and f still
//! reach the degree rules.

use crate::fill::Filler;
use crate::integerset::IntegerSet;
use crate::numberset::NumberSet;
use crate::predicate::ColTest;
use crate::query::Constant;
use crate::registry::Registry;
use crate::rule::Rule;

const TABLE: &str = "lf_fields";

pub(super) fn register(registry: &mut Registry) {
    registry
        .add_filler(TABLE, Filler::product("n", "e", "f"))
        .register(
            TABLE,
            Rule::new(&["n"], ColTest::Bound(vec![NumberSet::at_most(15.0)]))
                .with_reason("all local fields of degree up to 15"),
        )
        .register(
            TABLE,
            Rule::new(
                &["n", "p"],
                ColTest::CBound {
                    prefix: vec![Constant::Int(16)],
                    bound: NumberSet::closed(2.0, 3.0),
                },
            )
            .with_reason("all 2-adic and 3-adic fields of degree 16"),
        )
        .register(
            TABLE,
            Rule::new(
                &["n", "p"],
                ColTest::CPrimeBound {
                    prefix: vec![Constant::Int(18)],
                    bound: IntegerSet::closed(2, 7),
                },
            )
            .with_reason("all p-adic fields of degree 18 for p up to 7"),
        );
}

#[cfg(test)]
mod tests {
    use crate::checker::{CompletenessChecker, TableStats};
    use crate::query::Query;
    use serde_json::json;
    use std::collections::BTreeMap;

    struct NoNulls;

    impl TableStats for NoNulls {
        fn exists(&self, _query: &Query) -> bool {
            true
        }
        fn null_counts(&self) -> BTreeMap<String, u64> {
            BTreeMap::new()
        }
    }

    fn check(query: serde_json::Value) -> bool {
        CompletenessChecker::builtin()
            .check_json("lf_fields", &query, &NoNulls)
            .unwrap()
            .complete
    }

    #[test]
    fn test_low_degree_any_prime() {
        assert!(check(json!({"n": {"$lte": 15}})));
        assert!(check(json!({"n": 12, "p": 101})));
        assert!(!check(json!({"n": {"$lte": 17}})));
    }

    #[test]
    fn test_degree_from_ramification_filler() {
        assert!(check(json!({"e": 3, "f": 5})), "n = 15 is derived");
        assert!(!check(json!({"e": 4, "f": 5})), "n = 20 has no rule");
    }

    #[test]
    fn test_degree_16_small_primes_only() {
        assert!(check(json!({"n": 16, "p": 2})));
        assert!(check(json!({"n": 16, "p": {"$lte": 3, "$gte": 2}})));
        assert!(!check(json!({"n": 16, "p": 5})));
        assert!(!check(json!({"n": {"$lte": 16}, "p": 2})), "prefix must be exact");
    }

    #[test]
    fn test_degree_18_prime_bound() {
        assert!(check(json!({"n": 18, "p": {"$in": [2, 5, 7]}})));
        assert!(!check(json!({"n": 18, "p": 11})));
        assert!(!check(json!({"n": 18, "p": 6})), "6 is not prime");
    }
}
