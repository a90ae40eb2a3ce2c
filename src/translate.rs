//! Query condition to number-set translation
//!
//! Structural recursion from a field [`Condition`] to the
//! [`NumberSet`] of values it admits. Non-numeric constants are an
//! error here (string-valued columns are compared exactly by the
//! predicates, never through sets). `$mod` deliberately translates to
//! the whole line: a congruence class has no interval representation,
//! and an over-wide set can only turn "complete" into "not complete",
//! never the reverse.

use crate::error::{Error, Result};
use crate::integerset::IntegerSet;
use crate::numberset::NumberSet;
use crate::query::{Condition, Constant, OpCond};

/// The set of values a condition admits, over the reals
pub fn to_number_set(cond: &Condition) -> Result<NumberSet> {
    match cond {
        Condition::Literal(c) => Ok(NumberSet::point(numeric(c)?)),
        Condition::Ops(ops) => {
            let mut set = NumberSet::reals();
            for op in ops.values() {
                set = set.intersection(&op_set(op)?);
            }
            Ok(set)
        }
        Condition::Set(set) => Ok(set.as_set().clone()),
    }
}

/// The set of integer values a condition admits
pub fn to_integer_set(cond: &Condition) -> Result<IntegerSet> {
    Ok(IntegerSet::from_set(to_number_set(cond)?))
}

fn op_set(op: &OpCond) -> Result<NumberSet> {
    match op {
        OpCond::Lte(c) => Ok(NumberSet::at_most(numeric(c)?)),
        OpCond::Lt(c) => Ok(NumberSet::less_than(numeric(c)?)),
        OpCond::Gte(c) => Ok(NumberSet::at_least(numeric(c)?)),
        OpCond::Gt(c) => Ok(NumberSet::greater_than(numeric(c)?)),
        OpCond::Ne(c) => Ok(NumberSet::point(numeric(c)?).complement()),
        OpCond::In(items) => Ok(NumberSet::points(numerics(items)?)),
        OpCond::Nin(items) => Ok(NumberSet::points(numerics(items)?).complement()),
        OpCond::Not(inner) => Ok(to_number_set(inner)?.complement()),
        OpCond::Mod(_, _) => Ok(NumberSet::reals()),
    }
}

fn numeric(c: &Constant) -> Result<f64> {
    c.as_number()
        .ok_or_else(|| Error::NonNumeric(c.to_string()))
}

fn numerics(items: &[Constant]) -> Result<Vec<f64>> {
    items.iter().map(numeric).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Query;
    use serde_json::json;

    fn cond(value: serde_json::Value) -> Condition {
        let q = Query::parse(&json!({ "f": value })).unwrap();
        q.fields["f"].clone()
    }

    #[test]
    fn test_scalar_is_point() {
        let s = to_number_set(&cond(json!(7))).unwrap();
        assert!(s.contains(7.0));
        assert!(!s.contains(7.5));
    }

    #[test]
    fn test_range_ops_intersect() {
        let s = to_number_set(&cond(json!({"$gte": 2, "$lt": 5}))).unwrap();
        assert!(s.contains(2.0));
        assert!(s.contains(4.999));
        assert!(!s.contains(5.0));
        assert!(!s.contains(1.0));
    }

    #[test]
    fn test_in_nin() {
        let s = to_number_set(&cond(json!({"$in": [2, 3, 5]}))).unwrap();
        assert!(s.contains(3.0));
        assert!(!s.contains(4.0));

        let s = to_number_set(&cond(json!({"$nin": [2, 3]}))).unwrap();
        assert!(!s.contains(2.0));
        assert!(s.contains(4.0));
    }

    #[test]
    fn test_ne_and_not() {
        let s = to_number_set(&cond(json!({"$ne": 0}))).unwrap();
        assert!(!s.contains(0.0));
        assert!(s.contains(0.001));

        let s = to_number_set(&cond(json!({"$not": {"$gt": 10}}))).unwrap();
        assert!(s.contains(10.0));
        assert!(!s.contains(10.5));
    }

    #[test]
    fn test_mod_is_unconstrained() {
        let s = to_number_set(&cond(json!({"$mod": [1, 4]}))).unwrap();
        assert!(!s.restricted(), "$mod must degrade to the whole line");
    }

    #[test]
    fn test_non_numeric_is_error() {
        assert!(to_number_set(&cond(json!("2.0.3.1"))).is_err());
        assert!(to_number_set(&cond(json!({"$lte": "x"}))).is_err());
    }

    #[test]
    fn test_integer_translation_snaps() {
        let s = to_integer_set(&cond(json!({"$gt": 1, "$lt": 5}))).unwrap();
        assert_eq!(s.min(), Some(2));
        assert_eq!(s.max(), Some(4));
    }
}
