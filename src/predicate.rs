//! Column predicates
//!
//! A [`ColTest`] is a parameterized boolean test over the conditions a
//! query places on a tuple of columns. Each variant answers one question:
//! is the realized value set provably inside a documented completeness
//! range? Every failure mode (wrong arity, non-numeric value, infinite
//! set where a finite one is needed, translation error) answers "no" --
//! a predicate can decline to certify, it can never certify wrongly.
//!
//! The inventory is a closed enum rather than open trait objects so the
//! full predicate surface stays auditable in one match.

use crate::arith::{distinct_prime_factors, is_prime};
use crate::integerset::IntegerSet;
use crate::numberset::NumberSet;
use crate::query::{Condition, Constant};
use crate::translate::{to_integer_set, to_number_set};

/// A completeness test over the conditions on a tuple of columns
#[derive(Debug, Clone)]
pub enum ColTest {
    /// Each column's realized set must lie inside its fixed bound
    Bound(Vec<NumberSet>),
    /// Leading columns must equal the prefix constants exactly; the last
    /// column is bound-tested
    CBound {
        prefix: Vec<Constant>,
        bound: NumberSet,
    },
    /// As `Bound`, but every column must be a finite set of primes
    PrimeBound(Vec<IntegerSet>),
    /// As `CBound`, but the final column must be a finite set of primes
    CPrimeBound {
        prefix: Vec<Constant>,
        bound: IntegerSet,
    },
    /// Single column: every value v has |v| < M or all prime factors < M
    Smooth(i64),
    /// Each column's realized set must sit inside an explicit allow-list
    Specific(Vec<IntegerSet>),
}

impl ColTest {
    /// Number of columns this test consumes
    pub fn arity(&self) -> usize {
        match self {
            ColTest::Bound(bounds) => bounds.len(),
            ColTest::CBound { prefix, .. } => prefix.len() + 1,
            ColTest::PrimeBound(bounds) => bounds.len(),
            ColTest::CPrimeBound { prefix, .. } => prefix.len() + 1,
            ColTest::Smooth(_) => 1,
            ColTest::Specific(allowed) => allowed.len(),
        }
    }

    /// Evaluate against the query's conditions for this test's columns,
    /// in declaration order
    pub fn evaluate(&self, conds: &[&Condition]) -> bool {
        if conds.len() != self.arity() {
            return false;
        }
        match self {
            ColTest::Bound(bounds) => conds
                .iter()
                .zip(bounds)
                .all(|(cond, bound)| within_bound(cond, bound)),
            ColTest::CBound { prefix, bound } => {
                prefix_matches(conds, prefix)
                    && within_bound(conds[prefix.len()], bound)
            }
            ColTest::PrimeBound(bounds) => conds
                .iter()
                .zip(bounds)
                .all(|(cond, bound)| finite_primes_within(cond, bound)),
            ColTest::CPrimeBound { prefix, bound } => {
                prefix_matches(conds, prefix)
                    && finite_primes_within(conds[prefix.len()], bound)
            }
            ColTest::Smooth(m) => match to_integer_set(conds[0]) {
                Ok(set) if set.is_finite() => set.iter().all(|v| {
                    v.abs() < *m || distinct_prime_factors(v).iter().all(|&p| p < *m)
                }),
                _ => false,
            },
            ColTest::Specific(allowed) => {
                conds.iter().zip(allowed).all(|(cond, allow)| {
                    matches!(to_integer_set(cond), Ok(set) if set.is_subset(allow))
                })
            }
        }
    }
}

fn within_bound(cond: &Condition, bound: &NumberSet) -> bool {
    matches!(to_number_set(cond), Ok(set) if set.is_subset(bound))
}

fn finite_primes_within(cond: &Condition, bound: &IntegerSet) -> bool {
    match to_integer_set(cond) {
        Ok(set) => set.is_finite() && set.is_subset(bound) && set.iter().all(is_prime),
        Err(_) => false,
    }
}

fn prefix_matches(conds: &[&Condition], prefix: &[Constant]) -> bool {
    conds
        .iter()
        .zip(prefix)
        .all(|(cond, expected)| matches!(cond.as_literal(), Some(c) if const_eq(c, expected)))
}

/// Constant equality; numeric constants compare numerically (2 == 2.0)
pub fn const_eq(a: &Constant, b: &Constant) -> bool {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
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
    fn test_bound() {
        let t = ColTest::Bound(vec![NumberSet::closed(1.0, 500000.0)]);
        assert!(t.evaluate(&[&cond(json!({"$lte": 300000, "$gte": 1}))]));
        assert!(!t.evaluate(&[&cond(json!({"$lte": 600000}))]));
        assert!(!t.evaluate(&[&cond(json!("not a number"))]));
        assert!(!t.evaluate(&[]), "arity mismatch never certifies");
    }

    #[test]
    fn test_bound_multi_column() {
        let t = ColTest::Bound(vec![
            NumberSet::closed(1.0, 9.0),
            NumberSet::closed(0.0, 100.0),
        ]);
        assert!(t.evaluate(&[&cond(json!(4)), &cond(json!({"$lte": 50, "$gte": 0}))]));
        assert!(!t.evaluate(&[&cond(json!(10)), &cond(json!(50))]));
    }

    #[test]
    fn test_cbound_requires_exact_prefix() {
        let t = ColTest::CBound {
            prefix: vec![Constant::Int(16)],
            bound: NumberSet::closed(2.0, 3.0),
        };
        assert!(t.evaluate(&[&cond(json!(16)), &cond(json!(2))]));
        // contained in {16} but not an exact equality constraint
        assert!(!t.evaluate(&[&cond(json!({"$gte": 16, "$lte": 16})), &cond(json!(2))]));
        assert!(!t.evaluate(&[&cond(json!(15)), &cond(json!(2))]));
        assert!(!t.evaluate(&[&cond(json!(16)), &cond(json!(5))]));
    }

    #[test]
    fn test_prime_bound() {
        let t = ColTest::PrimeBound(vec![IntegerSet::closed(2, 100)]);
        assert!(t.evaluate(&[&cond(json!({"$in": [2, 3, 97]}))]));
        assert!(!t.evaluate(&[&cond(json!({"$in": [2, 4]}))]), "4 is not prime");
        assert!(
            !t.evaluate(&[&cond(json!({"$lte": 50}))]),
            "unbounded-below range is not a finite prime set"
        );
        assert!(!t.evaluate(&[&cond(json!(101))]), "outside the bound");
    }

    #[test]
    fn test_cprime_bound() {
        let t = ColTest::CPrimeBound {
            prefix: vec![Constant::Int(18)],
            bound: IntegerSet::closed(2, 7),
        };
        assert!(t.evaluate(&[&cond(json!(18)), &cond(json!({"$in": [2, 7]}))]));
        assert!(!t.evaluate(&[&cond(json!(18)), &cond(json!(6))]));
        assert!(!t.evaluate(&[&cond(json!(17)), &cond(json!(7))]));
    }

    #[test]
    fn test_smooth() {
        let t = ColTest::Smooth(7);
        assert!(t.evaluate(&[&cond(json!({"$in": [6, 10, 15]}))]), "2,3,5-factored");
        assert!(t.evaluate(&[&cond(json!(-6))]), "|v| < 7 passes outright");
        assert!(!t.evaluate(&[&cond(json!(22))]), "11 is not < 7");
        assert!(!t.evaluate(&[&cond(json!({"$gte": 2}))]), "infinite set");
    }

    #[test]
    fn test_specific() {
        let cm = ColTest::Specific(vec![IntegerSet::points([-3, -4, -7, -8, -11])]);
        assert!(cm.evaluate(&[&cond(json!({"$in": [-3, -11]}))]));
        assert!(!cm.evaluate(&[&cond(json!(-5))]));
    }

    #[test]
    fn test_const_eq_numeric() {
        assert!(const_eq(&Constant::Int(2), &Constant::Float(2.0)));
        assert!(!const_eq(&Constant::Int(2), &Constant::Str("2".into())));
        assert!(const_eq(
            &Constant::Str("8T12".into()),
            &Constant::Str("8T12".into())
        ));
    }
}
