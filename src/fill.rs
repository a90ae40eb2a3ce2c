//! Fillers: deriving implied field constraints
//!
//! A filler rewrites a query before rule matching, computing the
//! constraint one field inherits from two others through a fixed
//! algebraic relation (`target = left * right` or `target = left +
//! right`). Both directions run: the forward product/sum when the
//! operands are constrained, and the back-solved quotient/difference
//! when the target and one operand are. Derived constraints only ever
//! *intersect* what the query already says about a field, so applying
//! a filler twice is the same as applying it once, and a filler can
//! never loosen a user-supplied bound.

use crate::integerset::IntegerSet;
use crate::query::{Condition, Query};
use crate::translate::to_integer_set;

/// An algebraic relation among three integer-valued fields
#[derive(Debug, Clone)]
pub enum Filler {
    /// target = left * right
    Product {
        target: String,
        left: String,
        right: String,
    },
    /// target = left + right
    Sum {
        target: String,
        left: String,
        right: String,
    },
}

impl Filler {
    pub fn product(target: &str, left: &str, right: &str) -> Filler {
        Filler::Product {
            target: target.to_string(),
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    pub fn sum(target: &str, left: &str, right: &str) -> Filler {
        Filler::Sum {
            target: target.to_string(),
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    /// Derive every direction of the relation available from the
    /// query's current constraints. A derivation can enable another
    /// (a freshly derived operand feeds the opposite back-solve), so
    /// the directions run until the query is stable and a single call
    /// reaches the fixed point.
    pub fn apply(&self, query: &mut Query) {
        let (target, left, right) = match self {
            Filler::Product {
                target,
                left,
                right,
            }
            | Filler::Sum {
                target,
                left,
                right,
            } => (target, left, right),
        };
        let (fwd, back) = match self {
            Filler::Product { .. } => (mul as SetOp, div as SetOp),
            Filler::Sum { .. } => (add as SetOp, sub as SetOp),
        };

        loop {
            let t = field_set(query, target);
            let l = field_set(query, left);
            let r = field_set(query, right);

            let mut changed = false;
            if let (Some(l), Some(r)) = (&l, &r) {
                changed |= constrain(query, target, fwd(l, r));
            }
            if let (Some(t), Some(l)) = (&t, &l) {
                changed |= constrain(query, right, back(t, l));
            }
            if let (Some(t), Some(r)) = (&t, &r) {
                changed |= constrain(query, left, back(t, r));
            }
            if !changed {
                break;
            }
        }
    }
}

type SetOp = fn(&IntegerSet, &IntegerSet) -> IntegerSet;

fn mul(a: &IntegerSet, b: &IntegerSet) -> IntegerSet {
    a * b
}

fn div(a: &IntegerSet, b: &IntegerSet) -> IntegerSet {
    a / b
}

fn add(a: &IntegerSet, b: &IntegerSet) -> IntegerSet {
    a + b
}

fn sub(a: &IntegerSet, b: &IntegerSet) -> IntegerSet {
    a - b
}

/// The field's current integer set, if it has a numeric constraint
fn field_set(query: &Query, field: &str) -> Option<IntegerSet> {
    query
        .fields
        .get(field)
        .and_then(|cond| to_integer_set(cond).ok())
}

/// Intersect the derived set into the field; true when the field's
/// realized set actually shrank. A field whose existing condition is
/// non-numeric, or already at least as tight as the derivation, is
/// left untouched.
fn constrain(query: &mut Query, field: &str, derived: IntegerSet) -> bool {
    let next = match query.fields.get(field) {
        None => derived,
        Some(cond) => match to_integer_set(cond) {
            Ok(existing) if existing.is_subset(&derived) => return false,
            Ok(existing) => existing.intersection(&derived),
            Err(_) => return false,
        },
    };
    query.fields.insert(field.to_string(), Condition::Set(next));
    true
}
