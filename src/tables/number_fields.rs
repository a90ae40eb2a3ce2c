//! Completeness rules for the number field table
//!
//! Three families of guarantees, tried in order:
//! 1. Fields of bounded absolute discriminant, tiered: an unconditional
//!    range from exhaustive enumeration, and a wider range proved
//!    complete only under GRH (reported as a caveat).
//! 2. Fields with a fixed Galois group and bounded discriminant, from
//!    the per-group searches in the literature.
//! 3. Fields unramified outside a documented set of odd primes, reached
//!    by splitting a narrow discriminant window into its admissible
//!    ramified-prime sets via the Stickelberger parity constraint.
//!
//! The constants are curated data; a missing entry means "no guarantee
//! documented" and is never extrapolated.

use crate::integerset::IntegerSet;
use crate::query::{Condition, Constant, OpCond, Query};
use crate::registry::Registry;
use crate::rule::Rule;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use super::{decline, int_set};

const TABLE: &str = "nf_fields";

/// Largest |disc| with unconditionally complete tables, per degree
const DISC_COMPLETE: &[(i64, i64)] = &[
    (1, 1),
    (2, 2_089_873),
    (3, 3_321_607),
    (4, 4_190_210),
    (5, 12_332_609),
    (6, 29_656_854),
    (7, 54_226_799),
];

/// Larger |disc| ranges complete under GRH, per degree
const DISC_COMPLETE_GRH: &[(i64, i64)] = &[
    (2, 10_000_000),
    (3, 16_000_000),
    (4, 20_000_000),
    (5, 60_000_000),
    (6, 150_000_000),
    (7, 200_000_000),
    (8, 384_000_000),
];

/// (transitive group label, largest |disc| with complete tables)
const GALOIS_DISC_BOUNDS: &[(&str, i64)] = &[
    ("2T1", 1_000_000_000),
    ("3T1", 3_375_000_000),
    ("3T2", 1_000_000_000),
    ("4T1", 1_000_000_000),
    ("4T2", 1_000_000_000),
    ("4T3", 400_000_000),
    ("4T4", 100_000_000),
    ("4T5", 100_000_000),
    ("5T1", 100_000_000_000),
    ("5T2", 10_000_000_000),
    ("6T1", 100_000_000_000),
    ("6T2", 10_000_000_000),
    ("8T12", 10_000_000_000),
];

/// Odd-prime ramification sets with exhaustively enumerated fields,
/// per degree
const RAMIFICATION_SETS: &[(i64, &[&[i64]])] = &[
    (2, &[&[], &[3], &[5], &[7], &[11], &[3, 5], &[3, 7], &[5, 7]]),
    (3, &[&[], &[3], &[5], &[7], &[3, 5], &[3, 7]]),
    (4, &[&[], &[3], &[5], &[7], &[3, 5]]),
    (5, &[&[], &[3], &[5], &[7]]),
    (6, &[&[], &[3], &[5]]),
    (7, &[&[], &[3], &[5]]),
];

/// Widest discriminant window the Stickelberger split will enumerate
const STICKELBERGER_SPAN: i64 = 50_000;

static GALOIS_LOOKUP: LazyLock<BTreeMap<(i64, i64), i64>> = LazyLock::new(|| {
    GALOIS_DISC_BOUNDS
        .iter()
        .filter_map(|(label, bound)| Some((parse_group_label(label)?, *bound)))
        .collect()
});

static RAMIFICATION_LOOKUP: LazyLock<BTreeMap<i64, BTreeSet<Vec<i64>>>> = LazyLock::new(|| {
    RAMIFICATION_SETS
        .iter()
        .map(|(degree, sets)| {
            let allow = sets.iter().map(|primes| primes.to_vec()).collect();
            (*degree, allow)
        })
        .collect()
});

/// "nTt" transitive group label to (degree, index)
fn parse_group_label(label: &str) -> Option<(i64, i64)> {
    let (n, t) = label.split_once('T')?;
    Some((n.parse().ok()?, t.parse().ok()?))
}

fn galois_bound(label: &str) -> Option<i64> {
    let key = parse_group_label(label)?;
    GALOIS_LOOKUP.get(&key).copied()
}

fn table_lookup(table: &[(i64, i64)], key: i64) -> Option<i64> {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, bound)| *bound)
}

/// Tiered |disc| covers for one degree: tier 0 unconditional, tier 1
/// under GRH
fn disc_tiers(degree: i64) -> Vec<(IntegerSet, f64)> {
    let mut tiers = Vec::new();
    if let Some(bound) = table_lookup(DISC_COMPLETE, degree) {
        tiers.push((IntegerSet::closed(1, bound), 0.0));
    }
    if let Some(bound) = table_lookup(DISC_COMPLETE_GRH, degree) {
        tiers.push((IntegerSet::closed(1, bound), 1.0));
    }
    tiers
}

/// Absolute discriminants are positive; clip off the vacuous tail a
/// one-sided query constraint carries
fn positive_discs(query: &Query) -> Option<IntegerSet> {
    Some(int_set(query, "disc_abs")?.intersection(&IntegerSet::at_least(1)))
}

fn check_disc_tiers(query: &Query) -> (bool, Option<String>, Option<String>) {
    let (Some(degrees), Some(discs)) = (int_set(query, "degree"), positive_discs(query)) else {
        return decline();
    };
    if !degrees.is_finite() {
        return decline();
    }
    let mut grh = false;
    for degree in &degrees {
        match discs.bound_under(&disc_tiers(degree)) {
            Some(cost) => grh |= cost > 0.0,
            None => return decline(),
        }
    }
    (
        true,
        Some("complete tables of fields with bounded absolute discriminant".into()),
        grh.then(|| "assuming GRH".into()),
    )
}

/// The exact group labels a condition pins its field to
fn label_values(cond: &Condition) -> Option<Vec<&str>> {
    match cond {
        Condition::Literal(Constant::Str(label)) => Some(vec![label.as_str()]),
        Condition::Ops(ops) if ops.len() == 1 => match ops.get("$in") {
            Some(OpCond::In(items)) => items
                .iter()
                .map(|c| match c {
                    Constant::Str(label) => Some(label.as_str()),
                    _ => None,
                })
                .collect(),
            _ => None,
        },
        _ => None,
    }
}

fn check_galois_bounds(query: &Query) -> (bool, Option<String>, Option<String>) {
    let Some(labels) = query.fields.get("galois_label").and_then(label_values) else {
        return decline();
    };
    let Some(discs) = positive_discs(query) else {
        return decline();
    };
    for label in labels {
        match galois_bound(label) {
            Some(bound) if discs.is_subset(&IntegerSet::closed(1, bound)) => {}
            _ => return decline(),
        }
    }
    (
        true,
        Some("complete tables of fields with given Galois group and bounded discriminant".into()),
        None,
    )
}

fn check_ramification(query: &Query) -> (bool, Option<String>, Option<String>) {
    let (Some(degrees), Some(discs)) = (int_set(query, "degree"), positive_discs(query)) else {
        return decline();
    };
    let (Some(degree), Some(max_degree)) = (degrees.min(), degrees.max()) else {
        return decline();
    };
    if degree != max_degree {
        return decline();
    }
    let Some(allow) = RAMIFICATION_LOOKUP.get(&degree) else {
        return decline();
    };
    let r2_options: Vec<i64> = (0..=degree / 2).collect();
    let Some(tuples) = discs.stickelberger(degree, &r2_options) else {
        return decline();
    };
    if tuples.iter().all(|primes| allow.contains(primes)) {
        (
            true,
            Some("complete tables of fields unramified outside a documented prime set".into()),
            None,
        )
    } else {
        decline()
    }
}

/// The Stickelberger split enumerates every integer in the window;
/// only narrow finite windows are worth it
fn narrow_disc_window(query: &Query) -> bool {
    match positive_discs(query) {
        Some(discs) => match (discs.min(), discs.max()) {
            (Some(lo), Some(hi)) => hi - lo <= STICKELBERGER_SPAN,
            _ => false,
        },
        None => false,
    }
}

pub(super) fn register(registry: &mut Registry) {
    registry
        .register(
            TABLE,
            Rule::verdict(&["degree", "disc_abs"], check_disc_tiers),
        )
        .register(
            TABLE,
            Rule::verdict(&["galois_label", "disc_abs"], check_galois_bounds),
        )
        .register(
            TABLE,
            Rule::verdict(&["degree", "disc_abs"], check_ramification)
                .with_filter(narrow_disc_window),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(value: serde_json::Value) -> Query {
        Query::parse(&value).unwrap()
    }

    #[test]
    fn test_disc_tiers_unconditional() {
        let (ok, reason, caveat) =
            check_disc_tiers(&query(json!({"degree": 2, "disc_abs": {"$lte": 2000000}})));
        assert!(ok);
        assert!(reason.is_some());
        assert!(caveat.is_none(), "inside the unconditional range");
    }

    #[test]
    fn test_disc_tiers_grh_caveat() {
        let (ok, _, caveat) =
            check_disc_tiers(&query(json!({"degree": 2, "disc_abs": {"$lte": 8000000}})));
        assert!(ok);
        assert_eq!(caveat.as_deref(), Some("assuming GRH"));
    }

    #[test]
    fn test_disc_tiers_out_of_range() {
        let (ok, _, _) =
            check_disc_tiers(&query(json!({"degree": 2, "disc_abs": {"$lte": 20000000}})));
        assert!(!ok, "beyond even the GRH range");

        let (ok, _, _) =
            check_disc_tiers(&query(json!({"degree": 40, "disc_abs": {"$lte": 100}})));
        assert!(!ok, "no documented bound for degree 40");
    }

    #[test]
    fn test_disc_tiers_multi_degree_takes_worst() {
        // degree 8 only has a GRH bound, so the caveat must appear
        let q = query(json!({"degree": {"$in": [2, 8]}, "disc_abs": {"$lte": 1000000}}));
        let (ok, _, caveat) = check_disc_tiers(&q);
        assert!(ok);
        assert_eq!(caveat.as_deref(), Some("assuming GRH"));
    }

    #[test]
    fn test_galois_bound_lookup() {
        assert_eq!(galois_bound("8T12"), Some(10_000_000_000));
        assert!(galois_bound("8T50").is_none());
        assert!(galois_bound("not a label").is_none());
    }

    #[test]
    fn test_galois_rule() {
        let (ok, _, _) = check_galois_bounds(&query(
            json!({"galois_label": "4T3", "disc_abs": {"$lte": 100000000, "$gte": 1}}),
        ));
        assert!(ok);

        let (ok, _, _) = check_galois_bounds(&query(
            json!({"galois_label": "4T3", "disc_abs": {"$lte": 500000000}}),
        ));
        assert!(!ok, "past the 4T3 bound");

        let (ok, _, _) = check_galois_bounds(&query(
            json!({"galois_label": {"$in": ["2T1", "3T1"]}, "disc_abs": {"$lte": 1000000}}),
        ));
        assert!(ok, "every listed group is covered");
    }

    #[test]
    fn test_ramification_rule() {
        // a narrow window of quadratic discriminants ramified only at 3, 5
        let q = query(json!({"degree": 2, "disc_abs": {"$in": [5, 12, 15]}}));
        let (ok, _, _) = check_ramification(&q);
        assert!(ok);

        // 13 is not in the documented ramification sets for degree 2
        let q = query(json!({"degree": 2, "disc_abs": {"$in": [13]}}));
        let (ok, _, _) = check_ramification(&q);
        assert!(!ok);
    }

    #[test]
    fn test_narrow_window_filter() {
        assert!(narrow_disc_window(&query(
            json!({"disc_abs": {"$gte": 1, "$lte": 5000}})
        )));
        assert!(!narrow_disc_window(&query(
            json!({"disc_abs": {"$lte": 10000000}})
        )));
        assert!(!narrow_disc_window(&query(json!({"degree": 2}))));
    }
}
