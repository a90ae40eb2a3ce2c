//! Completeness rules for the elliptic curve table
//!
//! Coverage comes in four documented slices: every curve of conductor
//! up to 500000 (exhaustive enumeration), curves of prime conductor up
//! to 3*10^8, curves of 7-smooth conductor (complete at every such
//! conductor by a finiteness argument), and the thirteen CM
//! discriminant classes, which are fully known at all conductors. The
//! CM discriminant column is null exactly when a curve has no CM, so
//! its nulls are exempted from the partially-computed gate.

use crate::integerset::IntegerSet;
use crate::numberset::NumberSet;
use crate::predicate::ColTest;
use crate::registry::Registry;
use crate::rule::Rule;

const TABLE: &str = "ec_curvedata";

/// The thirteen imaginary quadratic CM discriminants
const CM_DISCRIMINANTS: [i64; 13] = [
    -3, -4, -7, -8, -11, -12, -16, -19, -27, -28, -43, -67, -163,
];

pub(super) fn register(registry: &mut Registry) {
    registry
        .exempt_null(TABLE, "cm_disc")
        .register(
            TABLE,
            Rule::new(
                &["conductor"],
                ColTest::Bound(vec![NumberSet::at_most(500000.0)]),
            )
            .with_reason("all curves of conductor up to 500000"),
        )
        .register(
            TABLE,
            Rule::new(
                &["conductor"],
                ColTest::PrimeBound(vec![IntegerSet::at_most(300_000_000)]),
            )
            .with_reason("all curves of prime conductor up to 3*10^8"),
        )
        .register(
            TABLE,
            // strict smoothness cutoff: 8 admits exactly the primes 2, 3, 5, 7
            Rule::new(&["conductor"], ColTest::Smooth(8))
                .with_reason("all curves of 7-smooth conductor"),
        )
        .register(
            TABLE,
            Rule::new(
                &["cm_disc"],
                ColTest::Specific(vec![IntegerSet::points(CM_DISCRIMINANTS)]),
            )
            .with_reason("all curves with complex multiplication"),
        );
}
