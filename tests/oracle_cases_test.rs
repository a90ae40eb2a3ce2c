//! Data-driven verdict tests across the built-in tables

use qcert::{CompletenessChecker, Query, TableStats};
use rstest::rstest;
use serde_json::json;
use std::collections::BTreeMap;

struct CleanStats;

impl TableStats for CleanStats {
    fn exists(&self, _query: &Query) -> bool {
        true
    }

    fn null_counts(&self) -> BTreeMap<String, u64> {
        BTreeMap::new()
    }
}

#[rstest]
// elliptic curves: conductor slices
#[case("ec_curvedata", json!({"conductor": 11}), true)]
#[case("ec_curvedata", json!({"conductor": {"$lte": 500000}}), true)]
#[case("ec_curvedata", json!({"conductor": {"$lte": 500001}}), false)]
#[case("ec_curvedata", json!({"conductor": {"$in": [1000003, 2000003]}}), true)]
#[case("ec_curvedata", json!({"conductor": {"$in": [1000003, 1000004]}}), false)]
#[case("ec_curvedata", json!({"conductor": 1741824}), true)] // 2^10 * 3^5 * 7
#[case("ec_curvedata", json!({"conductor": {"$gte": 1}}), false)]
// elliptic curves: CM discriminants
#[case("ec_curvedata", json!({"cm_disc": -163}), true)]
#[case("ec_curvedata", json!({"cm_disc": {"$in": [-3, -4, -7]}}), true)]
#[case("ec_curvedata", json!({"cm_disc": -5}), false)]
// local fields: degree coverage, with and without the n = e*f filler
#[case("lf_fields", json!({"n": {"$lte": 15, "$gte": 1}}), true)]
#[case("lf_fields", json!({"n": 16, "p": 3}), true)]
#[case("lf_fields", json!({"n": 16, "p": 7}), false)]
#[case("lf_fields", json!({"n": 18, "p": {"$in": [5, 7]}}), true)]
#[case("lf_fields", json!({"n": 18, "p": {"$lte": 7}}), false)] // not a finite prime set
#[case("lf_fields", json!({"e": 5, "f": 3}), true)]
#[case("lf_fields", json!({"e": 5, "f": 4}), false)]
// number fields: discriminant tiers and Galois bounds
#[case("nf_fields", json!({"degree": 3, "disc_abs": {"$lte": 3000000}}), true)]
#[case("nf_fields", json!({"degree": 3, "disc_abs": {"$lte": 100000000}}), false)]
#[case("nf_fields", json!({"degree": {"$gte": 2, "$lte": 4}, "disc_abs": {"$lte": 1000000}}), true)]
#[case("nf_fields", json!({"degree": {"$gte": 2}, "disc_abs": {"$lte": 10}}), false)] // infinite degree set
#[case("nf_fields", json!({"galois_label": "5T1", "disc_abs": {"$lte": 50_000_000_000i64}}), true)]
#[case("nf_fields", json!({"galois_label": "8T50", "disc_abs": {"$lte": 10}}), false)]
// boolean structure
#[case("ec_curvedata", json!({"$and": [{"rank": 2}, {"conductor": {"$lte": 100}}]}), true)]
#[case("ec_curvedata", json!({"$and": [{"rank": 2}, {"sha": 1}]}), false)]
#[case("ec_curvedata", json!({"$or": []}), false)]
fn test_verdicts(
    #[case] table: &str,
    #[case] query: serde_json::Value,
    #[case] expected_complete: bool,
) {
    let verdict = CompletenessChecker::builtin()
        .check_json(table, &query, &CleanStats)
        .unwrap();
    assert_eq!(
        verdict.complete, expected_complete,
        "table {table}, query {query}, got {verdict:?}"
    );
    if !expected_complete {
        assert!(verdict.reason.is_none(), "incomplete verdicts carry no reason");
    }
}
