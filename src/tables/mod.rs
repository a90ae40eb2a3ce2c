//! Built-in table registrations
//!
//! Everything under this module is data, not algorithm: per-table rule
//! lists, fillers, and curated bound constants describing how far each
//! table's contents are known to be exhaustive. The registry is built
//! once on first use and read-only afterwards.

use crate::integerset::IntegerSet;
use crate::query::Query;
use crate::registry::Registry;
use crate::translate::to_integer_set;
use std::sync::LazyLock;

mod elliptic_curves;
mod local_fields;
mod number_fields;

/// The field's realized integer set, when it has a numeric constraint
fn int_set(query: &Query, field: &str) -> Option<IntegerSet> {
    query
        .fields
        .get(field)
        .and_then(|cond| to_integer_set(cond).ok())
}

/// "Cannot decide" result for verdict closures
fn decline() -> (bool, Option<String>, Option<String>) {
    (false, None, None)
}

static BUILTIN: LazyLock<Registry> = LazyLock::new(|| {
    let mut registry = Registry::new();
    number_fields::register(&mut registry);
    local_fields::register(&mut registry);
    elliptic_curves::register(&mut registry);
    registry
});

/// The process-wide registry of built-in tables
pub fn builtin() -> &'static Registry {
    &BUILTIN
}
