//! Completeness checking
//!
//! The checker walks a query through a fixed pipeline: standardize the
//! boolean structure, refuse queries that depend on partially-computed
//! columns, apply fillers, then match the table's ordered rule list.
//! The outcome is a [`Verdict`]: complete or not, with an optional
//! human-readable reason and an optional caveat (a hypothesis the
//! guarantee is conditional on, such as GRH).
//!
//! Completeness information is strictly additive for callers: the
//! [`check_or_incomplete`](CompletenessChecker::check_or_incomplete)
//! entry point never fails, degrading any internal error to "not
//! complete" with a logged warning.

use crate::error::Result;
use crate::query::{Condition, Constant, OpCond, Query};
use crate::registry::{Registry, TableRules};
use crate::tables;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of a completeness check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Verdict {
    /// The database provably holds every object matching the query
    pub complete: bool,
    /// Why completeness holds, when it does
    pub reason: Option<String>,
    /// Unproven hypothesis the guarantee is conditional on
    pub caveat: Option<String>,
}

impl Verdict {
    pub fn complete(reason: Option<String>, caveat: Option<String>) -> Verdict {
        Verdict {
            complete: true,
            reason,
            caveat,
        }
    }

    pub fn incomplete() -> Verdict {
        Verdict {
            complete: false,
            reason: None,
            caveat: None,
        }
    }
}

/// Table-layer collaborator: row existence and per-column null counts.
///
/// `null_counts` reports, per column, how many rows have no computed
/// value yet. `columns_searched` defaults to the columns syntactically
/// present in the query; implementations may widen it when a search
/// touches derived columns the query text does not name.
pub trait TableStats {
    fn exists(&self, query: &Query) -> bool;
    fn null_counts(&self) -> BTreeMap<String, u64>;
    fn columns_searched(&self, query: &Query) -> BTreeSet<String> {
        query.columns()
    }
}

/// The oracle: registry plus pipeline
pub struct CompletenessChecker<'a> {
    registry: &'a Registry,
}

impl CompletenessChecker<'static> {
    /// Checker over the built-in table registrations
    pub fn builtin() -> CompletenessChecker<'static> {
        CompletenessChecker {
            registry: tables::builtin(),
        }
    }
}

impl<'a> CompletenessChecker<'a> {
    pub fn new(registry: &'a Registry) -> CompletenessChecker<'a> {
        CompletenessChecker { registry }
    }

    /// Decide completeness of `query` against `table`
    pub fn check(&self, table: &str, query: &Query, stats: &dyn TableStats) -> Result<Verdict> {
        let rules = match self.registry.table(table) {
            Some(rules) => rules,
            None => return Ok(Verdict::incomplete()),
        };
        let query = standardize(query);
        if self.null_dependent(&query, rules, stats) {
            return Ok(Verdict::incomplete());
        }
        Ok(verify(&query, rules))
    }

    /// Parse a JSON query object and check it
    pub fn check_json(
        &self,
        table: &str,
        query: &serde_json::Value,
        stats: &dyn TableStats,
    ) -> Result<Verdict> {
        self.check(table, &Query::parse(query)?, stats)
    }

    /// Never-failing wrapper: any error degrades to "not complete" with
    /// a logged warning, so completeness can only ever add information
    /// to a search response
    pub fn check_or_incomplete(
        &self,
        table: &str,
        query: &serde_json::Value,
        stats: &dyn TableStats,
    ) -> Verdict {
        match self.check_json(table, query, stats) {
            Ok(verdict) => verdict,
            Err(err) => {
                log::warn!("completeness check failed for table {table}: {err}");
                Verdict::incomplete()
            }
        }
    }

    /// A searched column has uncomputed values, and rows with that
    /// column absent can still match: any verdict would rest on data
    /// the filter cannot see
    fn null_dependent(&self, query: &Query, rules: &TableRules, stats: &dyn TableStats) -> bool {
        let nulls = stats.null_counts();
        for column in stats.columns_searched(query) {
            if rules.null_exempt.contains(&column) {
                continue;
            }
            if nulls.get(&column).copied().unwrap_or(0) == 0 {
                continue;
            }
            let mut restricted = query.clone();
            restricted
                .fields
                .insert(column, Condition::Literal(Constant::Null));
            if stats.exists(&restricted) {
                return true;
            }
        }
        false
    }
}

/// Fold top-level sibling constraints into each `$or` branch so branches
/// can be verified independently. Operator maps merge key-wise with the
/// branch's entries winning; any other collision is taken from the
/// sibling, which is the conjunct the branch was implicitly under.
fn standardize(query: &Query) -> Query {
    let mut query = query.clone();
    if query.or.is_empty() || query.fields.is_empty() {
        return query;
    }
    let siblings = std::mem::take(&mut query.fields);
    for branch in &mut query.or {
        for (field, outer) in &siblings {
            let merged = match (branch.fields.get(field), outer) {
                (Some(Condition::Ops(inner)), Condition::Ops(outer_ops)) => {
                    let mut ops: BTreeMap<&'static str, OpCond> = outer_ops.clone();
                    ops.extend(inner.clone());
                    Condition::Ops(ops)
                }
                _ => outer.clone(),
            };
            branch.fields.insert(field.clone(), merged);
        }
    }
    query
}

/// Recursive verdict over the standardized boolean structure
fn verify(query: &Query, rules: &TableRules) -> Verdict {
    if query.is_empty() {
        return Verdict::incomplete();
    }
    if !query.and.is_empty() {
        // any complete conjunct certifies the whole intersection; a
        // sibling $or (with its own siblings) counts as one conjunct
        let mut conjuncts: Vec<Query> = query.and.clone();
        if !query.fields.is_empty() || !query.or.is_empty() {
            conjuncts.push(Query {
                fields: query.fields.clone(),
                or: query.or.clone(),
                ..Query::default()
            });
        }
        for sub in &conjuncts {
            let v = verify(&standardize(sub), rules);
            if v.complete {
                return v;
            }
        }
        return Verdict::incomplete();
    }
    if !query.or.is_empty() {
        return verify_or(&query.or, rules);
    }
    match_rules(query, rules)
}

/// A union of result sets is complete only when every arm is; reasons
/// and caveats accumulate across arms
fn verify_or(branches: &[Query], rules: &TableRules) -> Verdict {
    let mut reasons: Vec<String> = Vec::new();
    let mut caveats: Vec<String> = Vec::new();
    for branch in branches {
        let v = verify(&standardize(branch), rules);
        if !v.complete {
            return Verdict::incomplete();
        }
        if let Some(r) = v.reason {
            if !reasons.contains(&r) {
                reasons.push(r);
            }
        }
        if let Some(c) = v.caveat {
            if !caveats.contains(&c) {
                caveats.push(c);
            }
        }
    }
    Verdict::complete(join_nonempty(reasons), join_nonempty(caveats))
}

fn join_nonempty(parts: Vec<String>) -> Option<String> {
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}

/// Fillers, `$not` stripping, then first matching rule wins
fn match_rules(query: &Query, rules: &TableRules) -> Verdict {
    let mut query = query.clone();
    for filler in &rules.fillers {
        filler.apply(&mut query);
    }
    for cond in query.fields.values_mut() {
        *cond = cond.without_not();
    }
    for rule in &rules.rules {
        if !rule.eligible(&query) {
            continue;
        }
        if let Some(verdict) = rule.try_match(&query) {
            return verdict;
        }
    }
    Verdict::incomplete()
}
