//! Per-table rule registry
//!
//! Append-only: tables register their rule lists, fillers, and
//! null-exempt columns once at start-up, and checks read the registry
//! without synchronization afterwards. Rule order within a table is
//! registration order and is significant (first match wins).

use crate::fill::Filler;
use crate::rule::Rule;
use std::collections::{BTreeMap, BTreeSet};

/// Everything registered for one table
#[derive(Debug, Default)]
pub struct TableRules {
    pub rules: Vec<Rule>,
    pub fillers: Vec<Filler>,
    /// Columns whose null counts do not block completeness
    pub null_exempt: BTreeSet<String>,
}

/// Rule lists for all tables
#[derive(Debug, Default)]
pub struct Registry {
    tables: BTreeMap<String, TableRules>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    pub fn table(&self, name: &str) -> Option<&TableRules> {
        self.tables.get(name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Append a rule to a table's ordered list
    pub fn register(&mut self, table: &str, rule: Rule) -> &mut Self {
        self.entry(table).rules.push(rule);
        self
    }

    pub fn add_filler(&mut self, table: &str, filler: Filler) -> &mut Self {
        self.entry(table).fillers.push(filler);
        self
    }

    pub fn exempt_null(&mut self, table: &str, column: &str) -> &mut Self {
        self.entry(table).null_exempt.insert(column.to_string());
        self
    }

    fn entry(&mut self, table: &str) -> &mut TableRules {
        self.tables.entry(table.to_string()).or_default()
    }
}
