//! Completeness rules
//!
//! A rule ties a tuple of columns to a test. It becomes eligible when
//! every declared column appears in the query and its optional filter
//! accepts the query; an eligible rule whose test passes supplies the
//! verdict. Most rules carry a [`ColTest`]; a few need the full query
//! (tier pricing, Stickelberger case splits) and provide a closure that
//! produces the `(complete, reason, caveat)` triple itself.

use crate::checker::Verdict;
use crate::predicate::ColTest;
use crate::query::{Condition, Query};
use std::fmt;

/// A verdict-producing closure over the whole query
pub type VerdictFn = Box<dyn Fn(&Query) -> (bool, Option<String>, Option<String>) + Send + Sync>;

/// An eligibility filter beyond column presence
pub type QueryFilter = Box<dyn Fn(&Query) -> bool + Send + Sync>;

pub enum RuleTest {
    Col(ColTest),
    Fn(VerdictFn),
}

/// One entry in a table's ordered rule list
pub struct Rule {
    columns: Vec<String>,
    test: RuleTest,
    reason: Option<String>,
    caveat: Option<String>,
    filter: Option<QueryFilter>,
}

impl Rule {
    /// Rule backed by a column predicate
    pub fn new(columns: &[&str], test: ColTest) -> Rule {
        Rule {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            test: RuleTest::Col(test),
            reason: None,
            caveat: None,
            filter: None,
        }
    }

    /// Rule backed by a verdict closure
    pub fn verdict<F>(columns: &[&str], f: F) -> Rule
    where
        F: Fn(&Query) -> (bool, Option<String>, Option<String>) + Send + Sync + 'static,
    {
        Rule {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            test: RuleTest::Fn(Box::new(f)),
            reason: None,
            caveat: None,
            filter: None,
        }
    }

    pub fn with_reason(mut self, reason: &str) -> Rule {
        self.reason = Some(reason.to_string());
        self
    }

    pub fn with_caveat(mut self, caveat: &str) -> Rule {
        self.caveat = Some(caveat.to_string());
        self
    }

    pub fn with_filter<F>(mut self, filter: F) -> Rule
    where
        F: Fn(&Query) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Every declared column constrained, and the filter accepts
    pub fn eligible(&self, query: &Query) -> bool {
        self.columns.iter().all(|c| query.fields.contains_key(c))
            && self.filter.as_ref().is_none_or(|f| f(query))
    }

    /// Run the test; Some(verdict) when it certifies completeness
    pub fn try_match(&self, query: &Query) -> Option<Verdict> {
        match &self.test {
            RuleTest::Col(test) => {
                let conds: Vec<&Condition> = self
                    .columns
                    .iter()
                    .map(|c| query.fields.get(c))
                    .collect::<Option<_>>()?;
                if test.evaluate(&conds) {
                    Some(Verdict::complete(self.reason.clone(), self.caveat.clone()))
                } else {
                    None
                }
            }
            RuleTest::Fn(f) => {
                let (ok, reason, caveat) = f(query);
                if ok {
                    Some(Verdict::complete(
                        reason.or_else(|| self.reason.clone()),
                        caveat.or_else(|| self.caveat.clone()),
                    ))
                } else {
                    None
                }
            }
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("columns", &self.columns)
            .field("reason", &self.reason)
            .field("caveat", &self.caveat)
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}
