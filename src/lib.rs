// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # QCert — query completeness certification
//!
//! Decides whether a database table provably contains **every** object
//! matching a search query, not merely every object currently known.
//! The verdict lets a search front-end label a result list "this is all
//! of them," optionally with a caveat when the guarantee rests on an
//! unproven hypothesis such as GRH.
//!
//! ## Core Concept
//!
//! Each table documents the parameter regions over which its contents
//! are exhaustive (curated bound tables). A query is **complete** when
//! the value sets it realizes are provably inside such a region. The
//! oracle answers conservatively: every failure to decide is "not
//! complete," never the reverse.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use qcert::{CompletenessChecker, TableStats};
//! use serde_json::json;
//!
//! let checker = CompletenessChecker::builtin();
//! let verdict = checker.check_or_incomplete(
//!     "ec_curvedata",
//!     &json!({"conductor": {"$lte": 300000}}),
//!     &stats,
//! );
//! if verdict.complete {
//!     println!("exhaustive: {}", verdict.reason.unwrap_or_default());
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                                                          │
//! │  QUERY (Mongo-style JSON)                                │
//! │      │                                                   │
//! │      ├──► Query::parse ──► AST          (query)          │
//! │      │                                                   │
//! │      └──► CompletenessChecker::check    (checker)        │
//! │               │                                          │
//! │               ├── standardize $or / $and                 │
//! │               ├── null-awareness gate   (TableStats)     │
//! │               ├── fillers               (fill)           │
//! │               └── ordered rule match    (rule, registry) │
//! │                        │                                 │
//! │                        └──► ColTest over NumberSets      │
//! │                             (predicate, translate,       │
//! │                              numberset, integerset)      │
//! │                                                          │
//! │  VERDICT (complete, reason, caveat)                      │
//! │                                                          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The built-in registrations under [`tables`] are data, not algorithm:
//! per-table rule lists over curated bound constants.

pub mod arith;
pub mod checker;
pub mod error;
pub mod fill;
pub mod integerset;
pub mod interval;
pub mod numberset;
pub mod predicate;
pub mod query;
pub mod registry;
pub mod rule;
pub mod tables;
pub mod translate;

pub use checker::{CompletenessChecker, TableStats, Verdict};
pub use error::{Error, Result};
pub use fill::Filler;
pub use integerset::{IntPoints, IntegerSet};
pub use interval::Interval;
pub use numberset::NumberSet;
pub use predicate::ColTest;
pub use query::{Condition, Constant, OpCond, Query};
pub use registry::{Registry, TableRules};
pub use rule::{Rule, RuleTest};
pub use translate::{to_integer_set, to_number_set};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
