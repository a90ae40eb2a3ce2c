//! Query AST and parser
//!
//! Queries arrive as Mongo-style JSON maps produced by an upstream
//! search-string parser: field names mapped to scalars or operator maps,
//! plus top-level `$or` / `$and` combinators. Parsing is strict about
//! operator keys: any `$`-key outside the grammar is a hard
//! [`Error::UnknownOperator`] rather than an ignored constraint, because
//! a constraint the oracle cannot see could make it certify a query as
//! complete when the realized result set is narrower than it believes.

use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A scalar query constant
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Constant {
    /// Numeric value, if this constant is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Constant::Int(n) => Some(*n as f64),
            Constant::Float(x) => Some(*x),
            _ => None,
        }
    }

    fn parse(value: &Value) -> Result<Constant> {
        match value {
            Value::Null => Ok(Constant::Null),
            Value::Bool(b) => Ok(Constant::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Constant::Int(i))
                } else if let Some(x) = n.as_f64() {
                    Ok(Constant::Float(x))
                } else {
                    Err(Error::BadQuery(format!("number out of range: {n}")))
                }
            }
            Value::String(s) => Ok(Constant::Str(s.clone())),
            other => Err(Error::BadQuery(format!(
                "expected a scalar constant, got {other}"
            ))),
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Null => write!(f, "null"),
            Constant::Bool(b) => write!(f, "{b}"),
            Constant::Int(n) => write!(f, "{n}"),
            Constant::Float(x) => write!(f, "{x}"),
            Constant::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// One operator application inside a field's operator map
#[derive(Debug, Clone, PartialEq)]
pub enum OpCond {
    Lte(Constant),
    Lt(Constant),
    Gte(Constant),
    Gt(Constant),
    Ne(Constant),
    In(Vec<Constant>),
    Nin(Vec<Constant>),
    Not(Box<Condition>),
    /// Congruence constraint (remainder, divisor); carried through the
    /// AST but translated as unconstrained
    Mod(i64, i64),
}

impl OpCond {
    /// The `$`-key this operator was parsed from
    pub fn key(&self) -> &'static str {
        match self {
            OpCond::Lte(_) => "$lte",
            OpCond::Lt(_) => "$lt",
            OpCond::Gte(_) => "$gte",
            OpCond::Gt(_) => "$gt",
            OpCond::Ne(_) => "$ne",
            OpCond::In(_) => "$in",
            OpCond::Nin(_) => "$nin",
            OpCond::Not(_) => "$not",
            OpCond::Mod(_, _) => "$mod",
        }
    }
}

/// Constraint on a single field
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Exact scalar equality
    Literal(Constant),
    /// Conjunction of operator applications, keyed for merge precedence
    Ops(BTreeMap<&'static str, OpCond>),
    /// A value set derived by a filler; never produced by the parser
    Set(crate::integerset::IntegerSet),
}

impl Condition {
    fn parse(value: &Value) -> Result<Condition> {
        match value {
            Value::Object(map) => {
                let mut ops = BTreeMap::new();
                for (key, arg) in map {
                    let op = parse_op(key, arg)?;
                    ops.insert(op.key(), op);
                }
                Ok(Condition::Ops(ops))
            }
            other => Ok(Condition::Literal(Constant::parse(other)?)),
        }
    }

    /// The exact constant this condition pins its field to, if any
    pub fn as_literal(&self) -> Option<&Constant> {
        match self {
            Condition::Literal(c) => Some(c),
            _ => None,
        }
    }

    /// Drop `$not` sub-conditions. Removing a restriction only widens
    /// the realized set, so a completeness verdict reached afterwards
    /// still covers the narrower original query.
    pub fn without_not(&self) -> Condition {
        match self {
            Condition::Ops(ops) => Condition::Ops(
                ops.iter()
                    .filter(|(_, op)| !matches!(op, OpCond::Not(_)))
                    .map(|(k, op)| (*k, op.clone()))
                    .collect::<BTreeMap<_, _>>(),
            ),
            _ => self.clone(),
        }
    }
}

fn parse_op(key: &str, arg: &Value) -> Result<OpCond> {
    let scalar = || Constant::parse(arg);
    let list = || -> Result<Vec<Constant>> {
        match arg {
            Value::Array(items) => items.iter().map(Constant::parse).collect(),
            other => Err(Error::BadQuery(format!("{key} expects a list, got {other}"))),
        }
    };
    match key {
        "$lte" => Ok(OpCond::Lte(scalar()?)),
        "$lt" => Ok(OpCond::Lt(scalar()?)),
        "$gte" => Ok(OpCond::Gte(scalar()?)),
        "$gt" => Ok(OpCond::Gt(scalar()?)),
        "$ne" => Ok(OpCond::Ne(scalar()?)),
        "$in" => Ok(OpCond::In(list()?)),
        "$nin" => Ok(OpCond::Nin(list()?)),
        "$not" => Ok(OpCond::Not(Box::new(Condition::parse(arg)?))),
        "$mod" => {
            let pair = list()?;
            match pair.as_slice() {
                [Constant::Int(r), Constant::Int(d)] => Ok(OpCond::Mod(*r, *d)),
                _ => Err(Error::BadQuery(format!(
                    "$mod expects two integers, got {arg}"
                ))),
            }
        }
        _ => Err(Error::UnknownOperator(key.to_string())),
    }
}

/// A parsed query: per-field constraints plus top-level combinators
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub fields: BTreeMap<String, Condition>,
    pub or: Vec<Query>,
    pub and: Vec<Query>,
}

impl Query {
    /// Parse a JSON object into a query, rejecting unknown `$` keys
    pub fn parse(value: &Value) -> Result<Query> {
        let map = match value {
            Value::Object(map) => map,
            other => return Err(Error::BadQuery(format!("query must be an object: {other}"))),
        };
        let mut query = Query::default();
        for (key, val) in map {
            match key.as_str() {
                "$or" => query.or = parse_branches(key, val)?,
                "$and" => query.and = parse_branches(key, val)?,
                k if k.starts_with('$') => {
                    return Err(Error::UnknownOperator(k.to_string()));
                }
                field => {
                    query
                        .fields
                        .insert(field.to_string(), Condition::parse(val)?);
                }
            }
        }
        Ok(query)
    }

    /// Parse from a JSON string
    pub fn parse_str(json: &str) -> Result<Query> {
        let value: Value = serde_json::from_str(json)?;
        Query::parse(&value)
    }

    /// No constraints at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.or.is_empty() && self.and.is_empty()
    }

    /// Every column the query touches, recursively
    pub fn columns(&self) -> BTreeSet<String> {
        let mut out: BTreeSet<String> = self.fields.keys().cloned().collect();
        for sub in self.or.iter().chain(self.and.iter()) {
            out.extend(sub.columns());
        }
        out
    }
}

fn parse_branches(key: &str, value: &Value) -> Result<Vec<Query>> {
    match value {
        Value::Array(items) => items.iter().map(Query::parse).collect(),
        other => Err(Error::BadQuery(format!(
            "{key} expects a list of queries, got {other}"
        ))),
    }
}
