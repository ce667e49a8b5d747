//! Column filter expressions such as `weight>13,taste=good`.
//!
//! An expression is parsed into a [`FilterExpr`] keyed by column name, then
//! compiled against the header into a [`FilterSpec`] keyed by column index.

use crate::error::{FilterError, RecordError, Result};
use crate::header::{resolve_columns, ColumnIndexMap};
use std::collections::BTreeMap;
use std::fmt;

/// Comparison operators, in the order clauses are scanned for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operator {
    Ne,
    Eq,
    Lt,
    Gt,
}

impl Operator {
    /// `!=` comes before `=` so that `a!=b` is never read as `a!` `=` `b`.
    pub const ALL: [Operator; 4] = [Operator::Ne, Operator::Eq, Operator::Lt, Operator::Gt];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Ne => "!=",
            Operator::Eq => "=",
            Operator::Lt => "<",
            Operator::Gt => ">",
        }
    }

    /// Compare a record field against a filter value.
    ///
    /// `<` and `>` require both sides to be numeric. `=` and `!=` compare
    /// numerically when both sides parse as numbers and as strings otherwise;
    /// a number never equals a non-number.
    pub fn apply(self, field: &str, value: &str) -> std::result::Result<bool, RecordError> {
        match self {
            Operator::Lt => Ok(self.numeric(field)? < self.numeric(value)?),
            Operator::Gt => Ok(self.numeric(field)? > self.numeric(value)?),
            Operator::Eq => Ok(Operand::of(field) == Operand::of(value)),
            Operator::Ne => Ok(Operand::of(field) != Operand::of(value)),
        }
    }

    fn numeric(self, s: &str) -> std::result::Result<f64, RecordError> {
        parse_float(s).ok_or_else(|| RecordError::NotNumeric {
            value: s.to_string(),
            op: self.symbol(),
        })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A value coerced for `=` / `!=`.
#[derive(Debug, PartialEq)]
enum Operand<'a> {
    Number(f64),
    Text(&'a str),
}

impl<'a> Operand<'a> {
    fn of(s: &'a str) -> Self {
        match parse_float(s) {
            Some(n) => Operand::Number(n),
            None => Operand::Text(s),
        }
    }
}

#[inline]
fn parse_float(s: &str) -> Option<f64> {
    s.trim().parse().ok()
}

/// A parsed filter expression: operator -> column name -> values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterExpr {
    clauses: BTreeMap<Operator, BTreeMap<String, Vec<String>>>,
}

impl FilterExpr {
    /// Parse comma-separated `name<op>value` clauses.
    ///
    /// Each clause is split at the first occurrence of the first operator
    /// found in [`Operator::ALL`] order.
    pub fn parse(expr: &str) -> Result<Self> {
        let mut clauses: BTreeMap<Operator, BTreeMap<String, Vec<String>>> = BTreeMap::new();

        for raw in expr.split(',') {
            if raw.trim().is_empty() {
                continue;
            }
            let (op, name, value) = Operator::ALL
                .iter()
                .find_map(|&op| {
                    raw.split_once(op.symbol())
                        .map(|(name, value)| (op, name, value))
                })
                .ok_or_else(|| {
                    FilterError::Config(format!(
                        "The filter \"{}\" has no operator (expected one of !=, =, <, >)",
                        raw
                    ))
                })?;
            if name.is_empty() {
                return Err(FilterError::Config(format!(
                    "The filter \"{}\" has no column name",
                    raw
                )));
            }
            clauses
                .entry(op)
                .or_default()
                .entry(name.to_string())
                .or_default()
                .push(value.to_string());
        }

        if clauses.is_empty() {
            return Err(FilterError::Config(
                "The --filters expression is empty".to_string(),
            ));
        }
        Ok(Self { clauses })
    }

    /// Every column name referenced by the expression.
    pub fn column_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .clauses
            .values()
            .flat_map(|cols| cols.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Iterate `(operator, name, values)` clauses.
    pub fn clauses(&self) -> impl Iterator<Item = (Operator, &str, &[String])> {
        self.clauses.iter().flat_map(|(&op, cols)| {
            cols.iter()
                .map(move |(name, values)| (op, name.as_str(), values.as_slice()))
        })
    }

    /// Resolve names against `header` and produce an index-keyed spec.
    pub fn compile(&self, header: &[&str], partial_match: bool) -> Result<FilterSpec> {
        let map = resolve_columns(header, &self.column_names(), partial_match)?;
        self.compile_with(&map)
    }

    /// Produce an index-keyed spec from an already resolved column map.
    pub fn compile_with(&self, map: &ColumnIndexMap) -> Result<FilterSpec> {
        let mut spec = FilterSpec::default();
        for (op, name, values) in self.clauses() {
            let index = map.get(name).ok_or_else(|| FilterError::MissingColumn {
                name: name.to_string(),
            })?;
            log::info!("# filter: {} {} {:?}", name, op, values);
            spec.clauses
                .entry(op)
                .or_default()
                .entry(index)
                .or_default()
                .extend(values.iter().cloned());
        }
        log::debug!(
            "{} comparisons per line over {} columns",
            spec.comparison_count(),
            map.len()
        );
        Ok(spec)
    }
}

/// A compiled filter: operator -> column index -> values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    clauses: BTreeMap<Operator, BTreeMap<usize, Vec<String>>>,
}

impl FilterSpec {
    /// Iterate `(operator, column index, values)` clauses.
    pub fn clauses(&self) -> impl Iterator<Item = (Operator, usize, &[String])> {
        self.clauses.iter().flat_map(|(&op, cols)| {
            cols.iter()
                .map(move |(&index, values)| (op, index, values.as_slice()))
        })
    }

    /// Number of individual comparisons performed per record.
    pub fn comparison_count(&self) -> usize {
        self.clauses().map(|(_, _, values)| values.len()).sum()
    }
}
