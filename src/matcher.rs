//! Per-record match evaluation.
//!
//! Three strategies share one contract: given the fields of a record,
//! produce an [`Outcome`] recording which per-column results were seen.
//!
//! - [`KeywordMatcher`]: field values looked up in a keyword set
//! - [`RangeMatcher`]: a chrom/position pair looked up in a range set
//! - [`FilterMatcher`]: operator comparisons against named columns

use crate::decision::Outcome;
use crate::error::RecordError;
use crate::filters::FilterSpec;
use crate::targets::{KeywordSet, RangeSet};
use std::borrow::Cow;

/// Where the chromosome of a record comes from in range mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChromSource {
    /// 0-based column index.
    Column(usize),
    /// Every record is on this chromosome.
    Assumed(String),
}

/// Fetch a field, reporting the 1-based column on failure.
#[inline]
fn field<'f>(fields: &[&'f str], index: usize) -> Result<&'f str, RecordError> {
    fields
        .get(index)
        .copied()
        .ok_or(RecordError::ColumnOutOfRange {
            column: index + 1,
            fields: fields.len(),
        })
}

/// Keyword membership over a set of columns.
#[derive(Debug, Clone)]
pub struct KeywordMatcher<'a> {
    targets: &'a KeywordSet,
    /// 0-based columns to inspect; `None` inspects every column.
    columns: Option<&'a [usize]>,
    /// Match when exactly one keyword is a substring of the field.
    substring: bool,
}

impl<'a> KeywordMatcher<'a> {
    pub fn new(targets: &'a KeywordSet, columns: Option<&'a [usize]>, substring: bool) -> Self {
        Self {
            targets,
            columns,
            substring,
        }
    }

    #[inline]
    fn lookup(&self, normalized: &str) -> bool {
        if self.substring {
            self.targets.count_substrings_in(normalized) == 1
        } else {
            self.targets.contains(normalized)
        }
    }

    pub fn evaluate(&self, fields: &[&str]) -> Result<Outcome, RecordError> {
        let mut outcome = Outcome::new();
        // Adjacent columns often repeat a value; reuse the previous lookup.
        let mut last: Option<(Cow<'_, str>, bool)> = None;

        let count = self.columns.map_or(fields.len(), <[usize]>::len);
        for n in 0..count {
            let column = self.columns.map_or(n, |cols| cols[n]);
            let value = self.targets.normalize(field(fields, column)?.trim());
            let found = match last.as_ref() {
                Some((prev, found)) if *prev == value => *found,
                _ => self.lookup(&value),
            };
            outcome.record(found);
            last = Some((value, found));
        }

        Ok(outcome)
    }
}

/// Point-in-interval lookup for genomic positions.
#[derive(Debug, Clone)]
pub struct RangeMatcher<'a> {
    targets: &'a RangeSet,
    chrom: &'a ChromSource,
    /// 0-based position column.
    pos_index: usize,
}

impl<'a> RangeMatcher<'a> {
    pub fn new(targets: &'a RangeSet, chrom: &'a ChromSource, pos_index: usize) -> Self {
        Self {
            targets,
            chrom,
            pos_index,
        }
    }

    pub fn evaluate(&self, fields: &[&str]) -> Result<Outcome, RecordError> {
        let chrom = match self.chrom {
            ChromSource::Column(index) => field(fields, *index)?,
            ChromSource::Assumed(chrom) => chrom.as_str(),
        };
        let raw = field(fields, self.pos_index)?;
        let pos: i64 = raw
            .trim()
            .parse()
            .map_err(|_| RecordError::InvalidPosition {
                value: raw.to_string(),
            })?;

        if self.targets.contains(chrom, pos) {
            Ok(Outcome::TRUE)
        } else {
            Ok(Outcome::FALSE)
        }
    }
}

/// Operator comparisons from a compiled filter expression.
#[derive(Debug, Clone)]
pub struct FilterMatcher {
    spec: FilterSpec,
}

impl FilterMatcher {
    pub fn new(spec: FilterSpec) -> Self {
        Self { spec }
    }

    pub fn evaluate(&self, fields: &[&str]) -> Result<Outcome, RecordError> {
        let mut outcome = Outcome::new();
        for (op, index, values) in self.spec.clauses() {
            let value = field(fields, index)?;
            for target in values {
                let result = op.apply(value, target)?;
                log::debug!("\"{}\" \"{}\" \"{}\" {}", value, op, target, result);
                outcome.record(result);
            }
        }
        Ok(outcome)
    }
}

/// The matching strategy selected for a run.
#[derive(Debug, Clone)]
pub enum Matcher<'a> {
    Keyword(KeywordMatcher<'a>),
    Range(RangeMatcher<'a>),
    Filter(FilterMatcher),
}

impl Matcher<'_> {
    #[inline]
    pub fn evaluate(&self, fields: &[&str]) -> Result<Outcome, RecordError> {
        match self {
            Matcher::Keyword(m) => m.evaluate(fields),
            Matcher::Range(m) => m.evaluate(fields),
            Matcher::Filter(m) => m.evaluate(fields),
        }
    }
}
