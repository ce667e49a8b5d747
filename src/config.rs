//! Run configuration for a filtering pass.
//!
//! A [`FilterConfig`] is built once at startup (target files already
//! loaded) and handed to [`crate::commands::FilterLinesCommand`]. Nothing
//! in it changes while records are processed.

use crate::decision::{Combine, Operation};
use crate::error::{FilterError, Result};
use crate::fields::Separator;
use crate::filters::FilterExpr;
pub use crate::matcher::ChromSource;
use crate::targets::{KeywordSet, RangeSet};

/// What records are matched against.
#[derive(Debug, Clone)]
pub enum Selection {
    /// Field values looked up in a keyword set.
    Keywords {
        targets: KeywordSet,
        /// 0-based columns to inspect; `None` means every column.
        columns: Option<Vec<usize>>,
        substring: bool,
    },
    /// Chrom/position looked up in a range set.
    Ranges {
        targets: RangeSet,
        chrom: ChromSource,
        /// 0-based position column.
        pos_index: usize,
    },
    /// Column comparisons resolved against the header.
    Filters { expr: FilterExpr, partial_match: bool },
    /// Header names looked up in a keyword set; selects columns, not rows.
    Columns { targets: KeywordSet },
}

/// Immutable configuration for one run.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub separator: Separator,
    /// Pass the first line through unfiltered.
    pub header: bool,
    pub operation: Operation,
    pub combine: Combine,
    pub selection: Selection,
}

impl FilterConfig {
    /// A keep/OR/tab configuration without a header line.
    pub fn new(selection: Selection) -> Self {
        Self {
            separator: Separator::default(),
            header: false,
            operation: Operation::Keep,
            combine: Combine::Any,
            selection,
        }
    }

    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }

    pub fn with_combine(mut self, combine: Combine) -> Self {
        self.combine = combine;
        self
    }

    /// Whether the first line is consumed as a header.
    ///
    /// Filter expressions and column projection need names, so they always
    /// read one.
    pub fn reads_header(&self) -> bool {
        self.header
            || matches!(
                self.selection,
                Selection::Filters { .. } | Selection::Columns { .. }
            )
    }

    /// The operation actually applied: filter expressions always keep.
    pub fn effective_operation(&self) -> Operation {
        match self.selection {
            Selection::Filters { .. } => Operation::Keep,
            _ => self.operation,
        }
    }

    /// Reject configurations that cannot be evaluated.
    pub fn validate(&self) -> Result<()> {
        match &self.selection {
            Selection::Keywords {
                columns: Some(columns),
                ..
            } if columns.is_empty() => Err(FilterError::Config(
                "--column was given without any column numbers".to_string(),
            )),
            Selection::Ranges {
                chrom: ChromSource::Column(chrom),
                pos_index,
                ..
            } if chrom == pos_index => Err(FilterError::Config(
                "--chr-index and --pos-index point at the same column".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Convert a 1-based column number given to `option` to a 0-based index.
pub fn zero_based_index(column: usize, option: &str) -> Result<usize> {
    column.checked_sub(1).ok_or_else(|| {
        FilterError::Config(format!(
            "{} uses 1-based column numbers; 0 is not a valid column",
            option
        ))
    })
}

/// Convert 1-based column numbers to 0-based indexes. Items may carry
/// surrounding whitespace, as in `--column "1, 2"`.
pub fn zero_based<S: AsRef<str>>(columns: &[S], option: &str) -> Result<Vec<usize>> {
    columns
        .iter()
        .map(|c| {
            let item = c.as_ref().trim();
            let column = item.parse::<usize>().map_err(|_| {
                FilterError::Config(format!("{} expects column numbers, got \"{}\"", option, item))
            })?;
            zero_based_index(column, option)
        })
        .collect()
}
