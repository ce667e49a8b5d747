//! Error types shared by every stage of the filter.

use std::io;
use thiserror::Error;

/// Errors that abort a filtering run.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Bad option combination, missing target file, malformed filter clause.
    #[error("{0}")]
    Config(String),

    #[error("Parse error in {source_name} at line {line}: {message}")]
    Parse {
        source_name: String,
        line: usize,
        message: String,
    },

    #[error("The column name \"{name}\" was not found on the header line.\nMaybe you forgot to specify the correct --sep?")]
    MissingColumn { name: String },

    #[error("{count} unequal matches for column name \"{name}\"")]
    AmbiguousColumn { name: String, count: usize },

    #[error("line {line} had {found} columns but the previous lines had {expected}.\nThis program only works if all of the lines in the input have the same number of columns.\nMaybe you are not using the correct --sep?")]
    Ragged {
        line: usize,
        found: usize,
        expected: usize,
    },

    #[error("line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: RecordError,
    },
}

/// Errors raised while evaluating a single record.
///
/// These carry no line number; the read loop attaches it through
/// [`FilterError::Record`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("column {column} requested but the record has only {fields} columns")]
    ColumnOutOfRange { column: usize, fields: usize },

    #[error("cannot compare non-numeric value '{value}' with '{op}'")]
    NotNumeric { value: String, op: &'static str },

    #[error("invalid position '{value}'")]
    InvalidPosition { value: String },
}

impl FilterError {
    /// Attach a line number to a record-level error.
    pub fn at_line(line: usize, source: RecordError) -> Self {
        FilterError::Record { line, source }
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;
