//! filter-lines: streaming line filter for delimited text files.
//!
//! Each record (a line split on a configurable separator) is kept, removed
//! or routed to a secondary output according to one of three strategies:
//!
//! - **Keywords**: field values looked up in a keyword file, exactly or as
//!   a unique substring, optionally ignoring case
//! - **Ranges**: a chrom/position pair looked up in tabix-style
//!   `chrom:start-end` regions
//! - **Filters**: comparisons such as `weight>13,taste=good` against
//!   columns named on the header line
//!
//! Per-column results are joined with OR (default) or AND. Alternatively,
//! keyword files can select columns by header name instead of rows.
//!
//! # Example
//!
//! ```rust
//! use filter_lines::commands::FilterLinesCommand;
//! use filter_lines::config::{FilterConfig, Selection};
//! use filter_lines::targets::parse_keywords;
//!
//! let selection = Selection::Keywords {
//!     targets: parse_keywords("cat\n", false),
//!     columns: Some(vec![1]),
//!     substring: false,
//! };
//! let cmd = FilterLinesCommand::new(FilterConfig::new(selection));
//! let (kept, excluded, _stats) = cmd.run_str("1\tcat\n2\tdog\n").unwrap();
//!
//! assert_eq!(kept, "1\tcat\n");
//! assert_eq!(excluded, "2\tdog\n");
//! ```

pub mod commands;
pub mod config;
pub mod decision;
pub mod error;
pub mod fields;
pub mod filters;
pub mod header;
pub mod matcher;
pub mod output;
pub mod projector;
pub mod reader;
pub mod targets;

// Re-export commonly used types
pub use commands::{FilterLinesCommand, FilterStats};
pub use config::{FilterConfig, Selection};
pub use error::{FilterError, RecordError};
pub use targets::{KeywordSet, RangeSet, TargetSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::commands::{FilterLinesCommand, FilterStats};
    pub use crate::config::{ChromSource, FilterConfig, Selection};
    pub use crate::decision::{Action, Combine, Operation, Outcome};
    pub use crate::fields::Separator;
    pub use crate::filters::{FilterExpr, FilterSpec, Operator};
    pub use crate::matcher::Matcher;
    pub use crate::targets::{KeywordSet, RangeSet, TargetKind, TargetSet};
}
