//! Command implementations for filter-lines.

pub mod filter_lines;

pub use filter_lines::{FilterLinesCommand, FilterStats};
