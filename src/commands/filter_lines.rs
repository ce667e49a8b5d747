//! Streaming filter over delimited records.
//!
//! Reads the input once, line by line. Specifications that depend on the
//! header (filter expressions, column projection) are compiled right after
//! the header is read and stay fixed for the rest of the run.
//!
//! # Errors
//!
//! The run stops at the first problem: a record whose column count differs
//! from the header (or first record), a missing column, or a value that
//! cannot be compared. Nothing already written is retracted.

use crate::config::{FilterConfig, Selection};
use crate::decision::{decide, Action, Operation};
use crate::error::{FilterError, Result};
use crate::matcher::{FilterMatcher, KeywordMatcher, Matcher, RangeMatcher};
use crate::output::LineWriter;
use crate::projector::ColumnProjector;
use crate::reader::LineReader;
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// Per-run strategy compiled from the config and the header.
enum Engine<'a> {
    Rows(Matcher<'a>),
    Columns(ColumnProjector),
}

/// Streaming line filter.
#[derive(Debug, Clone)]
pub struct FilterLinesCommand {
    config: FilterConfig,
}

impl FilterLinesCommand {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Filter a file.
    pub fn run<P: AsRef<Path>, W: Write, X: Write>(
        &self,
        input: P,
        output: &mut LineWriter<W>,
        excluded: Option<&mut LineWriter<X>>,
    ) -> Result<FilterStats> {
        let mut reader = LineReader::<File>::from_path(input)?;
        self.run_streaming(&mut reader, output, excluded)
    }

    /// Filter stdin.
    pub fn run_stdin<W: Write, X: Write>(
        &self,
        output: &mut LineWriter<W>,
        excluded: Option<&mut LineWriter<X>>,
    ) -> Result<FilterStats> {
        let stdin = io::stdin();
        let mut reader = LineReader::new(stdin.lock());
        self.run_streaming(&mut reader, output, excluded)
    }

    /// Filter in-memory content, returning the kept and excluded text.
    pub fn run_str(&self, content: &str) -> Result<(String, String, FilterStats)> {
        let (kept, excluded, stats) = self.run_bytes(content.as_bytes())?;
        Ok((
            String::from_utf8_lossy(&kept).into_owned(),
            String::from_utf8_lossy(&excluded).into_owned(),
            stats,
        ))
    }

    /// Filter in-memory bytes, returning the kept and excluded output.
    pub fn run_bytes(&self, content: &[u8]) -> Result<(Vec<u8>, Vec<u8>, FilterStats)> {
        let mut reader = LineReader::new(content);
        let mut kept = LineWriter::new(Vec::new());
        let mut excluded = LineWriter::new(Vec::new());
        let stats = self.run_streaming(&mut reader, &mut kept, Some(&mut excluded))?;
        Ok((kept.into_inner()?, excluded.into_inner()?, stats))
    }

    /// Core filtering loop.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD for
    /// matching only; row filtering writes every line's original bytes.
    pub fn run_streaming<R: Read, W: Write, X: Write>(
        &self,
        reader: &mut LineReader<R>,
        output: &mut LineWriter<W>,
        mut excluded: Option<&mut LineWriter<X>>,
    ) -> Result<FilterStats> {
        self.config.validate()?;
        let sep = &self.config.separator;
        let combine = self.config.combine;
        let operation = self.config.effective_operation();
        let mut stats = FilterStats::new(operation);

        let header = if self.config.reads_header() {
            reader.next_line()?.map(|(_, raw)| raw.to_vec())
        } else {
            None
        };
        let header_text = header.as_deref().map(String::from_utf8_lossy);
        let header_fields = header_text.as_deref().map(|h| sep.split(h));
        let engine = self.compile(header_fields.as_deref())?;

        if let (Some(raw), Some(fields)) = (header.as_deref(), header_fields.as_deref()) {
            stats.kept += 1;
            match &engine {
                Engine::Rows(_) => output.write_raw(raw)?,
                Engine::Columns(projector) => {
                    output.write_line(&projector.project(fields, sep))?;
                    if let Some(ex) = excluded.as_deref_mut() {
                        ex.write_line(&projector.project_complement(fields, sep))?;
                    }
                }
            }
        }

        let mut expected = header_fields.as_ref().map(Vec::len);
        while let Some((line_number, raw)) = reader.next_line()? {
            let line = String::from_utf8_lossy(raw);
            if line.trim().is_empty() {
                continue;
            }
            let fields = sep.split(&line);
            match expected {
                None => expected = Some(fields.len()),
                Some(n) if n != fields.len() => {
                    return Err(FilterError::Ragged {
                        line: line_number,
                        found: fields.len(),
                        expected: n,
                    })
                }
                Some(_) => {}
            }

            match &engine {
                Engine::Columns(projector) => {
                    output.write_line(&projector.project(&fields, sep))?;
                    if let Some(ex) = excluded.as_deref_mut() {
                        ex.write_line(&projector.project_complement(&fields, sep))?;
                    }
                    stats.kept += 1;
                }
                Engine::Rows(matcher) => {
                    let outcome = matcher
                        .evaluate(&fields)
                        .map_err(|e| FilterError::at_line(line_number, e))?;
                    match decide(outcome.matched(combine), operation) {
                        Action::Primary => {
                            output.write_raw(raw)?;
                            stats.kept += 1;
                        }
                        Action::Secondary => {
                            if let Some(ex) = excluded.as_deref_mut() {
                                ex.write_raw(raw)?;
                            }
                            stats.removed += 1;
                        }
                    }
                }
            }
        }

        stats.lines = reader.line_number();
        output.flush()?;
        if let Some(ex) = excluded {
            ex.flush()?;
        }
        Ok(stats)
    }

    fn compile(&self, header: Option<&[&str]>) -> Result<Engine<'_>> {
        let header = header.unwrap_or(&[]);
        let engine = match &self.config.selection {
            Selection::Keywords {
                targets,
                columns,
                substring,
            } => {
                log::debug!("matching against {} keywords", targets.len());
                Engine::Rows(Matcher::Keyword(KeywordMatcher::new(
                    targets,
                    columns.as_deref(),
                    *substring,
                )))
            }
            Selection::Ranges {
                targets,
                chrom,
                pos_index,
            } => {
                log::debug!("matching against ranges on {} chromosomes", targets.chrom_count());
                Engine::Rows(Matcher::Range(RangeMatcher::new(
                    targets, chrom, *pos_index,
                )))
            }
            Selection::Filters {
                expr,
                partial_match,
            } => {
                let spec = expr.compile(header, *partial_match)?;
                Engine::Rows(Matcher::Filter(FilterMatcher::new(spec)))
            }
            Selection::Columns { targets } => Engine::Columns(ColumnProjector::from_header(
                header,
                targets,
                self.config.effective_operation(),
            )),
        };
        Ok(engine)
    }
}

/// Line counts for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    /// Every line read, header and blank lines included.
    pub lines: usize,
    /// Lines written to the primary output, header included.
    pub kept: usize,
    /// Data lines routed away from the primary output.
    pub removed: usize,
    operation: Operation,
}

impl FilterStats {
    pub fn new(operation: Operation) -> Self {
        Self {
            lines: 0,
            kept: 0,
            removed: 0,
            operation,
        }
    }
}

impl fmt::Display for FilterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (action, n) = match self.operation {
            Operation::Keep => ("kept", self.kept),
            Operation::Remove => ("removed", self.removed),
        };
        write!(f, "{} {} of the {} lines", action, n, self.lines)
    }
}
