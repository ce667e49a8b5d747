//! Target sets loaded from the `--keep` / `--remove` file.
//!
//! Two shapes are supported:
//! - a keyword set, one token per line
//! - a range set of `chrom` or `chrom:start-end` entries (tabix-style,
//!   1-based inclusive coordinates)

use crate::error::{FilterError, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Which kind of target file to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Keywords,
    Ranges,
}

/// A set of keywords with an optional case-folding policy.
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    words: FxHashSet<String>,
    ignore_case: bool,
}

impl KeywordSet {
    /// Create an empty set.
    pub fn new(ignore_case: bool) -> Self {
        Self {
            words: FxHashSet::default(),
            ignore_case,
        }
    }

    /// Normalize a value the same way stored keywords were normalized.
    #[inline]
    pub fn normalize<'a>(&self, value: &'a str) -> Cow<'a, str> {
        if self.ignore_case {
            Cow::Owned(value.to_lowercase())
        } else {
            Cow::Borrowed(value)
        }
    }

    /// Insert a raw entry. Surrounding whitespace is trimmed; empty entries are ignored.
    pub fn insert(&mut self, entry: &str) {
        let entry = entry.trim();
        if entry.is_empty() {
            return;
        }
        let word = self.normalize(entry).into_owned();
        self.words.insert(word);
    }

    /// Membership test for an already-normalized value.
    #[inline]
    pub fn contains(&self, normalized: &str) -> bool {
        self.words.contains(normalized)
    }

    /// Number of keywords that occur as a substring of `normalized`.
    ///
    /// Stops counting once a second hit is found; callers only need to
    /// distinguish zero, one, and many.
    pub fn count_substrings_in(&self, normalized: &str) -> usize {
        let mut hits = 0;
        for word in &self.words {
            if normalized.contains(word.as_str()) {
                hits += 1;
                if hits > 1 {
                    break;
                }
            }
        }
        hits
    }

    #[inline]
    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Inclusive intervals for one chromosome.
#[derive(Debug, Clone, Default)]
pub struct ChromRanges {
    /// A bare `chrom` entry was seen: every position matches.
    whole: bool,
    /// `(start, end)` pairs sorted by start.
    spans: Vec<(i64, i64)>,
    /// `max_end[i]` is the largest end among `spans[..=i]`.
    max_end: Vec<i64>,
}

impl ChromRanges {
    fn finish(&mut self) {
        self.spans.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
        self.max_end.clear();
        let mut running = i64::MIN;
        for &(_, end) in &self.spans {
            running = running.max(end);
            self.max_end.push(running);
        }
    }

    /// True if `pos` falls inside any interval, or the whole chromosome is targeted.
    ///
    /// Every interval that can contain `pos` starts at or before it, and those
    /// form a prefix of the sorted list; `pos` is covered iff the largest end
    /// in that prefix reaches it.
    #[inline]
    pub fn contains(&self, pos: i64) -> bool {
        if self.whole {
            return true;
        }
        let n = self.spans.partition_point(|&(start, _)| start <= pos);
        n > 0 && self.max_end[n - 1] >= pos
    }

    #[inline]
    pub fn is_whole(&self) -> bool {
        self.whole
    }

    /// The sorted intervals.
    pub fn spans(&self) -> &[(i64, i64)] {
        &self.spans
    }
}

/// Chromosome -> sorted inclusive intervals.
#[derive(Debug, Clone, Default)]
pub struct RangeSet {
    by_chrom: FxHashMap<String, ChromRanges>,
}

impl RangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a range set from `(chrom, Option<(start, end)>)` entries.
    /// `None` marks the whole chromosome.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Option<(i64, i64)>)>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for (n, (chrom, span)) in entries.into_iter().enumerate() {
            set.push(chrom.into(), span, "ranges", n + 1)?;
        }
        set.finish();
        Ok(set)
    }

    fn push(
        &mut self,
        chrom: String,
        span: Option<(i64, i64)>,
        source_name: &str,
        line: usize,
    ) -> Result<()> {
        let ranges = self.by_chrom.entry(chrom).or_default();
        match span {
            None => ranges.whole = true,
            Some((start, end)) => {
                if start > end {
                    return Err(FilterError::Parse {
                        source_name: source_name.to_string(),
                        line,
                        message: format!("Start ({}) > end ({})", start, end),
                    });
                }
                ranges.spans.push((start, end));
            }
        }
        Ok(())
    }

    fn finish(&mut self) {
        for ranges in self.by_chrom.values_mut() {
            ranges.finish();
        }
    }

    /// Ranges for one chromosome, if any were listed.
    #[inline]
    pub fn get(&self, chrom: &str) -> Option<&ChromRanges> {
        self.by_chrom.get(chrom)
    }

    /// True if `pos` on `chrom` is covered by the set.
    #[inline]
    pub fn contains(&self, chrom: &str, pos: i64) -> bool {
        self.get(chrom).is_some_and(|r| r.contains(pos))
    }

    /// Number of chromosomes with at least one entry.
    pub fn chrom_count(&self) -> usize {
        self.by_chrom.len()
    }
}

/// A loaded target file.
#[derive(Debug, Clone)]
pub enum TargetSet {
    Keywords(KeywordSet),
    Ranges(RangeSet),
}

impl TargetSet {
    /// Load a target file from disk.
    pub fn from_path<P: AsRef<Path>>(path: P, kind: TargetKind, ignore_case: bool) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(FilterError::Config(format!(
                "The file \"{}\" does not exist or is not readable.",
                path.display()
            )));
        }
        let file = File::open(path)?;
        Self::from_reader(file, kind, ignore_case, &path.display().to_string())
    }

    /// Load a target set from any readable source.
    pub fn from_reader<R: Read>(
        reader: R,
        kind: TargetKind,
        ignore_case: bool,
        source_name: &str,
    ) -> Result<Self> {
        match kind {
            TargetKind::Keywords => Ok(TargetSet::Keywords(KeywordSet::from_reader(
                reader,
                ignore_case,
            )?)),
            TargetKind::Ranges => Ok(TargetSet::Ranges(RangeSet::from_reader(
                reader,
                source_name,
            )?)),
        }
    }
}

impl KeywordSet {
    /// Read one keyword per line.
    pub fn from_reader<R: Read>(reader: R, ignore_case: bool) -> Result<Self> {
        let mut set = KeywordSet::new(ignore_case);
        for line in BufReader::new(reader).lines() {
            set.insert(&line?);
        }
        Ok(set)
    }
}

impl RangeSet {
    /// Read `chrom` / `chrom:start-end` lines. Blank lines are skipped.
    pub fn from_reader<R: Read>(reader: R, source_name: &str) -> Result<Self> {
        let mut set = RangeSet::new();
        for (n, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (chrom, span) = parse_region(line).map_err(|message| FilterError::Parse {
                source_name: source_name.to_string(),
                line: n + 1,
                message,
            })?;
            set.push(chrom.to_string(), span, source_name, n + 1)?;
        }
        set.finish();
        Ok(set)
    }
}

/// Parse `chrom` or `chrom:start-end`.
fn parse_region(line: &str) -> std::result::Result<(&str, Option<(i64, i64)>), String> {
    let Some((chrom, coords)) = line.split_once(':') else {
        return Ok((line, None));
    };
    let (start, end) = coords
        .split_once('-')
        .ok_or_else(|| format!("Expected chrom:start-end, got '{}'", line))?;
    let start = parse_coord(start, "start")?;
    let end = parse_coord(end, "end")?;
    Ok((chrom, Some((start, end))))
}

fn parse_coord(s: &str, field_name: &str) -> std::result::Result<i64, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("Invalid {} position: '{}'", field_name, s.trim()))
}

/// Parse a keyword set from a string (useful for testing).
pub fn parse_keywords(content: &str, ignore_case: bool) -> KeywordSet {
    let mut set = KeywordSet::new(ignore_case);
    for line in content.lines() {
        set.insert(line);
    }
    set
}

/// Parse a range set from a string (useful for testing).
pub fn parse_ranges(content: &str) -> Result<RangeSet> {
    RangeSet::from_reader(content.as_bytes(), "ranges")
}
