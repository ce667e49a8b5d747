//! Field splitting for delimited records.
//!
//! Literal separators are located with memchr (single byte) or
//! memmem (multi-byte) so splitting a line never allocates more than
//! the field slice vector.

use crate::error::{FilterError, Result};
use memchr::{memchr_iter, memmem};

/// How a line is split into fields and how fields are joined on output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Separator {
    /// A literal string, used verbatim for both splitting and joining.
    Literal(String),
    /// Runs of whitespace split fields; output fields are joined with a single space.
    Whitespace,
}

impl Separator {
    /// Parse a separator token: `tab`, `space`, `whitespace`, or any literal string.
    pub fn parse(token: &str) -> Result<Self> {
        match token {
            "tab" => Ok(Separator::Literal("\t".to_string())),
            "space" => Ok(Separator::Literal(" ".to_string())),
            "whitespace" => Ok(Separator::Whitespace),
            "" => Err(FilterError::Config(
                "The field separator must not be empty".to_string(),
            )),
            other => Ok(Separator::Literal(other.to_string())),
        }
    }

    /// The string placed between fields when records are re-joined.
    #[inline]
    pub fn join_token(&self) -> &str {
        match self {
            Separator::Literal(s) => s,
            Separator::Whitespace => " ",
        }
    }

    /// Split a line (without its line terminator) into fields.
    pub fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self {
            Separator::Whitespace => line.split_whitespace().collect(),
            Separator::Literal(sep) if sep.len() == 1 => split_on_byte(line, sep.as_bytes()[0]),
            Separator::Literal(sep) => split_on_str(line, sep),
        }
    }
}

impl Default for Separator {
    fn default() -> Self {
        Separator::Literal("\t".to_string())
    }
}

fn split_on_byte(line: &str, sep: u8) -> Vec<&str> {
    let mut fields = Vec::with_capacity(16);
    let mut start = 0;
    for pos in memchr_iter(sep, line.as_bytes()) {
        fields.push(&line[start..pos]);
        start = pos + 1;
    }
    fields.push(&line[start..]);
    fields
}

fn split_on_str<'a>(line: &'a str, sep: &str) -> Vec<&'a str> {
    let mut fields = Vec::with_capacity(16);
    let mut start = 0;
    for pos in memmem::find_iter(line.as_bytes(), sep.as_bytes()) {
        fields.push(&line[start..pos]);
        start = pos + sep.len();
    }
    fields.push(&line[start..]);
    fields
}

/// Join the fields at `indexes` with the separator's output token.
pub fn join_selected(fields: &[&str], indexes: &[usize], sep: &Separator) -> String {
    let token = sep.join_token();
    let mut out = String::new();
    for (n, &i) in indexes.iter().enumerate() {
        if n > 0 {
            out.push_str(token);
        }
        out.push_str(fields[i]);
    }
    out
}
