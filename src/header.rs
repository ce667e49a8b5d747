//! Resolve column names to positions on the header line.

use crate::error::{FilterError, Result};
use std::collections::BTreeMap;

/// Column name -> 0-based column index, resolved once from the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndexMap {
    indexes: BTreeMap<String, usize>,
}

impl ColumnIndexMap {
    /// Index for `name`, if it was resolved.
    #[inline]
    pub fn get(&self, name: &str) -> Option<usize> {
        self.indexes.get(name).copied()
    }

    /// Number of distinct names resolved.
    pub(crate) fn len(&self) -> usize {
        self.indexes.len()
    }
}

/// Resolve every requested name against the header fields.
///
/// With `partial_match` a name matches any header field that contains it.
/// Each name must land on exactly one distinct position: more than one is
/// [`FilterError::AmbiguousColumn`], none is [`FilterError::MissingColumn`].
pub fn resolve_columns<S: AsRef<str>>(
    header: &[&str],
    names: &[S],
    partial_match: bool,
) -> Result<ColumnIndexMap> {
    let mut indexes = BTreeMap::new();

    for name in names {
        let name = name.as_ref();
        if indexes.contains_key(name) {
            continue;
        }

        let mut found: Option<usize> = None;
        let mut count = 0;
        for (pos, field) in header.iter().enumerate() {
            let hit = if partial_match {
                field.contains(name)
            } else {
                *field == name
            };
            if hit {
                count += 1;
                found.get_or_insert(pos);
            }
        }

        match (found, count) {
            (None, _) => {
                return Err(FilterError::MissingColumn {
                    name: name.to_string(),
                })
            }
            (Some(pos), 1) => {
                log::debug!("column \"{}\" resolved to index {}", name, pos + 1);
                indexes.insert(name.to_string(), pos);
            }
            (Some(_), count) => {
                return Err(FilterError::AmbiguousColumn {
                    name: name.to_string(),
                    count,
                })
            }
        }
    }

    Ok(ColumnIndexMap { indexes })
}
