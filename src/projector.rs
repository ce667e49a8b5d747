//! Column projection: select columns by header name instead of filtering rows.

use crate::decision::{decide, Action, Operation};
use crate::fields::{join_selected, Separator};
use crate::targets::KeywordSet;

/// Column selection decided once from the header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProjector {
    selected: Vec<usize>,
    complement: Vec<usize>,
}

impl ColumnProjector {
    /// Select header columns whose trimmed name is in `targets` (`Keep`),
    /// or is not (`Remove`).
    pub fn from_header(header: &[&str], targets: &KeywordSet, operation: Operation) -> Self {
        let mut selected = Vec::new();
        let mut complement = Vec::new();
        for (i, name) in header.iter().enumerate() {
            let present = targets.contains(&targets.normalize(name.trim()));
            match decide(present, operation) {
                Action::Primary => selected.push(i),
                Action::Secondary => complement.push(i),
            }
        }
        log::debug!(
            "projecting {} of {} columns",
            selected.len(),
            header.len()
        );
        Self {
            selected,
            complement,
        }
    }

    /// 0-based indexes written to the primary output.
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    /// 0-based indexes written to the excluded output.
    pub fn complement(&self) -> &[usize] {
        &self.complement
    }

    /// The selected fields joined with the output separator.
    pub fn project(&self, fields: &[&str], sep: &Separator) -> String {
        join_selected(fields, &self.selected, sep)
    }

    /// The complement fields joined with the output separator.
    pub fn project_complement(&self, fields: &[&str], sep: &Separator) -> String {
        join_selected(fields, &self.complement, sep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::parse_keywords;

    #[test]
    fn test_keep_named_columns() {
        let targets = parse_keywords("pos\nchrom\n", false);
        let header = ["chrom", "pos", "ref", "alt"];
        let p = ColumnProjector::from_header(&header, &targets, Operation::Keep);
        assert_eq!(p.selected(), &[0, 1]);
        assert_eq!(p.complement(), &[2, 3]);

        let sep = Separator::default();
        assert_eq!(p.project(&["1", "100", "A", "T"], &sep), "1\t100");
        assert_eq!(p.project_complement(&["1", "100", "A", "T"], &sep), "A\tT");
    }

    #[test]
    fn test_remove_named_columns() {
        let targets = parse_keywords("ref\n", false);
        let header = ["chrom", " ref ", "alt"];
        let p = ColumnProjector::from_header(&header, &targets, Operation::Remove);
        assert_eq!(p.selected(), &[0, 2]);
        assert_eq!(p.complement(), &[1]);
    }

    #[test]
    fn test_whitespace_separator_joins_with_space() {
        let targets = parse_keywords("b\nc\n", false);
        let p = ColumnProjector::from_header(&["a", "b", "c"], &targets, Operation::Keep);
        assert_eq!(p.project(&["1", "2", "3"], &Separator::Whitespace), "2 3");
    }

    #[test]
    fn test_case_folding_applies_to_header() {
        let targets = parse_keywords("POS\n", true);
        let p = ColumnProjector::from_header(&["Chrom", "Pos"], &targets, Operation::Keep);
        assert_eq!(p.selected(), &[1]);
    }
}
