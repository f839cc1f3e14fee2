//! Header schema: header text to column index.

use std::collections::HashMap;

use crate::sheet::Cell;

/// Mapping from header cell text to its column position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: HashMap<String, usize>,
    width: usize,
}

impl Schema {
    /// Build a schema from the cells of the header row.
    ///
    /// Blank header cells are skipped, so a blank column can never be
    /// targeted. When two cells carry the same text the later one wins.
    pub fn from_header<C: Cell>(header: &[C]) -> Self {
        let mut columns = HashMap::with_capacity(header.len());
        for (index, cell) in header.iter().enumerate() {
            let text = cell.text();
            if text.is_empty() {
                continue;
            }
            columns.insert(text.into_owned(), index);
        }
        Self {
            columns,
            width: header.len(),
        }
    }

    /// Column index for a header name
    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    /// Number of cells in the header row, blanks included.
    ///
    /// Data rows with fewer cells than this end the binding.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Header names ordered by column
    pub fn entries(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .columns
            .iter()
            .map(|(name, index)| (name.as_str(), *index))
            .collect();
        entries.sort_by_key(|(_, index)| *index);
        entries
    }
}
