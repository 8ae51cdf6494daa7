//! Row/column estimates for tabular text blocks.

use serde::{Deserialize, Serialize};

/// Cells longer than this count as running text when judging a table.
const LONG_CELL_CHARS: usize = 60;

/// Rows inspected when judging whether a grid is really prose.
const SAMPLE_ROWS: usize = 5;

/// Estimated shape of a table held in one text block.
///
/// Rows are the non-blank lines of the raw text. Cells are split on `|`
/// when the line has one, otherwise on tabs. The column count is taken
/// from the first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableShape {
    pub rows: u32,
    pub columns: u32,

    /// Cells with non-blank text
    pub filled_cells: u32,
}

impl TableShape {
    /// Estimate the shape of `raw`, or `None` if it does not look tabular.
    ///
    /// A table needs at least two columns in its first row. Grids whose
    /// sampled cells are mostly long running text are rejected.
    ///
    /// ```
    /// use docstruct::model::TableShape;
    ///
    /// let shape = TableShape::estimate("Name\tValue\nVBUS\t5 V\nIBUS\t").unwrap();
    /// assert_eq!((shape.rows, shape.columns, shape.filled_cells), (3, 2, 5));
    /// assert!(TableShape::estimate("plain prose").is_none());
    /// ```
    pub fn estimate(raw: &str) -> Option<Self> {
        let rows: Vec<Vec<&str>> = raw
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(split_cells)
            .collect();

        let columns = rows.first()?.len();
        if columns < 2 || reads_as_prose(&rows) {
            return None;
        }

        let filled_cells = rows
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count();

        Some(Self {
            rows: rows.len() as u32,
            columns: columns as u32,
            filled_cells: filled_cells as u32,
        })
    }

    /// Cells a full grid of this shape would hold.
    pub fn expected_cells(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.columns)
    }
}

fn split_cells(line: &str) -> Vec<&str> {
    let line = line.trim();
    if line.contains('|') {
        let line = line.strip_prefix('|').unwrap_or(line);
        let line = line.strip_suffix('|').unwrap_or(line);
        line.split('|').map(str::trim).collect()
    } else {
        line.split('\t').map(str::trim).collect()
    }
}

fn reads_as_prose(rows: &[Vec<&str>]) -> bool {
    let (long, total) = rows
        .iter()
        .take(SAMPLE_ROWS)
        .flatten()
        .filter(|cell| !cell.is_empty())
        .fold((0, 0), |(long, total), cell| {
            let is_long = cell.chars().count() > LONG_CELL_CHARS;
            (long + usize::from(is_long), total + 1)
        });
    total > 0 && long * 2 > total
}
