/// Validated bed mesh grid and grid coordinates
use std::fmt;

/// A rectangular grid of probed offsets.
///
/// Only the parser builds one, so every `Matrix` has at least one row, every
/// row has the same non-zero length and every value is finite. Cells are
/// stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
}

impl Matrix {
    /// Caller guarantees the invariants; see `parser::GridParser`.
    pub(crate) fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        let row_count = rows.len();
        let cols = rows.first().map_or(0, Vec::len);
        debug_assert!(row_count > 0 && cols > 0);
        debug_assert!(rows.iter().all(|row| row.len() == cols));

        Self {
            rows: row_count,
            cols,
            cells: rows.into_iter().flatten().collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells (`rows * cols`).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True only for a grid with no cells, which the parser never produces.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row < self.rows {
            let start = row * self.cols;
            Some(&self.cells[start..start + self.cols])
        } else {
            None
        }
    }

    /// All cells in row-major order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().copied()
    }

    /// All cells as grid points, row-major.
    pub fn points(&self) -> impl Iterator<Item = GridPoint> + '_ {
        self.cells.iter().enumerate().map(move |(index, &value)| GridPoint {
            row: index / self.cols,
            col: index % self.cols,
            value,
        })
    }
}

/// Grid dump as shown next to the surface: explicit `+` on positive values,
/// three decimals, one row per line.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            if row > 0 {
                writeln!(f)?;
            }
            let start = row * self.cols;
            for (col, value) in self.cells[start..start + self.cols].iter().enumerate() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", format_offset(*value))?;
            }
        }
        Ok(())
    }
}

/// Format one offset the way the grid dump does (`+0.125`, `-1.064`, `0.000`).
pub fn format_offset(value: f64) -> String {
    if value > 0.0 {
        format!("+{value:.3}")
    } else if value == 0.0 {
        // Avoids printing `-0.000` for negative zero.
        format!("{:.3}", 0.0)
    } else {
        format!("{value:.3}")
    }
}

/// One probed location: zero-based row/column plus its offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

impl GridPoint {
    pub fn new(row: usize, col: usize, value: f64) -> Self {
        Self { row, col, value }
    }

    /// Same grid location, ignoring the value.
    pub fn same_cell(&self, other: &GridPoint) -> bool {
        self.row == other.row && self.col == other.col
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point ({}, {}) = {}", self.col, self.row, format_offset(self.value))
    }
}
