/// Value range and summary aggregates over a grid
use serde::Serialize;

use crate::grid::Matrix;

/// Min/max bounds of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// True when every cell holds the same value.
    pub fn is_degenerate(&self) -> bool {
        self.max <= self.min
    }

    /// Divisor for normalization; 1 for a flat grid so nothing turns into NaN.
    pub fn span(&self) -> f64 {
        if self.is_degenerate() {
            1.0
        } else {
            self.max - self.min
        }
    }

    /// Position of `value` within the range, 0 at `min` and 1 at `max`.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            ((value - self.min) / self.span()).clamp(0.0, 1.0)
        }
    }
}

/// Scan every cell for its bounds.
pub fn range(matrix: &Matrix) -> ValueRange {
    let (min, max) = matrix
        .values()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
            (min.min(v), max.max(v))
        });
    ValueRange { min, max }
}

/// What the UI shell shows above the grid dump.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridSummary {
    pub rows: usize,
    pub cols: usize,
    pub range: ValueRange,
    pub mean: f64,
}

impl GridSummary {
    /// Peak-to-valley deviation of the bed.
    pub fn spread(&self) -> f64 {
        self.range.max - self.range.min
    }
}

pub fn summarize(matrix: &Matrix) -> GridSummary {
    let sum: f64 = matrix.values().sum();
    GridSummary {
        rows: matrix.rows(),
        cols: matrix.cols(),
        range: range(matrix),
        mean: sum / matrix.len() as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_range_of_two_by_two() {
        let m = parse("+1.0 +2.0\n-1.0 -2.0").unwrap();
        assert_eq!(range(&m), ValueRange::new(-2.0, 2.0));
    }

    #[test]
    fn test_degenerate_range() {
        let m = parse("+5.0").unwrap();
        let r = range(&m);
        assert_eq!(r, ValueRange::new(5.0, 5.0));
        assert!(r.is_degenerate());
        assert_eq!(r.span(), 1.0);
        assert_eq!(r.normalize(5.0), 0.0);
    }

    #[test]
    fn test_normalize() {
        let r = ValueRange::new(-2.0, 2.0);
        assert_eq!(r.normalize(-2.0), 0.0);
        assert_eq!(r.normalize(0.0), 0.5);
        assert_eq!(r.normalize(2.0), 1.0);
    }

    #[test]
    fn test_summary() {
        let m = parse("+1.0 +3.0\n-1.0 -1.0").unwrap();
        let s = summarize(&m);
        assert_eq!((s.rows, s.cols), (2, 2));
        assert!((s.mean - 0.5).abs() < 1e-12);
        assert!((s.spread() - 4.0).abs() < 1e-12);
    }
}
