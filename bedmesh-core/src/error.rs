/// Error types for grid parsing and viewpoint lookup
use thiserror::Error;

/// Result type for grid parsing.
pub type ParseResult<T> = Result<T, FormatError>;

/// Why a pasted grid could not be turned into a matrix.
///
/// Line numbers are 1-based positions in the submitted text. The `Display`
/// text is meant to be shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// No data line was found at all.
    #[error("no valid data found; paste rows of values such as `+0.125 -0.050 +0.010`")]
    EmptyInput,

    /// A data row has a different number of values than the first row.
    #[error("line {line}: expected {expected} values like the first row, found {found}; each row must have the same number of values")]
    RaggedRows {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A token on a data line is not a finite number in the active format.
    #[error("line {line}: `{token}` is not a valid value; each value must start with + or - (e.g. +1.234 or -0.567)")]
    NonNumericToken { line: usize, token: String },

    /// A numeric line without sign prefixes in the signed format.
    #[error("line {line}: values must start with + or -; row-indexed dumps need the row-indexed input format")]
    UnsignedValue { line: usize },

    /// Signed data without a leading row index in the row-indexed format.
    #[error("line {line}: expected a row index before the values; signed grids need the signed input format")]
    MissingRowIndex { line: usize },
}

impl FormatError {
    /// Input line the error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::EmptyInput => None,
            Self::RaggedRows { line, .. }
            | Self::NonNumericToken { line, .. }
            | Self::UnsignedValue { line }
            | Self::MissingRowIndex { line } => Some(*line),
        }
    }
}

/// Unknown viewpoint preset name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown viewpoint `{0}`; expected isometric, top or side")]
pub struct ParseViewpointError(pub String);
