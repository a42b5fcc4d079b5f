/// Text grid parser for pasted bed meshes
use nom::{
    character::complete::{digit1, one_of},
    combinator::{all_consuming, peek},
    number::complete::double,
    sequence::preceded,
    IResult,
};

use crate::config::{GridFormat, ParserConfig};
use crate::error::{FormatError, ParseResult};
use crate::grid::Matrix;

/// Parse text with the default (signed) grammar.
pub fn parse(input: &str) -> ParseResult<Matrix> {
    GridParser::default().parse(input)
}

/// Converts pasted text into a [`Matrix`] using exactly one grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridParser {
    config: ParserConfig,
}

/// A candidate row together with the input line it came from.
struct DataRow {
    line: usize,
    values: Vec<f64>,
}

impl GridParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn parse(&self, input: &str) -> ParseResult<Matrix> {
        let mut rows = Vec::new();
        // Only the first numeric line of a row-indexed dump may be a header.
        let mut expect_header = true;

        for (index, raw) in input.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.ends_with(':') {
                continue;
            }

            let row = match self.config.format {
                GridFormat::Signed => signed_row(trimmed, line)?,
                GridFormat::RowIndexed => {
                    if expect_header && is_column_header(trimmed) {
                        expect_header = false;
                        continue;
                    }
                    indexed_row(trimmed, line)?
                }
            };
            if let Some(values) = row {
                expect_header = false;
                rows.push(DataRow { line, values });
            }
        }

        let matrix = into_matrix(rows)?;
        log::debug!(
            "parsed {}x{} grid ({:?} format)",
            matrix.rows(),
            matrix.cols(),
            self.config.format
        );
        Ok(matrix)
    }
}

/// Canonical grammar: data lines start with a sign and every value carries one.
fn signed_row(line_text: &str, line: usize) -> ParseResult<Option<Vec<f64>>> {
    if line_text.starts_with(['+', '-']) {
        return line_text
            .split_whitespace()
            .map(|token| finite(signed_value, token, line))
            .collect::<ParseResult<Vec<_>>>()
            .map(Some);
    }

    // Unsigned numbers or an index column: data in the other convention.
    if all_tokens(line_text, |token| plain_value(token).is_ok()) {
        return Err(FormatError::UnsignedValue { line });
    }

    Ok(None)
}

/// Row-indexed grammar: `<index> <value> <value> ...`.
///
/// A line holding only an index carries no offsets and is ignored.
fn indexed_row(line_text: &str, line: usize) -> ParseResult<Option<Vec<f64>>> {
    let mut tokens = line_text.split_whitespace();
    let Some(first) = tokens.next() else {
        return Ok(None);
    };

    if row_index(first).is_ok() {
        let values = tokens
            .map(|token| finite(plain_value, token, line))
            .collect::<ParseResult<Vec<_>>>()?;
        return Ok((!values.is_empty()).then_some(values));
    }

    if signed_value(first).is_ok() {
        return Err(FormatError::MissingRowIndex { line });
    }

    Ok(None)
}

/// Column header such as `0 1 2 3 4`: bare indices counting up from zero.
fn is_column_header(line_text: &str) -> bool {
    line_text
        .split_whitespace()
        .enumerate()
        .all(|(column, token)| row_index(token).is_ok() && token.parse::<usize>() == Ok(column))
}

fn into_matrix(rows: Vec<DataRow>) -> ParseResult<Matrix> {
    let Some(first) = rows.first() else {
        return Err(FormatError::EmptyInput);
    };

    let expected = first.values.len();
    if let Some(ragged) = rows.iter().find(|row| row.values.len() != expected) {
        return Err(FormatError::RaggedRows {
            line: ragged.line,
            expected,
            found: ragged.values.len(),
        });
    }

    Ok(Matrix::from_rows(
        rows.into_iter().map(|row| row.values).collect(),
    ))
}

fn all_tokens(line_text: &str, predicate: impl Fn(&str) -> bool) -> bool {
    line_text.split_whitespace().all(predicate)
}

fn finite(
    parser: fn(&str) -> IResult<&str, f64>,
    token: &str,
    line: usize,
) -> ParseResult<f64> {
    match parser(token) {
        Ok((_, value)) if value.is_finite() => Ok(value),
        _ => Err(FormatError::NonNumericToken {
            line,
            token: token.to_string(),
        }),
    }
}

fn signed_value(input: &str) -> IResult<&str, f64> {
    all_consuming(preceded(peek(one_of("+-")), double))(input)
}

fn plain_value(input: &str) -> IResult<&str, f64> {
    all_consuming(double)(input)
}

fn row_index(input: &str) -> IResult<&str, &str> {
    all_consuming(digit1)(input)
}
