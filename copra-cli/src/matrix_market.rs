//! Reader for Matrix Market coordinate files.
//!
//! Supports `%%MatrixMarket matrix coordinate {real|integer|pattern}
//! {general|symmetric}`. Ids are 1-based and kept as-is, so id 0 is a gap
//! and the graph span is one more than the matrix dimension.

use std::io::BufRead;

use copra_core::AdjacencyGraph;
use thiserror::Error;

/// Errors raised while reading a Matrix Market file.
#[derive(Debug, Error)]
pub enum MatrixMarketError {
    /// The underlying reader failed.
    #[error("failed to read line {line}: {source}")]
    Read {
        /// 1-based line number being read.
        line: usize,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The input ended before the banner line.
    #[error("missing `%%MatrixMarket` banner")]
    MissingBanner,
    /// The banner names a format other than a real, integer or pattern
    /// coordinate matrix.
    #[error("line {line}: unsupported banner `{banner}`")]
    UnsupportedBanner {
        /// 1-based line number of the banner.
        line: usize,
        /// Banner as written.
        banner: String,
    },
    /// The input ended before the size line.
    #[error("missing size line")]
    MissingSize,
    /// A size or entry line could not be parsed.
    #[error("line {line}: {reason}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
    /// An entry refers to a row or column beyond the declared dimensions.
    #[error("line {line}: entry ({row}, {column}) lies outside a {rows}x{columns} matrix")]
    OutOfRange {
        /// 1-based line number.
        line: usize,
        /// Row as written.
        row: usize,
        /// Column as written.
        column: usize,
        /// Declared row count.
        rows: usize,
        /// Declared column count.
        columns: usize,
    },
    /// The number of entries differs from the size line.
    #[error("expected {expected} entries but found {found}")]
    EntryCount {
        /// Entries declared by the size line.
        expected: usize,
        /// Entries present in the file.
        found: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Weighted,
    Pattern,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Banner {
    field: Field,
    symmetric: bool,
}

fn parse_banner(line: usize, raw: &str) -> Result<Banner, MatrixMarketError> {
    let unsupported = || MatrixMarketError::UnsupportedBanner {
        line,
        banner: raw.trim().to_owned(),
    };
    let tokens: Vec<String> = raw.split_whitespace().map(str::to_ascii_lowercase).collect();
    let [magic, object, format, field, symmetry] = tokens.as_slice() else {
        return Err(unsupported());
    };
    if magic != "%%matrixmarket" || object != "matrix" || format != "coordinate" {
        return Err(unsupported());
    }
    let field = match field.as_str() {
        "real" | "integer" => Field::Weighted,
        "pattern" => Field::Pattern,
        _ => return Err(unsupported()),
    };
    let symmetric = match symmetry.as_str() {
        "general" => false,
        "symmetric" => true,
        _ => return Err(unsupported()),
    };
    Ok(Banner { field, symmetric })
}

fn parse_usize(line: usize, token: Option<&str>, what: &str) -> Result<usize, MatrixMarketError> {
    let token = token.ok_or_else(|| MatrixMarketError::Malformed {
        line,
        reason: format!("missing {what}"),
    })?;
    token.parse().map_err(|_| MatrixMarketError::Malformed {
        line,
        reason: format!("invalid {what} `{token}`"),
    })
}

/// Reads a Matrix Market coordinate matrix as a directed weighted graph.
///
/// Every id in `1..=max(rows, columns)` is live. Pattern entries get weight
/// 1 and symmetric files store each entry in both directions.
///
/// # Errors
/// Returns [`MatrixMarketError`] naming the offending line when the input
/// is not a supported coordinate matrix.
///
/// # Examples
/// ```
/// use copra_cli::matrix_market::read_matrix_market;
/// use copra_core::Graph;
///
/// let input = "%%MatrixMarket matrix coordinate pattern symmetric\n3 3 2\n2 1\n3 2\n";
/// let graph = read_matrix_market(input.as_bytes())?;
/// assert_eq!(graph.span(), 4);
/// assert_eq!(graph.order(), 3);
/// assert_eq!(graph.edge_weight(1, 2), Some(1.0));
/// # Ok::<(), copra_cli::matrix_market::MatrixMarketError>(())
/// ```
pub fn read_matrix_market<R: BufRead>(reader: R) -> Result<AdjacencyGraph, MatrixMarketError> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(index, line)| {
            let number = index + 1;
            line.map(|text| (number, text))
                .map_err(|source| MatrixMarketError::Read {
                    line: number,
                    source,
                })
        });

    let (banner_line, banner_text) = lines.next().ok_or(MatrixMarketError::MissingBanner)??;
    let banner = parse_banner(banner_line, &banner_text)?;

    let mut content = lines.filter(|item| {
        item.as_ref()
            .map_or(true, |(_, text)| {
                let trimmed = text.trim();
                !trimmed.is_empty() && !trimmed.starts_with('%')
            })
    });

    let (size_line, size_text) = content.next().ok_or(MatrixMarketError::MissingSize)??;
    let mut tokens = size_text.split_whitespace();
    let rows = parse_usize(size_line, tokens.next(), "row count")?;
    let columns = parse_usize(size_line, tokens.next(), "column count")?;
    let expected = parse_usize(size_line, tokens.next(), "entry count")?;

    let dimension = rows.max(columns);
    let span = dimension
        .checked_add(1)
        .ok_or_else(|| MatrixMarketError::Malformed {
            line: size_line,
            reason: format!("dimension {dimension} is too large"),
        })?;
    let mut graph =
        AdjacencyGraph::try_with_span(span).map_err(|_| MatrixMarketError::Malformed {
            line: size_line,
            reason: format!("cannot allocate a graph with {dimension} vertices"),
        })?;
    for vertex in 1..=dimension {
        graph.add_vertex(vertex);
    }

    let mut found = 0;
    for item in content {
        let (line, text) = item?;
        let mut tokens = text.split_whitespace();
        let row = parse_usize(line, tokens.next(), "row")?;
        let column = parse_usize(line, tokens.next(), "column")?;
        if row == 0 || column == 0 || row > rows || column > columns {
            return Err(MatrixMarketError::OutOfRange {
                line,
                row,
                column,
                rows,
                columns,
            });
        }
        let weight = match banner.field {
            Field::Pattern => 1.0,
            Field::Weighted => {
                let token = tokens.next().ok_or_else(|| MatrixMarketError::Malformed {
                    line,
                    reason: "missing value".to_owned(),
                })?;
                token.parse::<f64>().map_err(|_| MatrixMarketError::Malformed {
                    line,
                    reason: format!("invalid value `{token}`"),
                })?
            }
        };
        graph.add_edge(row, column, weight);
        if banner.symmetric && row != column {
            graph.add_edge(column, row, weight);
        }
        found += 1;
    }

    if found != expected {
        return Err(MatrixMarketError::EntryCount { expected, found });
    }
    Ok(graph)
}
