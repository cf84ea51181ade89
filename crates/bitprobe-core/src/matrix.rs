//! Numeric matrix sources.
//!
//! A source file is either a JSON object whose keys name arrays, or a plain
//! text grid of numbers. For JSON containers, keys starting with
//! [`METADATA_PREFIX`] are skipped and the first remaining key (in file
//! order) is the primary array.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::PrepError;

/// Keys beginning with this prefix carry container metadata, not data.
pub const METADATA_PREFIX: &str = "__";

/// A rectangular matrix of reals, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl SourceMatrix {
    /// Build from row-major storage. Returns `None` if `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Option<Self> {
        (rows.checked_mul(cols)? == data.len()).then_some(Self { rows, cols, data })
    }

    pub(crate) fn from_raw_parts(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(rows * cols, data.len());
        Self { rows, cols, data }
    }

    /// Build from nested rows; every row must have the same length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Option<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        if rows.iter().any(|r| r.as_ref().len() != cols) {
            return None;
        }
        let data = rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
        Some(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// A `1 × N` matrix.
    pub fn row_vector(data: Vec<f64>) -> Self {
        Self {
            rows: 1,
            cols: data.len(),
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Elements in natural storage order.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for c in 0..self.cols {
            for r in 0..self.rows {
                data.push(self.get(r, c));
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }
}

/// The primary array of a source file together with its key.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedMatrix {
    pub name: String,
    pub matrix: SourceMatrix,
}

/// Load the primary array from `path`.
pub fn load_matrix(path: &Path) -> Result<NamedMatrix, PrepError> {
    let content = fs::read_to_string(path).map_err(|source| PrepError::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(entries)) => {
            let (name, value) = entries
                .into_iter()
                .find(|(key, _)| !key.starts_with(METADATA_PREFIX))
                .ok_or_else(|| PrepError::NoArrayFound {
                    path: path.to_path_buf(),
                })?;
            let matrix = matrix_from_json(&name, &value)?;
            Ok(NamedMatrix { name, matrix })
        }
        Ok(value @ Value::Array(_)) => {
            let name = stem(path);
            let matrix = matrix_from_json(&name, &value)?;
            Ok(NamedMatrix { name, matrix })
        }
        Ok(_) => Err(PrepError::MalformedMatrix {
            name: stem(path),
            reason: "JSON source must be an object of named arrays or an array".to_string(),
        }),
        Err(_) => {
            let name = stem(path);
            let matrix = parse_text_grid(&name, &content)?.ok_or_else(|| {
                PrepError::NoArrayFound {
                    path: path.to_path_buf(),
                }
            })?;
            Ok(NamedMatrix { name, matrix })
        }
    }
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "matrix".to_string())
}

fn malformed(name: &str, reason: impl Into<String>) -> PrepError {
    PrepError::MalformedMatrix {
        name: name.to_string(),
        reason: reason.into(),
    }
}

fn number(name: &str, value: &Value) -> Result<f64, PrepError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| malformed(name, format!("{n} is not representable as f64"))),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        other => Err(malformed(name, format!("non-numeric element {other}"))),
    }
}

/// Scalars become `1 × 1`, flat arrays `1 × N`, nested arrays `R × C`.
fn matrix_from_json(name: &str, value: &Value) -> Result<SourceMatrix, PrepError> {
    let items = match value {
        Value::Array(items) => items,
        scalar => return Ok(SourceMatrix::row_vector(vec![number(name, scalar)?])),
    };

    if items.iter().all(|v| !v.is_array()) {
        let data = items
            .iter()
            .map(|v| number(name, v))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(SourceMatrix::row_vector(data));
    }

    let mut rows = Vec::with_capacity(items.len());
    for (i, row) in items.iter().enumerate() {
        let Value::Array(cells) = row else {
            return Err(malformed(name, format!("row {i} is not an array")));
        };
        let cells = cells
            .iter()
            .map(|v| number(name, v))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(cells);
    }
    SourceMatrix::from_rows(&rows).ok_or_else(|| malformed(name, "rows have unequal lengths"))
}

/// One row per line; cells split on whitespace or commas; `#` starts a comment.
fn parse_text_grid(name: &str, content: &str) -> Result<Option<SourceMatrix>, PrepError> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let row = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|cell| !cell.is_empty())
            .map(|cell| {
                cell.parse::<f64>().map_err(|_| {
                    malformed(name, format!("line {}: cannot parse '{cell}'", lineno + 1))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    if rows.is_empty() {
        return Ok(None);
    }
    SourceMatrix::from_rows(&rows)
        .map(Some)
        .ok_or_else(|| malformed(name, "rows have unequal lengths"))
}
