use crate::error::MatrixError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal places used by the text export when none are requested
pub const DEFAULT_EXPORT_DECIMALS: usize = 2;

/// K x K interaction coefficients between color classes.
///
/// Entry (i, j) is the attraction a particle of color i feels towards a
/// neighbor of color j. The matrix is not symmetric in general.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttractionMatrix {
    size: usize,
    /// Row-major coefficients, each in [-1, 1]
    values: Vec<f64>,
}

impl AttractionMatrix {
    /// Sample a K x K matrix with entries drawn uniformly from [-1, 1]
    pub fn generate<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let values = (0..size * size)
            .map(|_| rng.gen_range(-1.0..=1.0))
            .collect();
        Self { size, values }
    }

    /// Build a matrix from explicit rows, checking shape and range
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, MatrixError> {
        if rows.is_empty() {
            return Err(MatrixError::Empty);
        }
        let size = rows.len();
        let mut values = Vec::with_capacity(size * size);
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(MatrixError::SizeMismatch {
                    expected: size,
                    actual: row.len(),
                });
            }
            for (col_idx, &value) in row.iter().enumerate() {
                if !(-1.0..=1.0).contains(&value) {
                    return Err(MatrixError::OutOfRange {
                        row: row_idx,
                        col: col_idx,
                        value,
                    });
                }
                values.push(value);
            }
        }
        Ok(Self { size, values })
    }

    /// Parse the row-per-line text produced by [`AttractionMatrix::to_text`]
    pub fn parse(text: &str) -> Result<Self, MatrixError> {
        let mut rows = Vec::new();
        for (row_idx, line) in text.lines().filter(|l| !l.trim().is_empty()).enumerate() {
            let row = line
                .split_whitespace()
                .map(|token| {
                    token.parse::<f64>().map_err(|_| MatrixError::Parse {
                        row: row_idx,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<f64>, MatrixError>>()?;
            rows.push(row);
        }
        Self::from_rows(&rows)
    }

    /// Number of color classes K
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    /// Row `i` as a slice, for per-particle lookups
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }

    /// Copy of the coefficients as nested rows
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values.chunks(self.size.max(1)).map(|r| r.to_vec()).collect()
    }

    /// One row per line, values separated by spaces, fixed decimal places
    pub fn to_text(&self, decimals: usize) -> String {
        let mut out = String::new();
        for row in self.values.chunks(self.size.max(1)) {
            let line = row
                .iter()
                .map(|v| format!("{:.*}", decimals, v))
                .collect::<Vec<_>>()
                .join(" ");
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for AttractionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(DEFAULT_EXPORT_DECIMALS))
    }
}
