//! In-memory data sets: flat sequences and rectangular grids of integers.

use serde::Serialize;

use crate::error::{Error, Result};

/// Inclusive range `[lo, hi]` that generated values are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValueRange {
    lo: i64,
    hi: i64,
}

impl ValueRange {
    pub fn new(lo: i64, hi: i64) -> Result<Self> {
        if lo > hi {
            return Err(Error::InvalidRange { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    pub fn lo(&self) -> i64 {
        self.lo
    }

    pub fn hi(&self) -> i64 {
        self.hi
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.lo..=self.hi).contains(&value)
    }
}

/// Ordered, fixed-length collection of integers. Never mutated after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence(Vec<i64>);

impl Sequence {
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, i64> {
        self.0.iter()
    }
}

impl From<Vec<i64>> for Sequence {
    fn from(values: Vec<i64>) -> Self {
        Self(values)
    }
}

impl FromIterator<i64> for Sequence {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// `rows` x `cols` integers stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<i64>,
}

impl Grid {
    /// Build from row-major storage; `cells.len()` must equal `rows * cols`.
    pub fn from_parts(rows: usize, cols: usize, cells: Vec<i64>) -> Result<Self> {
        let expected = rows
            .checked_mul(cols)
            .ok_or_else(|| Error::InvalidConfig(format!("grid {rows}x{cols} is too large")))?;
        if cells.len() != expected {
            return Err(Error::format(
                0,
                format!(
                    "grid {rows}x{cols} needs {expected} values, got {}",
                    cells.len()
                ),
            ));
        }
        Ok(Self { rows, cols, cells })
    }

    /// Build from nested rows. Every row must have the same length as the first.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let n_rows = rows.len();
        let mut cells = Vec::with_capacity(n_rows * cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(Error::format(
                    i + 1,
                    format!("row {} has {} values, expected {cols}", i + 1, row.len()),
                ));
            }
            cells.extend(row);
        }
        Ok(Self {
            rows: n_rows,
            cols,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// All cells, row-major.
    pub fn as_slice(&self) -> &[i64] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn row(&self, i: usize) -> Option<&[i64]> {
        if i >= self.rows {
            return None;
        }
        let start = i * self.cols;
        Some(&self.cells[start..start + self.cols])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[i64]> + '_ {
        (0..self.rows).map(move |i| {
            let start = i * self.cols;
            &self.cells[start..start + self.cols]
        })
    }

    pub fn to_rows(&self) -> Vec<Vec<i64>> {
        self.iter_rows().map(<[i64]>::to_vec).collect()
    }
}
