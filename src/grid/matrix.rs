//! Dense row-major `f64` matrix used for coordinate meshes and data.

use std::ops::Range;

use crate::util::{SkyMapError, SkyMapResult};

/// Owned row-major matrix of `f64` values.
///
/// Zero-sized matrices are allowed so empty grids flow through the pipeline
/// without special casing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Creates a matrix from a row-major buffer.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> SkyMapResult<Self> {
        let needed = rows
            .checked_mul(cols)
            .ok_or(SkyMapError::InvalidInput("matrix dimensions overflow"))?;
        if data.len() != needed {
            return Err(SkyMapError::InvalidInput(
                "matrix buffer length does not match rows * cols",
            ));
        }
        Ok(Self { data, rows, cols })
    }

    /// Wraps a buffer whose length is already known to be `rows * cols`.
    pub(crate) fn from_parts(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { data, rows, cols }
    }

    /// Creates a matrix from nested rows, all of the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> SkyMapResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return Err(SkyMapError::InvalidInput("matrix rows have unequal length"));
        }
        let n_rows = rows.len();
        let data = rows.into_iter().flatten().collect();
        Self::new(data, n_rows, cols)
    }

    /// Creates a `rows x cols` matrix filled with `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Returns the number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns true if the matrix holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the row-major backing slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consumes the matrix and returns its row-major buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Returns the element at `(row, col)` if it is within bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// Returns row `row` as a slice.
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        self.data.get(start..start + self.cols)
    }

    /// Copies column `col` into a new vector.
    pub fn column(&self, col: usize) -> Option<Vec<f64>> {
        if col >= self.cols {
            return None;
        }
        Some((0..self.rows).map(|r| self.data[r * self.cols + col]).collect())
    }

    /// Copies the columns in `range` into a new matrix.
    pub fn column_range(&self, range: Range<usize>) -> SkyMapResult<Self> {
        if range.start > range.end || range.end > self.cols {
            return Err(SkyMapError::IndexOutOfBounds {
                index: range.end,
                len: self.cols,
                context: "column",
            });
        }
        let cols = range.end - range.start;
        let mut data = Vec::with_capacity(self.rows * cols);
        for r in 0..self.rows {
            let start = r * self.cols;
            data.extend_from_slice(&self.data[start + range.start..start + range.end]);
        }
        Ok(Self {
            data,
            rows: self.rows,
            cols,
        })
    }

    /// Builds a matrix whose columns are `self`'s columns picked by `source`.
    ///
    /// `source[j]` is the column of `self` copied into output column `j`.
    pub(crate) fn pick_columns(&self, source: &[usize]) -> SkyMapResult<Self> {
        if let Some(&bad) = source.iter().find(|&&c| c >= self.cols) {
            return Err(SkyMapError::IndexOutOfBounds {
                index: bad,
                len: self.cols,
                context: "column",
            });
        }
        let mut data = Vec::with_capacity(self.rows * source.len());
        for r in 0..self.rows {
            let row = &self.data[r * self.cols..(r + 1) * self.cols];
            data.extend(source.iter().map(|&c| row[c]));
        }
        Ok(Self {
            data,
            rows: self.rows,
            cols: source.len(),
        })
    }

    /// Builds a matrix whose rows are `self`'s rows picked by `source`.
    pub(crate) fn pick_rows(&self, source: &[usize]) -> SkyMapResult<Self> {
        if let Some(&bad) = source.iter().find(|&&r| r >= self.rows) {
            return Err(SkyMapError::IndexOutOfBounds {
                index: bad,
                len: self.rows,
                context: "row",
            });
        }
        let mut data = Vec::with_capacity(source.len() * self.cols);
        for &r in source {
            data.extend_from_slice(&self.data[r * self.cols..(r + 1) * self.cols]);
        }
        Ok(Self {
            data,
            rows: source.len(),
            cols: self.cols,
        })
    }

    /// Returns a copy with one extra column of `value` appended on the right.
    pub(crate) fn with_column_appended(&self, value: f64) -> Self {
        let cols = self.cols + 1;
        let mut data = Vec::with_capacity(self.rows * cols);
        for r in 0..self.rows {
            data.extend_from_slice(&self.data[r * self.cols..(r + 1) * self.cols]);
            data.push(value);
        }
        Self {
            data,
            rows: self.rows,
            cols,
        }
    }

    /// Concatenates matrices with equal row counts left to right.
    pub fn hconcat(parts: &[&Matrix]) -> SkyMapResult<Self> {
        let rows = parts.first().map_or(0, |m| m.rows);
        if parts.iter().any(|m| m.rows != rows) {
            return Err(SkyMapError::InvalidInput(
                "hconcat requires equal row counts",
            ));
        }
        let cols = parts.iter().map(|m| m.cols).sum();
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for part in parts {
                data.extend_from_slice(&part.data[r * part.cols..(r + 1) * part.cols]);
            }
        }
        Ok(Self { data, rows, cols })
    }

    /// Applies `f` to every element, returning a new matrix.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            data: self.data.iter().copied().map(f).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Returns `(min, max)` over finite elements, or `None` if there are none.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::Matrix;

    fn sample() -> Matrix {
        Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        assert!(Matrix::from_rows(vec![vec![1.0], vec![1.0, 2.0]]).is_err());
        assert_eq!(Matrix::from_rows(Vec::new()).unwrap().shape(), (0, 0));
    }

    #[test]
    fn column_range_copies_pixels() {
        let m = sample().column_range(1..3).unwrap();
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m.as_slice(), &[2.0, 3.0, 5.0, 6.0]);
        assert!(sample().column_range(2..4).is_err());
    }

    #[test]
    fn pick_columns_and_rows_duplicate_entries() {
        let m = sample();
        let cols = m.pick_columns(&[0, 0, 2]).unwrap();
        assert_eq!(cols.as_slice(), &[1.0, 1.0, 3.0, 4.0, 4.0, 6.0]);
        let rows = m.pick_rows(&[1, 1]).unwrap();
        assert_eq!(rows.as_slice(), &[4.0, 5.0, 6.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn hconcat_restores_split() {
        let m = sample();
        let a = m.column_range(0..1).unwrap();
        let b = m.column_range(1..3).unwrap();
        assert_eq!(Matrix::hconcat(&[&a, &b]).unwrap(), m);
    }

    #[test]
    fn finite_range_skips_nan() {
        let m = Matrix::from_rows(vec![vec![f64::NAN, 2.0], vec![-1.0, f64::INFINITY]]).unwrap();
        assert_eq!(m.finite_range(), Some((-1.0, 2.0)));
        assert_eq!(Matrix::filled(2, 2, f64::NAN).finite_range(), None);
    }
}
