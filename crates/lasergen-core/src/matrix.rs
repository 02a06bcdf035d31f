//! Small dense matrices used by the transformation engine.

use crate::error::{MathError, Result};
use crate::vector::Vector;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Row-major rectangular matrix of reals.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Build a matrix from a list of rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let expected = rows.first().map(Vec::len).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * expected);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != expected {
                return Err(MathError::RaggedRows {
                    row,
                    len: values.len(),
                    expected,
                });
            }
            data.extend_from_slice(values);
        }
        Ok(Self {
            rows: rows.len(),
            cols: expected,
            data,
        })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn identity(size: usize) -> Self {
        let mut m = Self::zeros(size, size);
        for i in 0..size {
            m[(i, i)] = 1.0;
        }
        m
    }

    /// 2x2 rotation by `angle` radians; `inverse` rotates the other way.
    pub fn rotation(angle: f64, inverse: bool) -> Self {
        let angle = if inverse { -angle } else { angle };
        let (sin, cos) = angle.sin_cos();
        Self {
            rows: 2,
            cols: 2,
            data: vec![cos, -sin, sin, cos],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Matrix product `self * other`.
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(self.mismatch(other.rows, other.cols));
        }
        let mut out = Matrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for j in 0..other.cols {
                out[(i, j)] = (0..self.cols).map(|k| self[(i, k)] * other[(k, j)]).sum();
            }
        }
        Ok(out)
    }

    /// Multiply by a vector taken as a column. A 3-column matrix treats the
    /// vector as homogeneous `(x, y, 1)`.
    pub fn apply(&self, v: Vector) -> Result<Vector> {
        let column: Vec<f64> = match self.cols {
            2 => vec![v.x, v.y],
            3 => vec![v.x, v.y, 1.0],
            _ => return Err(self.mismatch(2, 1)),
        };
        if self.rows < 2 {
            return Err(self.mismatch(column.len(), 1));
        }
        let row = |r: usize| -> f64 { (0..self.cols).map(|k| self[(r, k)] * column[k]).sum() };
        Ok(Vector::new(row(0), row(1)))
    }

    fn mismatch(&self, right_rows: usize, right_cols: usize) -> MathError {
        MathError::DimensionMismatch {
            left_rows: self.rows,
            left_cols: self.cols,
            right_rows,
            right_cols,
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[row * self.cols + col]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            let row: Vec<String> = (0..self.cols).map(|c| self[(r, c)].to_string()).collect();
            writeln!(f, "[{}]", row.join(", "))?;
        }
        Ok(())
    }
}
