//! Row-major dense matrix of `f32` values.

use std::fmt;
use std::ops::{Index, IndexMut};

use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{MathError, Result};
use crate::kernel::{self, Cmp};
use crate::vector::Vector;

/// Pivot threshold: diagonal entries below this magnitude trigger a row
/// search, and a column with no usable pivot marks the matrix singular.
const NEAR_ZERO: f32 = 1e-6;

/// A growable dense matrix of single-precision floats, stored row-major.
///
/// Rows and columns carry independent capacities. Row growth doubles the row
/// capacity and appends in place; column growth always rebuilds the backing
/// buffer because the row stride changes.
///
/// As with [`Vector`], arithmetic never mutates its operands. The mutating
/// surface is `set`, `push_row`/`push_col`, `pop_row`/`pop_col`, and
/// `reshape`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    values: Vec<f32>,
    rows: usize,
    cols: usize,
    rows_cap: usize,
    cols_cap: usize,
}

impl Matrix {
    /// Empty matrix. The first `push_row`/`push_col` establishes the other
    /// dimension from the pushed vector's length.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-filled matrix with capacities equal to the requested dimensions.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            values: vec![0.0; rows * cols],
            rows,
            cols,
            rows_cap: rows,
            cols_cap: cols,
        }
    }

    /// Matrix with every element set to `value`.
    pub fn filled(rows: usize, cols: usize, value: f32) -> Self {
        Self {
            values: vec![value; rows * cols],
            rows,
            cols,
            rows_cap: rows,
            cols_cap: cols,
        }
    }

    /// Matrix filled with uniform samples from [0, 1).
    ///
    /// The generator is passed in so callers control seeding.
    pub fn randinit<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Self {
        Self {
            values: (0..rows * cols).map(|_| rng.gen::<f32>()).collect(),
            rows,
            cols,
            rows_cap: rows,
            cols_cap: cols,
        }
    }

    /// Square identity matrix: ones on the diagonal, zeros elsewhere.
    pub fn identity(size: usize) -> Self {
        let mut matrix = Self::zeros(size, size);
        for i in 0..size {
            matrix.values[i * size + i] = 1.0;
        }
        matrix
    }

    /// Builds a matrix from a row-major buffer of exactly `rows * cols`
    /// elements.
    pub fn from_vec(rows: usize, cols: usize, values: Vec<f32>) -> Result<Self> {
        if values.len() != rows * cols {
            return Err(MathError::DimensionMismatch {
                expected: rows * cols,
                found: values.len(),
            });
        }
        Ok(Self {
            values,
            rows,
            cols,
            rows_cap: rows,
            cols_cap: cols,
        })
    }

    /// Builds a matrix from nested rows, which must all have equal length.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(MathError::DimensionMismatch {
                    expected: cols,
                    found: row.len(),
                });
            }
            values.extend_from_slice(row);
        }
        Ok(Self {
            values,
            rows: rows.len(),
            cols,
            rows_cap: rows.len(),
            cols_cap: cols,
        })
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

    pub fn rows_capacity(&self) -> usize {
        self.rows_cap
    }

    pub fn cols_capacity(&self) -> usize {
        self.cols_cap
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.values
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Contiguous view of a row. Panics when out of range; use [`row`] for
    /// the checked form.
    ///
    /// [`row`]: Matrix::row
    pub fn row_slice(&self, row: usize) -> &[f32] {
        let start = self.offset(row, 0);
        &self.values[start..start + self.cols]
    }

    fn check_index(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows {
            return Err(MathError::OutOfBounds {
                index: row,
                len: self.rows,
            });
        }
        if col >= self.cols {
            return Err(MathError::OutOfBounds {
                index: col,
                len: self.cols,
            });
        }
        Ok(())
    }

    /// Checked element read.
    pub fn get(&self, row: usize, col: usize) -> Result<f32> {
        self.check_index(row, col)?;
        Ok(self.values[self.offset(row, col)])
    }

    /// Checked element write.
    pub fn set(&mut self, row: usize, col: usize, value: f32) -> Result<()> {
        self.check_index(row, col)?;
        let offset = self.offset(row, col);
        self.values[offset] = value;
        Ok(())
    }

    /// Copy of the given row.
    pub fn row(&self, row: usize) -> Result<Vector> {
        if row >= self.rows {
            return Err(MathError::OutOfBounds {
                index: row,
                len: self.rows,
            });
        }
        Ok(Vector::from_slice(self.row_slice(row)))
    }

    /// Copy of the given column (strided gather, one element per row).
    pub fn col(&self, col: usize) -> Result<Vector> {
        if col >= self.cols {
            return Err(MathError::OutOfBounds {
                index: col,
                len: self.cols,
            });
        }
        let values: Vec<f32> = (0..self.rows)
            .map(|row| self.values[self.offset(row, col)])
            .collect();
        Ok(Vector::from_vec(values))
    }

    /// Appends `vector` as the new last row.
    ///
    /// An empty matrix adopts the vector's length as its column count. Row
    /// capacity doubles (starting at 2) when exceeded.
    pub fn push_row(&mut self, vector: &Vector) -> Result<()> {
        if self.rows == 0 && self.cols == 0 {
            self.cols = vector.len();
            self.cols_cap = vector.len();
        }
        if vector.len() != self.cols {
            return Err(MathError::DimensionMismatch {
                expected: self.cols,
                found: vector.len(),
            });
        }
        if self.rows + 1 > self.rows_cap {
            self.rows_cap = if self.rows_cap == 0 { 2 } else { self.rows_cap * 2 };
            let target = self.rows_cap * self.cols_cap;
            if target > self.values.capacity() {
                self.values.reserve_exact(target - self.values.len());
            }
        }
        self.values.extend_from_slice(vector.as_slice());
        self.rows += 1;
        Ok(())
    }

    /// Appends `vector` as the new last column.
    ///
    /// An empty matrix adopts the vector's length as its row count. Always
    /// rebuilds the backing buffer: row-major storage cannot append a column
    /// in place.
    pub fn push_col(&mut self, vector: &Vector) -> Result<()> {
        if self.rows == 0 && self.cols == 0 {
            self.rows = vector.len();
            self.rows_cap = vector.len();
        }
        if vector.len() != self.rows {
            return Err(MathError::DimensionMismatch {
                expected: self.rows,
                found: vector.len(),
            });
        }
        if self.cols + 1 > self.cols_cap {
            self.cols_cap = if self.cols_cap == 0 { 2 } else { self.cols_cap * 2 };
        }
        trace!(
            "push_col re-strides {}x{} backing buffer",
            self.rows,
            self.cols
        );
        let new_cols = self.cols + 1;
        let mut values = Vec::with_capacity(self.rows * self.cols_cap.max(new_cols));
        for i in 0..self.rows {
            values.extend_from_slice(self.row_slice(i));
            values.push(vector[i]);
        }
        self.values = values;
        self.cols = new_cols;
        Ok(())
    }

    /// Removes and returns the last row.
    pub fn pop_row(&mut self) -> Result<Vector> {
        if self.rows == 0 {
            return Err(MathError::EmptyCollection);
        }
        let row = Vector::from_slice(self.row_slice(self.rows - 1));
        self.rows -= 1;
        self.values.truncate(self.rows * self.cols);
        Ok(row)
    }

    /// Removes and returns the last column, re-striding every remaining row.
    pub fn pop_col(&mut self) -> Result<Vector> {
        if self.cols == 0 {
            return Err(MathError::EmptyCollection);
        }
        let col = self.col(self.cols - 1)?;
        let new_cols = self.cols - 1;
        let mut values = Vec::with_capacity(self.rows * new_cols);
        for i in 0..self.rows {
            let start = i * self.cols;
            values.extend_from_slice(&self.values[start..start + new_cols]);
        }
        self.values = values;
        self.cols = new_cols;
        Ok(col)
    }

    fn check_shape(&self, other: &Matrix) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(MathError::ShapeMismatch {
                expected: self.shape(),
                found: other.shape(),
            });
        }
        Ok(())
    }

    fn check_square(&self) -> Result<()> {
        if self.rows != self.cols {
            return Err(MathError::ShapeMismatch {
                expected: (self.rows, self.rows),
                found: (self.rows, self.cols),
            });
        }
        Ok(())
    }

    /// Element-wise sum of two same-shape matrices.
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.check_shape(other)?;
        let mut result = Matrix::zeros(self.rows, self.cols);
        kernel::add(&self.values, &other.values, &mut result.values);
        Ok(result)
    }

    /// Element-wise difference of two same-shape matrices.
    pub fn sub(&self, other: &Matrix) -> Result<Matrix> {
        self.check_shape(other)?;
        let mut result = Matrix::zeros(self.rows, self.cols);
        kernel::sub(&self.values, &other.values, &mut result.values);
        Ok(result)
    }

    /// Element-wise quotient of two same-shape matrices. Zero divisors follow
    /// IEEE semantics.
    pub fn div(&self, other: &Matrix) -> Result<Matrix> {
        self.check_shape(other)?;
        let mut result = Matrix::zeros(self.rows, self.cols);
        kernel::div(&self.values, &other.values, &mut result.values);
        Ok(result)
    }

    /// Matrix product: `result[i][j] = Σ_k self[i][k] * other[k][j]`.
    ///
    /// Requires `self.cols() == other.rows()`. Each column of `other` is
    /// gathered once so the inner reduction runs over two contiguous slices.
    pub fn mul(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(MathError::DimensionMismatch {
                expected: self.cols,
                found: other.rows,
            });
        }
        let mut result = Matrix::zeros(self.rows, other.cols);
        let mut column = vec![0.0; other.rows];
        for j in 0..other.cols {
            for (k, slot) in column.iter_mut().enumerate() {
                *slot = other.values[k * other.cols + j];
            }
            for i in 0..self.rows {
                result.values[i * other.cols + j] = kernel::dot(self.row_slice(i), &column);
            }
        }
        Ok(result)
    }

    /// Matrix × column-vector product: `result[i] = Σ_k self[i][k] * vector[k]`.
    ///
    /// Requires `vector.len() == self.cols()`; the result has `self.rows()`
    /// elements.
    pub fn mul_vector(&self, vector: &Vector) -> Result<Vector> {
        if vector.len() != self.cols {
            return Err(MathError::DimensionMismatch {
                expected: self.cols,
                found: vector.len(),
            });
        }
        let values: Vec<f32> = (0..self.rows)
            .map(|i| kernel::dot(self.row_slice(i), vector.as_slice()))
            .collect();
        Ok(Vector::from_vec(values))
    }

    pub fn add_scalar(&self, scalar: f32) -> Matrix {
        let mut result = Matrix::zeros(self.rows, self.cols);
        kernel::add_splat(&self.values, scalar, &mut result.values);
        result
    }

    pub fn sub_scalar(&self, scalar: f32) -> Matrix {
        let mut result = Matrix::zeros(self.rows, self.cols);
        kernel::sub_splat(&self.values, scalar, &mut result.values);
        result
    }

    /// `scalar - self[i][j]` for every element.
    pub fn scalar_sub(&self, scalar: f32) -> Matrix {
        let mut result = Matrix::zeros(self.rows, self.cols);
        kernel::splat_sub(scalar, &self.values, &mut result.values);
        result
    }

    pub fn mul_scalar(&self, scalar: f32) -> Matrix {
        let mut result = Matrix::zeros(self.rows, self.cols);
        kernel::mul_splat(&self.values, scalar, &mut result.values);
        result
    }

    pub fn div_scalar(&self, scalar: f32) -> Matrix {
        let mut result = Matrix::zeros(self.rows, self.cols);
        kernel::div_splat(&self.values, scalar, &mut result.values);
        result
    }

    /// `scalar / self[i][j]` for every element.
    pub fn scalar_div(&self, scalar: f32) -> Matrix {
        let mut result = Matrix::zeros(self.rows, self.cols);
        kernel::splat_div(scalar, &self.values, &mut result.values);
        result
    }

    /// New `cols × rows` matrix with `result[j][i] = self[i][j]`.
    pub fn transpose(&self) -> Matrix {
        let mut result = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                result.values[j * self.rows + i] = self.values[self.offset(i, j)];
            }
        }
        result
    }

    /// Reinterprets the flat row-major buffer under new dimensions.
    ///
    /// Logical-only: no data moves. The element count must be preserved.
    pub fn reshape(&mut self, new_rows: usize, new_cols: usize) -> Result<()> {
        if new_rows * new_cols != self.rows * self.cols {
            return Err(MathError::DimensionMismatch {
                expected: self.rows * self.cols,
                found: new_rows * new_cols,
            });
        }
        self.rows = new_rows;
        self.cols = new_cols;
        self.rows_cap = self.rows_cap.max(new_rows);
        self.cols_cap = self.cols_cap.max(new_cols);
        Ok(())
    }

    fn swap_rows(values: &mut [f32], cols: usize, row1: usize, row2: usize) {
        if row1 == row2 {
            return;
        }
        let (lo, hi) = if row1 < row2 { (row1, row2) } else { (row2, row1) };
        let (head, tail) = values.split_at_mut(hi * cols);
        head[lo * cols..lo * cols + cols].swap_with_slice(&mut tail[..cols]);
    }

    /// Disjoint mutable destination row and shared source row.
    fn rows_pair(
        values: &mut [f32],
        cols: usize,
        dst: usize,
        src: usize,
    ) -> (&mut [f32], &[f32]) {
        debug_assert_ne!(dst, src);
        if dst < src {
            let (head, tail) = values.split_at_mut(src * cols);
            (&mut head[dst * cols..dst * cols + cols], &tail[..cols])
        } else {
            let (head, tail) = values.split_at_mut(dst * cols);
            (&mut tail[..cols], &head[src * cols..src * cols + cols])
        }
    }

    /// Inverse by Gauss-Jordan elimination with partial pivoting.
    ///
    /// Works on a copy; `self` is never mutated. An identity matrix carried
    /// through the same row operations becomes the inverse. Returns
    /// [`MathError::Singular`] when no usable pivot exists for some column.
    pub fn inverse(&self) -> Result<Matrix> {
        self.check_square()?;
        let n = self.rows;
        let mut work = self.clone();
        let mut result = Matrix::identity(n);
        for i in 0..n {
            if work.values[work.offset(i, i)].abs() < NEAR_ZERO {
                let swap = (i + 1..n).find(|&j| work.values[work.offset(j, i)].abs() > NEAR_ZERO);
                match swap {
                    Some(j) => {
                        debug!("pivot {} below threshold, swapping rows {} and {}", i, i, j);
                        Self::swap_rows(&mut work.values, n, i, j);
                        Self::swap_rows(&mut result.values, n, i, j);
                    }
                    None => {
                        debug!("no usable pivot for column {}, matrix is singular", i);
                        return Err(MathError::Singular);
                    }
                }
            }
            let pivot = work.values[work.offset(i, i)];
            kernel::div_assign_splat(&mut work.values[i * n..(i + 1) * n], pivot);
            kernel::div_assign_splat(&mut result.values[i * n..(i + 1) * n], pivot);
            for k in 0..n {
                if k == i {
                    continue;
                }
                let factor = work.values[work.offset(k, i)];
                let (dst, src) = Self::rows_pair(&mut work.values, n, k, i);
                kernel::sub_scaled(dst, src, factor);
                let (dst, src) = Self::rows_pair(&mut result.values, n, k, i);
                kernel::sub_scaled(dst, src, factor);
            }
        }
        Ok(result)
    }

    /// Integer power by binary exponentiation.
    ///
    /// `exp == 0` yields the identity; a negative exponent inverts first and
    /// fails with [`MathError::Singular`] when the matrix is not invertible.
    pub fn pow(&self, exp: i32) -> Result<Matrix> {
        self.check_square()?;
        let mut result = Matrix::identity(self.rows);
        if exp == 0 {
            return Ok(result);
        }
        let mut base = if exp < 0 { self.inverse()? } else { self.clone() };
        let mut e = i64::from(exp).unsigned_abs();
        while e > 0 {
            if e % 2 == 1 {
                result = result.mul(&base)?;
            }
            base = base.mul(&base)?;
            e /= 2;
        }
        Ok(result)
    }

    fn check_elements(&self, other: &Matrix) -> Result<()> {
        if self.values.len() != other.values.len() {
            return Err(MathError::DimensionMismatch {
                expected: self.values.len(),
                found: other.values.len(),
            });
        }
        Ok(())
    }

    /// True when every element pair is equal over the flattened buffers.
    /// Requires equal element counts; any NaN makes this false.
    pub fn eq(&self, other: &Matrix) -> Result<bool> {
        self.check_elements(other)?;
        Ok(kernel::all_hold(&self.values, &other.values, Cmp::Eq))
    }

    /// True when every element pair differs over the flattened buffers.
    pub fn ne(&self, other: &Matrix) -> Result<bool> {
        self.check_elements(other)?;
        Ok(kernel::all_hold(&self.values, &other.values, Cmp::Ne))
    }

    pub fn gt(&self, other: &Matrix) -> Result<bool> {
        self.check_elements(other)?;
        Ok(kernel::all_hold(&self.values, &other.values, Cmp::Gt))
    }

    pub fn ge(&self, other: &Matrix) -> Result<bool> {
        self.check_elements(other)?;
        Ok(kernel::all_hold(&self.values, &other.values, Cmp::Ge))
    }

    pub fn lt(&self, other: &Matrix) -> Result<bool> {
        self.check_elements(other)?;
        Ok(kernel::all_hold(&self.values, &other.values, Cmp::Lt))
    }

    pub fn le(&self, other: &Matrix) -> Result<bool> {
        self.check_elements(other)?;
        Ok(kernel::all_hold(&self.values, &other.values, Cmp::Le))
    }

    pub fn eq_scalar(&self, scalar: f32) -> bool {
        kernel::all_hold_splat(&self.values, scalar, Cmp::Eq)
    }

    pub fn ne_scalar(&self, scalar: f32) -> bool {
        kernel::all_hold_splat(&self.values, scalar, Cmp::Ne)
    }

    pub fn gt_scalar(&self, scalar: f32) -> bool {
        kernel::all_hold_splat(&self.values, scalar, Cmp::Gt)
    }

    pub fn ge_scalar(&self, scalar: f32) -> bool {
        kernel::all_hold_splat(&self.values, scalar, Cmp::Ge)
    }

    pub fn lt_scalar(&self, scalar: f32) -> bool {
        kernel::all_hold_splat(&self.values, scalar, Cmp::Lt)
    }

    pub fn le_scalar(&self, scalar: f32) -> bool {
        kernel::all_hold_splat(&self.values, scalar, Cmp::Le)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f32;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let offset = self.offset(index.0, index.1);
        &self.values[offset]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let offset = self.offset(index.0, index.1);
        &mut self.values[offset]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows == 0 {
            return write!(f, "[]");
        }
        writeln!(f, "[")?;
        for i in 0..self.rows {
            write!(f, "  [")?;
            for j in 0..self.cols {
                write!(f, "{:.2}", self.values[self.offset(i, j)])?;
                if j + 1 != self.cols {
                    write!(f, ", ")?;
                }
            }
            write!(f, "]")?;
            if i + 1 != self.rows {
                write!(f, ",")?;
            }
            writeln!(f)?;
        }
        write!(f, "]")
    }
}
