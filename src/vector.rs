//! Growable dense vector of `f32` values.

use std::fmt;
use std::iter::FromIterator;
use std::ops::{Index, IndexMut};
use std::slice::Iter;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{MathError, Result};
use crate::kernel::{self, Cmp};
use crate::matrix::Matrix;

/// A growable dense vector of single-precision floats.
///
/// Arithmetic and comparison operations never mutate their operands; every
/// arithmetic operation allocates and returns a new value. Only [`push`],
/// [`pop`], and [`set`] mutate in place.
///
/// [`push`]: Vector::push
/// [`pop`]: Vector::pop
/// [`set`]: Vector::set
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    values: Vec<f32>,
}

impl Vector {
    /// Empty vector. The first [`push`](Vector::push) grows capacity to 2.
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Zero-filled vector of the given length.
    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    /// Vector of the given length with every element set to `value`.
    pub fn filled(len: usize, value: f32) -> Self {
        Self {
            values: vec![value; len],
        }
    }

    /// Vector of the given length filled with uniform samples from [0, 1).
    ///
    /// The generator is passed in so callers control seeding.
    pub fn randinit<R: Rng>(len: usize, rng: &mut R) -> Self {
        Self {
            values: (0..len).map(|_| rng.gen::<f32>()).collect(),
        }
    }

    pub fn from_vec(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn from_slice(values: &[f32]) -> Self {
        Self {
            values: values.to_vec(),
        }
    }

    /// Copy of the matrix's first row (the first `cols` elements of its
    /// row-major buffer). An empty matrix yields an empty vector.
    pub fn from_matrix(matrix: &Matrix) -> Self {
        if matrix.rows() == 0 {
            return Self::new();
        }
        Self::from_slice(matrix.row_slice(0))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.values.capacity()
    }

    pub fn iter(&self) -> Iter<'_, f32> {
        self.values.iter()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.values
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.values.clone()
    }

    /// Checked element read.
    pub fn get(&self, index: usize) -> Result<f32> {
        self.values
            .get(index)
            .copied()
            .ok_or(MathError::OutOfBounds {
                index,
                len: self.values.len(),
            })
    }

    /// Checked element write.
    pub fn set(&mut self, index: usize, value: f32) -> Result<()> {
        let len = self.values.len();
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(MathError::OutOfBounds { index, len }),
        }
    }

    /// Appends `value`, doubling capacity (starting at 2) when full.
    pub fn push(&mut self, value: f32) {
        let cap = self.values.capacity();
        if self.values.len() == cap {
            let target = if cap == 0 { 2 } else { cap * 2 };
            self.values.reserve_exact(target - self.values.len());
        }
        self.values.push(value);
    }

    /// Removes and returns the last element.
    pub fn pop(&mut self) -> Result<f32> {
        self.values.pop().ok_or(MathError::EmptyCollection)
    }

    fn check_len(&self, other: &Vector) -> Result<()> {
        if self.values.len() != other.values.len() {
            return Err(MathError::DimensionMismatch {
                expected: self.values.len(),
                found: other.values.len(),
            });
        }
        Ok(())
    }

    /// Element-wise sum of two equal-length vectors.
    pub fn add(&self, other: &Vector) -> Result<Vector> {
        self.check_len(other)?;
        let mut values = vec![0.0; self.values.len()];
        kernel::add(&self.values, &other.values, &mut values);
        Ok(Vector { values })
    }

    /// Element-wise difference of two equal-length vectors.
    pub fn sub(&self, other: &Vector) -> Result<Vector> {
        self.check_len(other)?;
        let mut values = vec![0.0; self.values.len()];
        kernel::sub(&self.values, &other.values, &mut values);
        Ok(Vector { values })
    }

    /// Element-wise product of two equal-length vectors.
    pub fn mul(&self, other: &Vector) -> Result<Vector> {
        self.check_len(other)?;
        let mut values = vec![0.0; self.values.len()];
        kernel::mul(&self.values, &other.values, &mut values);
        Ok(Vector { values })
    }

    /// Element-wise quotient of two equal-length vectors.
    ///
    /// Zero divisors are not special-cased; the result carries IEEE
    /// infinities or NaNs.
    pub fn div(&self, other: &Vector) -> Result<Vector> {
        self.check_len(other)?;
        let mut values = vec![0.0; self.values.len()];
        kernel::div(&self.values, &other.values, &mut values);
        Ok(Vector { values })
    }

    pub fn add_scalar(&self, scalar: f32) -> Vector {
        let mut values = vec![0.0; self.values.len()];
        kernel::add_splat(&self.values, scalar, &mut values);
        Vector { values }
    }

    pub fn sub_scalar(&self, scalar: f32) -> Vector {
        let mut values = vec![0.0; self.values.len()];
        kernel::sub_splat(&self.values, scalar, &mut values);
        Vector { values }
    }

    /// `scalar - self[i]` for every element.
    pub fn scalar_sub(&self, scalar: f32) -> Vector {
        let mut values = vec![0.0; self.values.len()];
        kernel::splat_sub(scalar, &self.values, &mut values);
        Vector { values }
    }

    pub fn mul_scalar(&self, scalar: f32) -> Vector {
        let mut values = vec![0.0; self.values.len()];
        kernel::mul_splat(&self.values, scalar, &mut values);
        Vector { values }
    }

    pub fn div_scalar(&self, scalar: f32) -> Vector {
        let mut values = vec![0.0; self.values.len()];
        kernel::div_splat(&self.values, scalar, &mut values);
        Vector { values }
    }

    /// `scalar / self[i]` for every element.
    pub fn scalar_div(&self, scalar: f32) -> Vector {
        let mut values = vec![0.0; self.values.len()];
        kernel::splat_div(scalar, &self.values, &mut values);
        Vector { values }
    }

    /// Row-vector × matrix product: `result[j] = Σ_i self[i] * matrix[i][j]`.
    ///
    /// Requires `self.len() == matrix.rows()`; the result has `matrix.cols()`
    /// elements.
    pub fn mul_matrix(&self, matrix: &Matrix) -> Result<Vector> {
        if self.values.len() != matrix.rows() {
            return Err(MathError::DimensionMismatch {
                expected: matrix.rows(),
                found: self.values.len(),
            });
        }
        let mut values = vec![0.0; matrix.cols()];
        for (i, &x) in self.values.iter().enumerate() {
            kernel::add_scaled(&mut values, matrix.row_slice(i), x);
        }
        Ok(Vector { values })
    }

    /// True when every element pair is equal. Any NaN element makes this
    /// false.
    pub fn eq(&self, other: &Vector) -> Result<bool> {
        self.check_len(other)?;
        Ok(kernel::all_hold(&self.values, &other.values, Cmp::Eq))
    }

    /// True when every element pair differs. NaN differs from everything,
    /// itself included.
    pub fn ne(&self, other: &Vector) -> Result<bool> {
        self.check_len(other)?;
        Ok(kernel::all_hold(&self.values, &other.values, Cmp::Ne))
    }

    pub fn gt(&self, other: &Vector) -> Result<bool> {
        self.check_len(other)?;
        Ok(kernel::all_hold(&self.values, &other.values, Cmp::Gt))
    }

    pub fn ge(&self, other: &Vector) -> Result<bool> {
        self.check_len(other)?;
        Ok(kernel::all_hold(&self.values, &other.values, Cmp::Ge))
    }

    pub fn lt(&self, other: &Vector) -> Result<bool> {
        self.check_len(other)?;
        Ok(kernel::all_hold(&self.values, &other.values, Cmp::Lt))
    }

    pub fn le(&self, other: &Vector) -> Result<bool> {
        self.check_len(other)?;
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

impl From<Vec<f32>> for Vector {
    fn from(value: Vec<f32>) -> Self {
        Vector::from_vec(value)
    }
}

impl From<Vector> for Vec<f32> {
    fn from(value: Vector) -> Self {
        value.values
    }
}

impl FromIterator<f32> for Vector {
    fn from_iter<I: IntoIterator<Item = f32>>(iter: I) -> Self {
        Vector::from_vec(iter.into_iter().collect())
    }
}

impl Index<usize> for Vector {
    type Output = f32;

    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}

impl IndexMut<usize> for Vector {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.values[index]
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, value) in self.values.iter().enumerate() {
            write!(f, "{:.2}", value)?;
            if idx + 1 != self.values.len() {
                write!(f, ", ")?;
            }
        }
        write!(f, "]")
    }
}
