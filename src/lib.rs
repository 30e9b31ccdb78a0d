//! lamina: dense matrix and vector numerics.
//!
//! This crate provides two growable dense containers over single-precision
//! floats: [`Vector`] (1-D) and [`Matrix`] (2-D, row-major). Both expose a
//! pure, allocating arithmetic and comparison surface plus explicit mutators
//! (`push`, `pop`, `set`, `reshape`), and `Matrix` adds transposition,
//! Gauss-Jordan inversion, and integer exponentiation.
//!
//! Preconditions are checked and reported as [`MathError`] values rather than
//! trusted to the caller. The inner loops share a small element kernel with an
//! optional SSE fast path behind the `simd` feature; the scalar path is the
//! reference semantics and the vectorized path never changes observable
//! results.
pub mod error;
mod kernel;
pub mod matrix;
pub mod vector;

pub use error::{MathError, Result};
pub use matrix::Matrix;
pub use vector::Vector;
