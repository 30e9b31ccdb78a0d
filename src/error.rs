use std::error::Error;
use std::fmt;

/// Errors reported by the dense containers.
///
/// Every fallible operation returns `Result<T, MathError>`; the containers
/// check their own preconditions instead of computing on invalid input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// Operand lengths incompatible for the requested operation.
    DimensionMismatch { expected: usize, found: usize },
    /// Operand shapes incompatible for the requested operation.
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// Index outside the valid range of the addressed axis.
    OutOfBounds { index: usize, len: usize },
    /// Inverse or negative power requested on a non-invertible matrix.
    Singular,
    /// Pop requested on an empty vector or an empty matrix axis.
    EmptyCollection,
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MathError::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {}, found {}", expected, found)
            }
            MathError::ShapeMismatch { expected, found } => write!(
                f,
                "shape mismatch: expected {}x{}, found {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            MathError::OutOfBounds { index, len } => {
                write!(f, "index {} out of bounds for axis of length {}", index, len)
            }
            MathError::Singular => write!(f, "matrix is singular"),
            MathError::EmptyCollection => write!(f, "pop from an empty collection"),
        }
    }
}

impl Error for MathError {}

pub type Result<T> = std::result::Result<T, MathError>;
