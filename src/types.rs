//! Types specific to bempp-rwg

use rlst::{DynamicArray, RlstScalar};

/// A real scalar that can be used for geometry and on a device
pub trait RealScalar: num::Float + RlstScalar<Real = Self> + Send + Sync {}

impl<T: num::Float + RlstScalar<Real = T> + Send + Sync> RealScalar for T {}

/// A heap allocated rlst array
pub type RlstArray<T, const DIM: usize> = DynamicArray<T, DIM>;

/// Convert a value between real scalar types
pub(crate) fn convert<S: RealScalar, T: RealScalar>(value: S) -> T {
    T::from(value).unwrap_or_else(T::nan)
}

/// Local multiplier of a basis function on a cell: -1, 0 or 1
pub type Multiplier = i8;

/// Floating point precision used on a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    /// 32-bit floats
    Single,
    /// 64-bit floats
    Double,
}

impl Precision {
    /// The name used in kernel options
    pub fn name(&self) -> &'static str {
        match self {
            Precision::Single => "single",
            Precision::Double => "double",
        }
    }
}

/// Error type
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No element remains in the support of a function space
    #[error("The support of the function space is empty.")]
    EmptySupport,
    /// The support of a function space could not be determined
    #[error("Invalid support: {0}")]
    InvalidSupport(String),
    /// The grid could not be created
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),
    /// Two function spaces that must share a grid do not
    #[error("domain and dual_to_range must be defined on the same grid.")]
    GridMismatch,
    /// Points on the reference triangle are malformed
    #[error("Invalid points: {0}")]
    InvalidPoints(String),
    /// The operation is not supported
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
    /// No kernel exists with a given identifier
    #[error("Unknown kernel: {0}")]
    UnknownKernel(String),
    /// A compile-time kernel option is missing or has the wrong type
    #[error("Missing or invalid kernel option: {0}")]
    MissingKernelOption(String),
    /// No shapeset exists with a given identifier
    #[error("Unknown shapeset: {0}")]
    UnknownShapeset(String),
    /// No quadrature rule exists of a given order
    #[error("No quadrature rule of order {0}")]
    QuadratureRuleNotFound(usize),
    /// A device buffer could not be created or accessed
    #[error("Device buffer error: {0}")]
    DeviceBuffer(String),
    /// A kernel failed during execution
    #[error("Kernel execution failed: {0}")]
    KernelExecution(String),
    /// A sparse matrix could not be created
    #[error("Sparse matrix error: {0}")]
    SparseMatrix(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
