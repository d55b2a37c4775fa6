//! Sparse operator assembly
pub mod common;
pub(crate) mod kernels;
pub mod sparse;

pub use common::SparseMatrixData;
pub use sparse::{
    OperatorDescriptor, SparseAssembler, SparseAssemblerOptions, SparseDiscreteOperator,
};
