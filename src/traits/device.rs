//! Compute devices
use crate::device::{Kernel, KernelArguments, KernelSource};
use crate::types::{RealScalar, Result};
use std::ops::Range;

pub trait Device: Sync {
    //! A device that element kernels can be dispatched to

    /// Name of the device
    fn name(&self) -> &str;

    /// The number of elements processed together by a vectorised kernel
    fn vector_width(&self) -> usize;

    /// Compile a kernel for the scalar type `T`
    fn compile_kernel<T: RealScalar>(&self, source: &KernelSource) -> Result<Kernel<T>>;

    /// Run a kernel for the active elements at positions `positions`
    ///
    /// `output` holds one block of `kernel.block_size()` values for each position, and
    /// kernels must write nothing outside of it.
    fn launch<T: RealScalar>(
        &self,
        kernel: &Kernel<T>,
        arguments: &KernelArguments<'_, T>,
        positions: Range<usize>,
        output: &mut [T],
    ) -> Result<()>;
}
