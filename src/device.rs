//! Compute devices, device buffers and kernels

mod buffer;
mod cpu;
mod kernel;

pub(crate) use buffer::try_allocate;
pub use buffer::{AccessMode, DeviceBuffer};
pub use cpu::CpuDevice;
pub use kernel::{
    kernel_source_from_identifier, ElementKernel, ElementKernelData, ElementOperator, Kernel,
    KernelArguments, KernelOption, KernelOptions, KernelSource, KernelVariant,
};
