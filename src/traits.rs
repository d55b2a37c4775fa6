//! Trait definitions

mod device;
mod function;
mod grid;
mod shapeset;

pub use device::Device;
pub use function::FunctionSpace;
pub use grid::{Builder, GridTopology};
pub use shapeset::Shapeset;
