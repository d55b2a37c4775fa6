//! Function spaces

mod rwg0;
mod support;

pub use rwg0::{assign_rwg0_dofs, DofAssignment, Rwg0FunctionSpace, Rwg0SpaceOptions};
pub use support::process_segments;
