//! Function spaces
use crate::traits::GridTopology;
use crate::types::Multiplier;

/// A function space
pub trait FunctionSpace {
    /// The grid type
    type Grid: GridTopology;

    /// Get the grid that the space is defined on
    fn grid(&self) -> &Self::Grid;

    /// The identifier of the reference shapeset
    fn shapeset_identifier(&self) -> &str;

    /// The number of shape functions on each element
    fn number_of_shape_functions(&self) -> usize;

    /// The number of global DOFs
    fn global_dof_count(&self) -> usize;

    /// Flags indicating which elements are in the support of the space
    fn support(&self) -> &[bool];

    /// The global DOFs associated with the local basis functions of an element
    fn local2global(&self, element: usize) -> &[usize];

    /// The multipliers of the local basis functions of an element
    fn local_multipliers(&self, element: usize) -> &[Multiplier];

    /// The orientation (+1 or -1) of the normal on each element
    fn normal_multipliers(&self) -> &[i32];
}
