//! Reference shapesets
use crate::grid::ElementGeometry;
use crate::types::{RealScalar, RlstArray};

pub trait Shapeset {
    //! A set of basis functions on the reference triangle

    /// The identifier used in kernel options
    fn identifier(&self) -> &'static str;

    /// The number of shape functions
    fn number_of_shape_functions(&self) -> usize;

    /// The number of components of each shape function on the reference triangle
    fn value_dimension(&self) -> usize;

    /// The shape of the array filled by [Shapeset::tabulate] for `npoints` points
    fn tabulate_array_shape(&self, npoints: usize) -> [usize; 4] {
        [
            1,
            npoints,
            self.number_of_shape_functions(),
            self.value_dimension(),
        ]
    }

    /// Tabulate the shape functions at points on the reference triangle
    ///
    /// `points` has shape `[2, npoints]`. `table` has the shape given by
    /// [Shapeset::tabulate_array_shape] and entry `[0, p, f, c]` is component `c` of
    /// function `f` at point `p`.
    fn tabulate<T: RealScalar>(&self, points: &RlstArray<T, 2>, table: &mut RlstArray<T, 4>);

    /// Map tabulated values on the reference triangle to physical values on an element
    ///
    /// `physical` has shape `[npoints, number_of_shape_functions, 3]`.
    fn push_forward<T: RealScalar>(
        &self,
        geometry: &ElementGeometry<T>,
        reference: &RlstArray<T, 4>,
        physical: &mut RlstArray<T, 3>,
    );
}
