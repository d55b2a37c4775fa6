//! Reference shapesets

mod rwg0;

pub use rwg0::Rwg0Shapeset;

use crate::grid::ElementGeometry;
use crate::traits::Shapeset;
use crate::types::{Error, RealScalar, Result, RlstArray};
use rlst::{rlst_dynamic_array2, RawAccessMut};
use std::str::FromStr;

/// Arrange points on the reference triangle, given as consecutive (x, y) pairs, into an array
/// of shape `[2, npoints]`
pub fn reference_points<T: RealScalar>(points: &[T]) -> Result<RlstArray<T, 2>> {
    if points.len() % 2 != 0 {
        return Err(Error::InvalidPoints(format!(
            "expected (x, y) pairs, got {} coordinates",
            points.len()
        )));
    }
    let mut array = rlst_dynamic_array2!(T, [2, points.len() / 2]);
    array.data_mut().copy_from_slice(points);
    Ok(array)
}

/// The shapesets that kernels can be compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapesetType {
    /// Lowest order RWG functions
    Rwg0,
}

impl FromStr for ShapesetType {
    type Err = Error;

    fn from_str(identifier: &str) -> Result<Self> {
        match identifier {
            "rwg0" => Ok(ShapesetType::Rwg0),
            _ => Err(Error::UnknownShapeset(identifier.to_string())),
        }
    }
}

impl Shapeset for ShapesetType {
    fn identifier(&self) -> &'static str {
        match self {
            ShapesetType::Rwg0 => Rwg0Shapeset.identifier(),
        }
    }
    fn number_of_shape_functions(&self) -> usize {
        match self {
            ShapesetType::Rwg0 => Rwg0Shapeset.number_of_shape_functions(),
        }
    }
    fn value_dimension(&self) -> usize {
        match self {
            ShapesetType::Rwg0 => Rwg0Shapeset.value_dimension(),
        }
    }
    fn tabulate<T: RealScalar>(&self, points: &RlstArray<T, 2>, table: &mut RlstArray<T, 4>) {
        match self {
            ShapesetType::Rwg0 => Rwg0Shapeset.tabulate(points, table),
        }
    }
    fn push_forward<T: RealScalar>(
        &self,
        geometry: &ElementGeometry<T>,
        reference: &RlstArray<T, 4>,
        physical: &mut RlstArray<T, 3>,
    ) {
        match self {
            ShapesetType::Rwg0 => Rwg0Shapeset.push_forward(geometry, reference, physical),
        }
    }
}
