//! Grid creation and storage

pub mod flat_triangle_grid;
mod geometry;

pub use flat_triangle_grid::{FlatTriangleGrid, FlatTriangleGridBuilder};
pub use geometry::{ElementGeometry, GEOMETRY_STRIDE};
