//! A flat triangle grid
//!
//! In this grid, every cell is a flat triangle

mod builder;
pub(crate) mod grid;

pub use self::builder::FlatTriangleGridBuilder;
pub use self::grid::FlatTriangleGrid;
