//! Bempp RWG
//!
//! Lowest order Rao-Wilton-Glisson (RWG) function spaces on triangle surface grids and the
//! sparse assembly of boundary operators between them.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

#[macro_use]
extern crate lazy_static;

pub mod assembly;
pub mod device;
pub mod element;
pub mod function;
pub mod grid;
pub mod quadrature;
pub mod shapes;
pub mod traits;
pub mod types;
