//! Quadrature rules on the reference triangle

mod simplex_rule_definitions;
pub mod simplex_rules;
pub mod types;

pub use simplex_rules::{available_orders, triangle_gauss};
pub use types::NumericalQuadratureDefinition;
