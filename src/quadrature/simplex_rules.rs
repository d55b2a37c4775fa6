//! Get rules on the reference triangle.

use crate::quadrature::simplex_rule_definitions::TRIANGLE_GAUSS_DEFINITIONS;
use crate::quadrature::types::NumericalQuadratureDefinition;
use crate::types::{Error, Result};

/// Return a Gauss rule on the reference triangle that integrates polynomials of degree `order` exactly.
pub fn triangle_gauss(order: usize) -> Result<NumericalQuadratureDefinition> {
    if let Some((points, weights)) = TRIANGLE_GAUSS_DEFINITIONS.get(&order) {
        Ok(NumericalQuadratureDefinition {
            dim: 2,
            order,
            npoints: weights.len(),
            weights: weights.to_vec(),
            points: points.to_vec(),
        })
    } else {
        Err(Error::QuadratureRuleNotFound(order))
    }
}

/// The orders for which Gauss rules on the reference triangle are available.
pub fn available_orders() -> Vec<usize> {
    let mut orders = TRIANGLE_GAUSS_DEFINITIONS.keys().copied().collect::<Vec<_>>();
    orders.sort();
    orders
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::*;

    // Integral of x^i y^j over the reference triangle
    fn monomial_integral(i: i32, j: i32) -> f64 {
        let factorial = |n: i32| (1..=n).map(|k| k as f64).product::<f64>();
        factorial(i) * factorial(j) / factorial(i + j + 2)
    }

    #[test]
    fn test_volume() {
        for order in available_orders() {
            let rule = triangle_gauss(order).unwrap();
            assert_eq!(rule.points.len(), 2 * rule.npoints);
            assert_relative_eq!(rule.weights.iter().sum::<f64>(), 0.5, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_exactness() {
        for order in available_orders() {
            let rule = triangle_gauss(order).unwrap();
            for i in 0..order as i32 + 1 {
                for j in 0..order as i32 + 1 - i {
                    let approx = rule
                        .weights
                        .iter()
                        .enumerate()
                        .map(|(p, w)| {
                            w * rule.points[2 * p].powi(i) * rule.points[2 * p + 1].powi(j)
                        })
                        .sum::<f64>();
                    assert_relative_eq!(approx, monomial_integral(i, j), max_relative = 1e-10);
                }
            }
        }
    }

    #[test]
    fn test_missing_rule() {
        assert!(matches!(
            triangle_gauss(40),
            Err(Error::QuadratureRuleNotFound(40))
        ));
    }
}
