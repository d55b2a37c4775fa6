//! Symmetric Gauss rules on the reference triangle (0,0), (1,0), (0,1).
//!
//! Each entry maps the order of the rule to its points (stored consecutively as (x, y) pairs)
//! and its weights. The weights sum to the area of the reference triangle.
use std::collections::HashMap;

const A4: f64 = 0.445_948_490_915_965;
const B4: f64 = 0.091_576_213_509_771;
const WA4: f64 = 0.223_381_589_678_011 / 2.0;
const WB4: f64 = 0.109_951_743_655_322 / 2.0;

lazy_static! {
    pub(crate) static ref TRIANGLE_GAUSS_DEFINITIONS: HashMap<usize, (Vec<f64>, Vec<f64>)> = {
        let mut m = HashMap::new();
        m.insert(1, (vec![1.0 / 3.0, 1.0 / 3.0], vec![0.5]));
        m.insert(
            2,
            (
                vec![1.0 / 6.0, 1.0 / 6.0, 2.0 / 3.0, 1.0 / 6.0, 1.0 / 6.0, 2.0 / 3.0],
                vec![1.0 / 6.0; 3],
            ),
        );
        m.insert(
            3,
            (
                vec![1.0 / 3.0, 1.0 / 3.0, 0.2, 0.2, 0.6, 0.2, 0.2, 0.6],
                vec![-27.0 / 96.0, 25.0 / 96.0, 25.0 / 96.0, 25.0 / 96.0],
            ),
        );
        m.insert(
            4,
            (
                vec![
                    A4,
                    A4,
                    1.0 - 2.0 * A4,
                    A4,
                    A4,
                    1.0 - 2.0 * A4,
                    B4,
                    B4,
                    1.0 - 2.0 * B4,
                    B4,
                    B4,
                    1.0 - 2.0 * B4,
                ],
                vec![WA4, WA4, WA4, WB4, WB4, WB4],
            ),
        );
        m
    };
}
