//! Lowest order RWG shapeset
use crate::grid::ElementGeometry;
use crate::traits::Shapeset;
use crate::types::{RealScalar, RlstArray};
use rlst::Shape;

/// Lowest order Rao-Wilton-Glisson functions on the reference triangle
///
/// Function `i` is associated with local edge `i` and points away from the vertex opposite
/// that edge: `(x, y - 1)`, `(x - 1, y)` and `(x, y)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rwg0Shapeset;

impl Shapeset for Rwg0Shapeset {
    fn identifier(&self) -> &'static str {
        "rwg0"
    }

    fn number_of_shape_functions(&self) -> usize {
        3
    }

    fn value_dimension(&self) -> usize {
        2
    }

    fn tabulate<T: RealScalar>(&self, points: &RlstArray<T, 2>, table: &mut RlstArray<T, 4>) {
        let npoints = points.shape()[1];
        debug_assert_eq!(table.shape(), self.tabulate_array_shape(npoints));
        let one = T::one();
        for p in 0..npoints {
            let (x, y) = (points[[0, p]], points[[1, p]]);
            table[[0, p, 0, 0]] = x;
            table[[0, p, 0, 1]] = y - one;
            table[[0, p, 1, 0]] = x - one;
            table[[0, p, 1, 1]] = y;
            table[[0, p, 2, 0]] = x;
            table[[0, p, 2, 1]] = y;
        }
    }

    fn push_forward<T: RealScalar>(
        &self,
        geometry: &ElementGeometry<T>,
        reference: &RlstArray<T, 4>,
        physical: &mut RlstArray<T, 3>,
    ) {
        let npoints = reference.shape()[1];
        debug_assert_eq!(physical.shape(), [npoints, 3, 3]);
        let edge_lengths = geometry.edge_lengths();
        for p in 0..npoints {
            for (f, length) in edge_lengths.iter().enumerate() {
                let scale = *length / geometry.integration_element;
                let mapped =
                    geometry.apply_jacobian([reference[[0, p, f, 0]], reference[[0, p, f, 1]]]);
                for (c, value) in mapped.iter().enumerate() {
                    physical[[p, f, c]] = scale * *value;
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::element::reference_points;
    use crate::grid::flat_triangle_grid::grid::EDGE_VERTICES;
    use crate::shapes::regular_sphere;
    use crate::traits::GridTopology;
    use approx::assert_relative_eq;
    use rlst::{rlst_dynamic_array3, rlst_dynamic_array4, rlst_static_array};

    #[test]
    fn test_tabulate() {
        let points = reference_points(&[0.25, 0.5, 1.0, 0.0]).unwrap();
        let mut table = rlst_dynamic_array4!(f64, Rwg0Shapeset.tabulate_array_shape(2));
        Rwg0Shapeset.tabulate(&points, &mut table);
        assert_eq!(table.shape(), [1, 2, 3, 2]);
        for (f, expected) in [[0.25, -0.5], [-0.75, 0.5], [0.25, 0.5]].iter().enumerate() {
            assert_eq!(table[[0, 0, f, 0]], expected[0]);
            assert_eq!(table[[0, 0, f, 1]], expected[1]);
        }
        for (f, expected) in [[1.0, -1.0], [0.0, 0.0], [1.0, 0.0]].iter().enumerate() {
            assert_eq!(table[[0, 1, f, 0]], expected[0]);
            assert_eq!(table[[0, 1, f, 1]], expected[1]);
        }
    }

    #[test]
    fn test_normal_component_on_edges() {
        // At the midpoint of edge e, function e has unit outward normal component and the
        // other two functions are tangential
        let grid = regular_sphere::<f64>(1).unwrap();
        let points = reference_points(&[0.5, 0.0, 0.0, 0.5, 0.5, 0.5]).unwrap();
        let mut reference = rlst_dynamic_array4!(f64, Rwg0Shapeset.tabulate_array_shape(3));
        Rwg0Shapeset.tabulate(&points, &mut reference);

        let mut tangent = rlst_static_array!(f64, 3);
        let mut edge_normal = rlst_static_array!(f64, 3);
        for element in 0..grid.number_of_elements() {
            let geometry = ElementGeometry::<f64>::from_grid(&grid, element);
            let mut physical = rlst_dynamic_array3!(f64, [3, 3, 3]);
            Rwg0Shapeset.push_forward(&geometry, &reference, &mut physical);

            for (e, [a, b]) in EDGE_VERTICES.iter().enumerate() {
                tangent.fill_from(
                    geometry.vertices.view().slice::<1>(1, *b)
                        - geometry.vertices.view().slice::<1>(1, *a),
                );
                tangent.cross(geometry.normal.view(), edge_normal.view_mut());
                let length = edge_normal.view().norm_2();

                let opposite = 3 - a - b;
                let outward = (0..3)
                    .map(|i| {
                        edge_normal[[i]]
                            * (geometry.vertices[[i, *a]] - geometry.vertices[[i, opposite]])
                    })
                    .sum::<f64>();
                edge_normal.scale_inplace(outward.signum() / length);

                for f in 0..3 {
                    let flux = (0..3)
                        .map(|i| physical[[e, f, i]] * edge_normal[[i]])
                        .sum::<f64>();
                    let expected = if f == e { 1.0 } else { 0.0 };
                    assert_relative_eq!(flux, expected, epsilon = 1e-12);
                }
            }
        }
    }
}
