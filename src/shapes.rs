//! Definition of various test shapes.

use crate::grid::{FlatTriangleGrid, FlatTriangleGridBuilder};
use crate::traits::Builder;
use crate::types::{convert, Error, RealScalar, Result};
use num::Float;
use std::collections::HashMap;

/// Create a regular sphere
///
/// A regular sphere is created by starting with a regular octahedron. The shape is then refined `refinement_level` times.
/// Each time the grid is refined, each triangle is split into four triangles (by adding lines connecting the midpoints of
/// each edge). The new points are then scaled so that they are a distance of 1 from the origin.
///
/// The cells on the upper hemisphere (z > 0) are in domain 0 and the cells on the lower hemisphere are in domain 1.
pub fn regular_sphere<T: RealScalar>(refinement_level: u32) -> Result<FlatTriangleGrid<T>> {
    let mut b = FlatTriangleGridBuilder::new_with_capacity(
        2 + usize::pow(4, refinement_level + 1),
        8 * usize::pow(4, refinement_level),
    );
    let zero = T::zero();
    let one = T::one();
    let half = convert::<f64, T>(0.5);
    b.add_point(0, [zero, zero, one]);
    b.add_point(1, [one, zero, zero]);
    b.add_point(2, [zero, one, zero]);
    b.add_point(3, [-one, zero, zero]);
    b.add_point(4, [zero, -one, zero]);
    b.add_point(5, [zero, zero, -one]);
    let mut point_n = 6;

    let mut cells = vec![
        [0, 1, 2],
        [0, 2, 3],
        [0, 3, 4],
        [0, 4, 1],
        [5, 2, 1],
        [5, 3, 2],
        [5, 4, 3],
        [5, 1, 4],
    ];

    for level in 0..refinement_level {
        let mut edge_points = HashMap::new();
        let mut new_cells = Vec::with_capacity(8 * usize::pow(4, level + 1));
        for c in &cells {
            let v = [b.points[c[0]], b.points[c[1]], b.points[c[2]]];
            let edges = [[1, 2], [0, 2], [0, 1]].map(|[i, j]| {
                let mut pt_i = c[i];
                let mut pt_j = c[j];
                if pt_i > pt_j {
                    std::mem::swap(&mut pt_i, &mut pt_j);
                }
                *edge_points.entry((pt_i, pt_j)).or_insert_with(|| {
                    let mut new_pt = [
                        half * (v[i][0] + v[j][0]),
                        half * (v[i][1] + v[j][1]),
                        half * (v[i][2] + v[j][2]),
                    ];
                    let size = Float::sqrt(new_pt.iter().map(|x| Float::powi(*x, 2)).sum::<T>());
                    for x in new_pt.iter_mut() {
                        *x = *x / size;
                    }
                    b.add_point(point_n, new_pt);
                    point_n += 1;
                    point_n - 1
                })
            });
            new_cells.push([c[0], edges[2], edges[1]]);
            new_cells.push([c[1], edges[0], edges[2]]);
            new_cells.push([c[2], edges[1], edges[0]]);
            new_cells.push([edges[0], edges[1], edges[2]]);
        }
        cells = new_cells;
    }
    for (i, c) in cells.iter().enumerate() {
        let z = b.points[c[0]][2] + b.points[c[1]][2] + b.points[c[2]][2];
        b.add_cell_in_domain(i, *c, if z > zero { 0 } else { 1 });
    }

    b.create_grid()
}

/// Create a square grid with triangle cells
///
/// Create a grid of the square \[0,1\]^2 with triangle cells. The input ncells is the number of cells
/// along each side of the square. Cells with midpoint x < 1/2 are in domain 0, the others in domain 1.
pub fn screen_triangles<T: RealScalar>(ncells: usize) -> Result<FlatTriangleGrid<T>> {
    if ncells == 0 {
        return Err(Error::InvalidGrid(
            "Cannot create a grid with 0 cells".to_string(),
        ));
    }
    let mut b = FlatTriangleGridBuilder::new_with_capacity((ncells + 1) * (ncells + 1), 2 * ncells * ncells);

    let zero = T::zero();
    let n = convert::<f64, T>(ncells as f64);
    for y in 0..ncells + 1 {
        for x in 0..ncells + 1 {
            b.add_point(
                y * (ncells + 1) + x,
                [
                    convert::<f64, T>(x as f64) / n,
                    convert::<f64, T>(y as f64) / n,
                    zero,
                ],
            );
        }
    }
    for y in 0..ncells {
        for x in 0..ncells {
            let domain = if 2 * x + 1 < ncells { 0 } else { 1 };
            b.add_cell_in_domain(
                2 * y * ncells + 2 * x,
                [
                    y * (ncells + 1) + x,
                    y * (ncells + 1) + x + 1,
                    y * (ncells + 1) + x + ncells + 2,
                ],
                domain,
            );
            b.add_cell_in_domain(
                2 * y * ncells + 2 * x + 1,
                [
                    y * (ncells + 1) + x,
                    y * (ncells + 1) + x + ncells + 2,
                    y * (ncells + 1) + x + ncells + 1,
                ],
                domain,
            );
        }
    }

    b.create_grid()
}
