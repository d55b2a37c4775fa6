use bempp_rwg::function::{assign_rwg0_dofs, process_segments, Rwg0FunctionSpace, Rwg0SpaceOptions};
use bempp_rwg::grid::{FlatTriangleGrid, FlatTriangleGridBuilder};
use bempp_rwg::shapes::{regular_sphere, screen_triangles};
use bempp_rwg::traits::{Builder, FunctionSpace, GridTopology};
use bempp_rwg::types::Error;

extern crate blas_src;
extern crate lapack_src;

/// Two triangles sharing the edge between the points with ids 1 and 2
fn two_triangles() -> FlatTriangleGrid<f64> {
    let mut b = FlatTriangleGridBuilder::<f64>::new();
    b.add_point(0, [0.0, 0.0, 0.0]);
    b.add_point(1, [1.0, 0.0, 0.0]);
    b.add_point(2, [0.0, 1.0, 0.0]);
    b.add_point(3, [1.0, 1.0, 1.0]);
    b.add_cell(0, [0, 1, 2]);
    b.add_cell(1, [1, 3, 2]);
    b.create_grid().unwrap()
}

fn shared_slot<G: GridTopology>(grid: &G, element: usize, edge: usize) -> usize {
    grid.element_edges(element)
        .iter()
        .position(|e| *e == edge)
        .unwrap()
}

#[test]
fn test_shared_edge_only() {
    let grid = two_triangles();
    let space = Rwg0FunctionSpace::new(&grid, &Rwg0SpaceOptions::default()).unwrap();
    assert_eq!(space.global_dof_count(), 1);
    assert_eq!(space.support_size(), 2);

    let edge = (0..grid.number_of_edges())
        .find(|e| grid.edge_neighbours(*e).len() == 2)
        .unwrap();
    for (element, sign) in [(0, 1), (1, -1)] {
        let slot = shared_slot(&grid, element, edge);
        for local in 0..3 {
            assert_eq!(space.local2global(element)[local], 0);
            let expected = if local == slot { sign } else { 0 };
            assert_eq!(space.local_multipliers(element)[local], expected);
        }
    }
}

#[test]
fn test_with_boundary_dofs() {
    let grid = two_triangles();
    let mut options = Rwg0SpaceOptions::default();
    options.set_include_boundary_dofs(true);
    let space = Rwg0FunctionSpace::new(&grid, &options).unwrap();
    assert_eq!(space.global_dof_count(), 5);
    for element in 0..2 {
        assert!(space.local_multipliers(element).iter().all(|m| *m != 0));
    }
}

#[test]
fn test_isolated_element() {
    let mut b = FlatTriangleGridBuilder::<f64>::new();
    b.add_point(0, [0.0, 0.0, 0.0]);
    b.add_point(1, [1.0, 0.0, 0.0]);
    b.add_point(2, [0.0, 1.0, 0.0]);
    b.add_cell(0, [0, 1, 2]);
    let grid = b.create_grid().unwrap();
    assert!(matches!(
        Rwg0FunctionSpace::new(&grid, &Rwg0SpaceOptions::default()),
        Err(Error::EmptySupport)
    ));
}

#[test]
fn test_support_elements_drop_isolated() {
    // Element 5 of a 2x2 screen shares no edge with elements 0 and 1
    let grid = screen_triangles::<f64>(2).unwrap();
    let mut options = Rwg0SpaceOptions::default();
    options.set_support_elements(vec![0, 1, 5]);
    let space = Rwg0FunctionSpace::new(&grid, &options).unwrap();
    assert_eq!(space.elements_in_support(), vec![0, 1]);
    assert_eq!(space.global_dof_count(), 1);
    assert!(!space.support()[5]);
}

#[test]
fn test_closed_surfaces() {
    for level in 0..4 {
        let grid = regular_sphere::<f32>(level).unwrap();
        let (support, normals) = process_segments(&grid, None, None, None).unwrap();
        assert!(normals.iter().all(|n| *n == 1));
        let dofs = assign_rwg0_dofs(&grid, &support, false).unwrap();
        assert_eq!(dofs.global_dof_count(), grid.number_of_edges());
        assert_eq!(dofs.support(), support.as_slice());
    }
}
