//! Flat triangle grid

use crate::traits::GridTopology;
use crate::types::{Error, RealScalar, Result, RlstArray};
use itertools::{izip, Itertools};
use rlst::{
    rlst_dynamic_array1, rlst_dynamic_array2, rlst_static_array, DefaultIteratorMut, RawAccessMut,
};
use std::collections::HashMap;

/// Pairs of local vertices joined by each local edge of a triangle
pub(crate) const EDGE_VERTICES: [[usize; 2]; 3] = [[0, 1], [2, 0], [1, 2]];

/// A flat triangle grid
pub struct FlatTriangleGrid<T: RealScalar> {
    // Geometry information
    vertices: RlstArray<T, 2>,
    cells: Vec<[usize; 3]>,
    domain_indices: Vec<usize>,
    jacobians: RlstArray<T, 2>,
    integration_elements: RlstArray<T, 1>,
    normals: RlstArray<T, 2>,

    // Topological information
    cells_to_edges: Vec<[usize; 3]>,
    edge_to_vertices: Vec<[usize; 2]>,
    edge_to_cells: Vec<Vec<usize>>,

    // Point and cell ids
    vertex_indices_to_ids: Vec<usize>,
    vertex_ids_to_indices: HashMap<usize, usize>,
    cell_indices_to_ids: Vec<usize>,
    cell_ids_to_indices: HashMap<usize, usize>,
}

impl<T: RealScalar> FlatTriangleGrid<T> {
    /// Create a flat triangle grid
    ///
    /// `cells` contains vertex indices. Fails if a cell refers to a vertex that does not exist,
    /// if a cell has zero area or if an edge is shared by more than two cells.
    pub fn new(
        points: Vec<[T; 3]>,
        cells: Vec<[usize; 3]>,
        domain_indices: Vec<usize>,
        vertex_ids: Vec<usize>,
        cell_ids: Vec<usize>,
    ) -> Result<Self> {
        let nvertices = points.len();
        let ncells = cells.len();
        if domain_indices.len() != ncells || cell_ids.len() != ncells {
            return Err(Error::InvalidGrid(format!(
                "expected {ncells} domain indices and cell ids, got {} and {}",
                domain_indices.len(),
                cell_ids.len()
            )));
        }
        if vertex_ids.len() != nvertices {
            return Err(Error::InvalidGrid(format!(
                "expected {nvertices} vertex ids, got {}",
                vertex_ids.len()
            )));
        }
        for (cell_index, cell) in cells.iter().enumerate() {
            if let Some(v) = cell.iter().find(|v| **v >= nvertices) {
                return Err(Error::InvalidGrid(format!(
                    "cell {cell_index} refers to vertex {v}, but the grid has {nvertices} vertices"
                )));
            }
        }

        let mut vertices = rlst_dynamic_array2!(T, [3, nvertices]);
        for (value, x) in izip!(vertices.data_mut(), points.iter().flatten()) {
            *value = *x;
        }

        // Compute geometry
        let mut jacobians = rlst_dynamic_array2!(T, [3, 2 * ncells]);
        let mut integration_elements = rlst_dynamic_array1!(T, [ncells]);
        let mut normals = rlst_dynamic_array2!(T, [3, ncells]);

        let mut v0 = rlst_static_array!(T, 3);
        let mut v1 = rlst_static_array!(T, 3);
        let mut v2 = rlst_static_array!(T, 3);
        let mut a = rlst_static_array!(T, 3);
        let mut b = rlst_static_array!(T, 3);

        for (cell_index, (cell, mut normal, mut jacobian, integration_element)) in izip!(
            cells.iter(),
            normals.col_iter_mut(),
            jacobians.col_iter_mut().tuples::<(_, _)>(),
            integration_elements.iter_mut(),
        )
        .enumerate()
        {
            v0.fill_from(vertices.view().slice(1, cell[0]));
            v1.fill_from(vertices.view().slice(1, cell[1]));
            v2.fill_from(vertices.view().slice(1, cell[2]));

            a.fill_from(v1.view() - v0.view());
            b.fill_from(v2.view() - v0.view());
            jacobian.0.fill_from(a.view());
            jacobian.1.fill_from(b.view());

            a.cross(b.view(), normal.view_mut());
            let normal_length = normal.view().norm_2();
            if normal_length <= T::zero() {
                return Err(Error::InvalidGrid(format!(
                    "cell {cell_index} is degenerate"
                )));
            }
            normal.scale_inplace(T::one() / normal_length);
            *integration_element = normal_length;
        }

        // Compute topology
        let mut edge_indices = HashMap::<(usize, usize), usize>::new();
        let mut edge_to_cells = Vec::<Vec<usize>>::new();
        let mut edge_to_vertices = Vec::<[usize; 2]>::new();
        let mut cells_to_edges = vec![[0; 3]; ncells];

        for (cell_index, cell) in cells.iter().enumerate() {
            for (local_index, rc) in EDGE_VERTICES.iter().enumerate() {
                let mut first = cell[rc[0]];
                let mut second = cell[rc[1]];
                if first > second {
                    std::mem::swap(&mut first, &mut second);
                }
                let edge_index = *edge_indices.entry((first, second)).or_insert_with(|| {
                    edge_to_cells.push(vec![]);
                    edge_to_vertices.push([first, second]);
                    edge_to_cells.len() - 1
                });
                let neighbours = &mut edge_to_cells[edge_index];
                if neighbours.len() == 2 {
                    return Err(Error::InvalidGrid(format!(
                        "edge ({first}, {second}) is shared by more than two cells"
                    )));
                }
                neighbours.push(cell_index);
                cells_to_edges[cell_index][local_index] = edge_index;
            }
        }

        let vertex_ids_to_indices = vertex_ids
            .iter()
            .enumerate()
            .map(|(index, id)| (*id, index))
            .collect();
        let cell_ids_to_indices = cell_ids
            .iter()
            .enumerate()
            .map(|(index, id)| (*id, index))
            .collect();

        Ok(Self {
            vertices,
            cells,
            domain_indices,
            jacobians,
            integration_elements,
            normals,
            cells_to_edges,
            edge_to_vertices,
            edge_to_cells,
            vertex_indices_to_ids: vertex_ids,
            vertex_ids_to_indices,
            cell_indices_to_ids: cell_ids,
            cell_ids_to_indices,
        })
    }

    /// The two vertices of an edge, in ascending order
    pub fn edge_vertices(&self, edge: usize) -> [usize; 2] {
        self.edge_to_vertices[edge]
    }

    /// The id of the vertex with a given index
    pub fn vertex_id_from_index(&self, index: usize) -> usize {
        self.vertex_indices_to_ids[index]
    }

    /// The index of the vertex with a given id
    pub fn vertex_index_from_id(&self, id: usize) -> Option<usize> {
        self.vertex_ids_to_indices.get(&id).copied()
    }

    /// The id of the cell with a given index
    pub fn cell_id_from_index(&self, index: usize) -> usize {
        self.cell_indices_to_ids[index]
    }

    /// The index of the cell with a given id
    pub fn cell_index_from_id(&self, id: usize) -> Option<usize> {
        self.cell_ids_to_indices.get(&id).copied()
    }

    /// The number of edges with only one adjacent cell
    pub fn number_of_boundary_edges(&self) -> usize {
        self.edge_to_cells.iter().filter(|c| c.len() == 1).count()
    }
}

impl<T: RealScalar> GridTopology for FlatTriangleGrid<T> {
    type T = T;

    fn number_of_vertices(&self) -> usize {
        self.vertex_indices_to_ids.len()
    }
    fn number_of_elements(&self) -> usize {
        self.cells.len()
    }
    fn number_of_edges(&self) -> usize {
        self.edge_to_cells.len()
    }
    fn vertex(&self, index: usize) -> [T; 3] {
        std::array::from_fn(|i| self.vertices[[i, index]])
    }
    fn element_vertices(&self, element: usize) -> [usize; 3] {
        self.cells[element]
    }
    fn element_edges(&self, element: usize) -> [usize; 3] {
        self.cells_to_edges[element]
    }
    fn edge_neighbours(&self, edge: usize) -> &[usize] {
        &self.edge_to_cells[edge]
    }
    fn jacobian(&self, element: usize) -> [[T; 3]; 2] {
        std::array::from_fn(|j| std::array::from_fn(|i| self.jacobians[[i, 2 * element + j]]))
    }
    fn integration_element(&self, element: usize) -> T {
        self.integration_elements[[element]]
    }
    fn normal(&self, element: usize) -> [T; 3] {
        std::array::from_fn(|i| self.normals[[i, element]])
    }
    fn domain_index(&self, element: usize) -> usize {
        self.domain_indices[element]
    }
}
