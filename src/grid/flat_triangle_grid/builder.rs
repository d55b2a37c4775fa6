//! Grid builder

use crate::grid::flat_triangle_grid::FlatTriangleGrid;
use crate::traits::Builder;
use crate::types::{Error, RealScalar, Result};

/// Grid builder for a flat triangle grid
pub struct FlatTriangleGridBuilder<T: RealScalar> {
    pub(crate) points: Vec<[T; 3]>,
    cells: Vec<[usize; 3]>,
    domain_indices: Vec<usize>,
    point_ids: Vec<usize>,
    cell_ids: Vec<usize>,
}

impl<T: RealScalar> FlatTriangleGridBuilder<T> {
    /// Add a cell that belongs to the domain (segment) with index `domain`
    pub fn add_cell_in_domain(&mut self, id: usize, cell_data: [usize; 3], domain: usize) {
        self.cell_ids.push(id);
        self.cells.push(cell_data);
        self.domain_indices.push(domain);
    }
}

impl<T: RealScalar> Builder for FlatTriangleGridBuilder<T> {
    type GridType = FlatTriangleGrid<T>;
    type T = T;
    type CellData = [usize; 3];

    fn new() -> Self {
        Self {
            points: vec![],
            cells: vec![],
            domain_indices: vec![],
            point_ids: vec![],
            cell_ids: vec![],
        }
    }

    fn new_with_capacity(npoints: usize, ncells: usize) -> Self {
        Self {
            points: Vec::with_capacity(npoints),
            cells: Vec::with_capacity(ncells),
            domain_indices: Vec::with_capacity(ncells),
            point_ids: Vec::with_capacity(npoints),
            cell_ids: Vec::with_capacity(ncells),
        }
    }

    fn add_point(&mut self, id: usize, data: [T; 3]) {
        self.point_ids.push(id);
        self.points.push(data);
    }

    fn add_cell(&mut self, id: usize, cell_data: [usize; 3]) {
        self.add_cell_in_domain(id, cell_data, 0);
    }

    fn create_grid(self) -> Result<FlatTriangleGrid<T>> {
        let mut point_ids_to_indices = std::collections::HashMap::new();
        for (index, id) in self.point_ids.iter().enumerate() {
            if point_ids_to_indices.insert(*id, index).is_some() {
                return Err(Error::InvalidGrid(format!("duplicate point id {id}")));
            }
        }
        let cells = self
            .cells
            .iter()
            .map(|cell| {
                let mut indices = [0; 3];
                for (index, id) in indices.iter_mut().zip(cell) {
                    *index = *point_ids_to_indices
                        .get(id)
                        .ok_or_else(|| Error::InvalidGrid(format!("unknown point id {id}")))?;
                }
                Ok(indices)
            })
            .collect::<Result<Vec<_>>>()?;

        FlatTriangleGrid::new(
            self.points,
            cells,
            self.domain_indices,
            self.point_ids,
            self.cell_ids,
        )
    }
}
