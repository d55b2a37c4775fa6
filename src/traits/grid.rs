//! Grid traits
use crate::device::{try_allocate, AccessMode, DeviceBuffer};
use crate::grid::{ElementGeometry, GEOMETRY_STRIDE};
use crate::types::{RealScalar, Result};

pub trait GridTopology {
    //! A flat triangle surface grid
    //!
    //! Every element is a triangle. Local edge `0` of an element joins its local vertices 0 and 1,
    //! local edge `1` joins vertices 2 and 0 and local edge `2` joins vertices 1 and 2.

    /// The floating point type used for coordinates
    type T: RealScalar;

    /// The number of vertices in the grid
    fn number_of_vertices(&self) -> usize;

    /// The number of elements in the grid
    fn number_of_elements(&self) -> usize;

    /// The number of edges in the grid
    fn number_of_edges(&self) -> usize;

    /// The coordinates of a vertex
    fn vertex(&self, index: usize) -> [Self::T; 3];

    /// The vertex indices of an element
    fn element_vertices(&self, element: usize) -> [usize; 3];

    /// The edge indices of an element
    fn element_edges(&self, element: usize) -> [usize; 3];

    /// The elements adjacent to an edge, in ascending order
    ///
    /// A boundary edge has one neighbour and an interior edge has two.
    fn edge_neighbours(&self, edge: usize) -> &[usize];

    /// The columns of the jacobian of the map from the reference triangle to an element
    fn jacobian(&self, element: usize) -> [[Self::T; 3]; 2];

    /// The integration element of an element
    ///
    /// This is the norm of the cross product of the two jacobian columns, ie twice the area.
    fn integration_element(&self, element: usize) -> Self::T;

    /// The unit normal of an element
    fn normal(&self, element: usize) -> [Self::T; 3];

    /// The index of the domain (segment) that an element belongs to
    fn domain_index(&self, element: usize) -> usize;

    /// Copy the geometry of every element into a read-only device buffer
    ///
    /// The buffer holds [GEOMETRY_STRIDE] values for each element, in element order.
    fn push_to_device<U: RealScalar>(&self) -> Result<DeviceBuffer<U>>
    where
        Self: Sized,
    {
        let len = GEOMETRY_STRIDE * self.number_of_elements();
        let mut data = try_allocate(len)?;
        data.resize(len, U::zero());
        for (element, chunk) in data.chunks_mut(GEOMETRY_STRIDE).enumerate() {
            ElementGeometry::<U>::from_grid(self, element).pack(chunk);
        }
        Ok(DeviceBuffer::from_vec(data, AccessMode::ReadOnly))
    }
}

pub trait Builder {
    //! Object that can be used to build a grid

    /// The type of the grid that the builder creates
    type GridType: GridTopology;
    /// The floating point type used for coordinates
    type T: RealScalar;
    /// The type of the data that is input to add a cell
    type CellData;

    /// Create a new grid builder
    fn new() -> Self;

    /// Create a new grid builder with capacaty for a given number of points and cells
    fn new_with_capacity(npoints: usize, ncells: usize) -> Self;

    /// Add a point to the grid
    fn add_point(&mut self, id: usize, data: [Self::T; 3]);

    /// Add a cell to the grid
    fn add_cell(&mut self, id: usize, cell_data: Self::CellData);

    /// Create the grid
    fn create_grid(self) -> Result<Self::GridType>;
}
