//! Geometry of a single element, as stored in device buffers
use crate::grid::flat_triangle_grid::grid::EDGE_VERTICES;
use crate::traits::GridTopology;
use crate::types::{convert, RealScalar};
use rlst::{rlst_static_array, rlst_static_type, RawAccess, RawAccessMut};

/// The number of values stored for each element in a device geometry buffer
///
/// Each element stores its three vertices, the two columns of its jacobian, its unit normal
/// and its integration element, in this order.
pub const GEOMETRY_STRIDE: usize = 19;

/// The geometry of a flat triangle
pub struct ElementGeometry<T: RealScalar> {
    /// Vertex coordinates, one vertex in each column
    pub vertices: rlst_static_type!(T, 3, 3),
    /// The jacobian of the map from the reference triangle
    pub jacobian: rlst_static_type!(T, 3, 2),
    /// Unit normal
    pub normal: rlst_static_type!(T, 3),
    /// Integration element
    pub integration_element: T,
}

impl<T: RealScalar> ElementGeometry<T> {
    fn zeros() -> Self {
        Self {
            vertices: rlst_static_array!(T, 3, 3),
            jacobian: rlst_static_array!(T, 3, 2),
            normal: rlst_static_array!(T, 3),
            integration_element: T::zero(),
        }
    }

    /// Read the geometry of an element from a grid, converting to the scalar type `T`
    pub fn from_grid<G: GridTopology>(grid: &G, element: usize) -> Self {
        let mut geometry = Self::zeros();
        let jacobian = grid.jacobian(element);
        let normal = grid.normal(element);
        for (j, v) in grid.element_vertices(element).iter().enumerate() {
            let vertex = grid.vertex(*v);
            for i in 0..3 {
                geometry.vertices[[i, j]] = convert(vertex[i]);
            }
        }
        for i in 0..3 {
            geometry.jacobian[[i, 0]] = convert(jacobian[0][i]);
            geometry.jacobian[[i, 1]] = convert(jacobian[1][i]);
            geometry.normal[[i]] = convert(normal[i]);
        }
        geometry.integration_element = convert(grid.integration_element(element));
        geometry
    }

    /// Write the geometry into a slice of length [GEOMETRY_STRIDE]
    pub fn pack(&self, data: &mut [T]) {
        debug_assert_eq!(data.len(), GEOMETRY_STRIDE);
        data[..9].copy_from_slice(self.vertices.data());
        data[9..15].copy_from_slice(self.jacobian.data());
        data[15..18].copy_from_slice(self.normal.data());
        data[18] = self.integration_element;
    }

    /// Read the geometry of element `element` from a packed geometry buffer
    pub fn unpack(data: &[T], element: usize) -> Self {
        let d = &data[element * GEOMETRY_STRIDE..(element + 1) * GEOMETRY_STRIDE];
        let mut geometry = Self::zeros();
        geometry.vertices.data_mut().copy_from_slice(&d[..9]);
        geometry.jacobian.data_mut().copy_from_slice(&d[9..15]);
        geometry.normal.data_mut().copy_from_slice(&d[15..18]);
        geometry.integration_element = d[18];
        geometry
    }

    /// The lengths of the three edges of the element
    pub fn edge_lengths(&self) -> [T; 3] {
        EDGE_VERTICES.map(|[a, b]| {
            (self.vertices.view().slice::<1>(1, a) - self.vertices.view().slice::<1>(1, b))
                .norm_2()
        })
    }

    /// Apply the jacobian to a reference vector
    pub fn apply_jacobian(&self, reference: [T; 2]) -> [T; 3] {
        std::array::from_fn(|i| {
            self.jacobian[[i, 0]] * reference[0] + self.jacobian[[i, 1]] * reference[1]
        })
    }
}
