//! Lowest order RWG function space
use crate::element::{reference_points, Rwg0Shapeset};
use crate::function::support::process_segments;
use crate::grid::ElementGeometry;
use crate::traits::{FunctionSpace, GridTopology, Shapeset};
use crate::types::{Error, Multiplier, RealScalar, Result, RlstArray};
use rlst::{rlst_dynamic_array3, rlst_dynamic_array4, Shape};

/// The global DOFs and multipliers of the local basis functions of a RWG space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DofAssignment {
    local2global: Vec<[usize; 3]>,
    local_multipliers: Vec<[Multiplier; 3]>,
    global_dof_count: usize,
    support: Vec<bool>,
}

impl DofAssignment {
    /// The global DOFs of the three local functions of an element
    ///
    /// Slots with multiplier 0 hold the DOF of another slot of the same element.
    pub fn local2global(&self, element: usize) -> &[usize; 3] {
        &self.local2global[element]
    }

    /// The multipliers of the three local functions of an element
    pub fn local_multipliers(&self, element: usize) -> &[Multiplier; 3] {
        &self.local_multipliers[element]
    }

    /// The number of global DOFs
    pub fn global_dof_count(&self) -> usize {
        self.global_dof_count
    }

    /// The support after removing elements without a DOF
    pub fn support(&self) -> &[bool] {
        &self.support
    }
}

struct DofAccumulator {
    count: usize,
    edge_dofs: Vec<Option<usize>>,
    local2global: Vec<[usize; 3]>,
    local_multipliers: Vec<[Multiplier; 3]>,
    removed: Vec<usize>,
}

/// Assign a global DOF to every edge in the support of a RWG space
///
/// An edge between two elements in `support` gets one DOF, with multiplier `1` on the element
/// with the lower index and `-1` on the other. An edge with no neighbour in `support` gets a
/// DOF with multiplier `1` if `include_boundary_dofs` is set and multiplier `0` otherwise.
/// DOFs are numbered in the order in which elements first visit their edges. Elements left
/// without a DOF are removed from the support.
pub fn assign_rwg0_dofs<G: GridTopology>(
    grid: &G,
    support: &[bool],
    include_boundary_dofs: bool,
) -> Result<DofAssignment> {
    let nelements = grid.number_of_elements();
    if support.len() != nelements {
        return Err(Error::InvalidSupport(format!(
            "support mask has length {}, but the grid has {nelements} elements",
            support.len()
        )));
    }

    let initial = DofAccumulator {
        count: 0,
        edge_dofs: vec![None; grid.number_of_edges()],
        local2global: vec![[0; 3]; nelements],
        local_multipliers: vec![[0; 3]; nelements],
        removed: vec![],
    };

    let assigned = (0..nelements)
        .filter(|element| support[*element])
        .fold(initial, |mut acc, element| {
            let mut dofs = [None; 3];
            let mut multipliers = [0; 3];
            for (local_index, edge) in grid.element_edges(element).iter().enumerate() {
                let other = grid
                    .edge_neighbours(*edge)
                    .iter()
                    .copied()
                    .find(|n| *n != element && support[*n]);
                match other {
                    None => {
                        if include_boundary_dofs {
                            dofs[local_index] = Some(acc.count);
                            multipliers[local_index] = 1;
                            acc.count += 1;
                        }
                    }
                    Some(other) => {
                        let dof = match acc.edge_dofs[*edge] {
                            Some(dof) => dof,
                            None => {
                                let dof = acc.count;
                                acc.edge_dofs[*edge] = Some(dof);
                                acc.count += 1;
                                dof
                            }
                        };
                        dofs[local_index] = Some(dof);
                        multipliers[local_index] = if element < other { 1 } else { -1 };
                    }
                }
            }

            match dofs.iter().flatten().next().copied() {
                None => acc.removed.push(element),
                Some(first) => {
                    acc.local2global[element] = dofs.map(|dof| dof.unwrap_or(first));
                    acc.local_multipliers[element] = multipliers;
                }
            }
            acc
        });

    let mut support = support.to_vec();
    for element in &assigned.removed {
        support[*element] = false;
    }
    if !assigned.removed.is_empty() {
        log::warn!(
            "Removed {} elements without a DOF from the support",
            assigned.removed.len()
        );
    }
    if !support.iter().any(|s| *s) {
        return Err(Error::EmptySupport);
    }
    log::debug!(
        "Assigned {} RWG DOFs on {} elements",
        assigned.count,
        support.iter().filter(|s| **s).count()
    );

    Ok(DofAssignment {
        local2global: assigned.local2global,
        local_multipliers: assigned.local_multipliers,
        global_dof_count: assigned.count,
        support,
    })
}

/// Options used to create a RWG space
#[derive(Debug, Clone, Default)]
pub struct Rwg0SpaceOptions {
    support_elements: Option<Vec<usize>>,
    segments: Option<Vec<usize>>,
    swapped_normals: Option<Vec<usize>>,
    include_boundary_dofs: bool,
}

impl Rwg0SpaceOptions {
    /// Restrict the space to a list of elements
    pub fn set_support_elements(&mut self, elements: Vec<usize>) {
        self.support_elements = Some(elements);
    }
    /// Restrict the space to the elements in a set of domains
    pub fn set_segments(&mut self, segments: Vec<usize>) {
        self.segments = Some(segments);
    }
    /// Flip the normals of the elements in a set of domains
    pub fn set_swapped_normals(&mut self, domains: Vec<usize>) {
        self.swapped_normals = Some(domains);
    }
    /// Give edges on the boundary of the support a DOF
    pub fn set_include_boundary_dofs(&mut self, include: bool) {
        self.include_boundary_dofs = include;
    }
    /// Are edges on the boundary of the support given a DOF?
    pub fn include_boundary_dofs(&self) -> bool {
        self.include_boundary_dofs
    }
}

/// A space of lowest order RWG functions
pub struct Rwg0FunctionSpace<'a, G: GridTopology> {
    grid: &'a G,
    dofs: DofAssignment,
    normal_multipliers: Vec<i32>,
}

impl<'a, G: GridTopology> Rwg0FunctionSpace<'a, G> {
    /// Create a space
    ///
    /// Fails if no element of the support has a DOF.
    pub fn new(grid: &'a G, options: &Rwg0SpaceOptions) -> Result<Self> {
        let (support, normal_multipliers) = process_segments(
            grid,
            options.support_elements.as_deref(),
            options.segments.as_deref(),
            options.swapped_normals.as_deref(),
        )?;
        let dofs = assign_rwg0_dofs(grid, &support, options.include_boundary_dofs)?;
        Ok(Self {
            grid,
            dofs,
            normal_multipliers,
        })
    }

    /// The DOF assignment of the space
    pub fn dof_assignment(&self) -> &DofAssignment {
        &self.dofs
    }

    /// The identifier of the space
    pub fn identifier(&self) -> &'static str {
        "rwg0"
    }

    /// The number of components of the basis functions
    pub fn codomain_dimension(&self) -> usize {
        3
    }

    /// The polynomial order of the basis functions
    pub fn order(&self) -> usize {
        0
    }

    /// The number of elements in the support
    pub fn support_size(&self) -> usize {
        self.dofs.support.iter().filter(|s| **s).count()
    }

    /// The elements in the support, in ascending order
    pub fn elements_in_support(&self) -> Vec<usize> {
        self.dofs
            .support
            .iter()
            .enumerate()
            .filter(|(_, s)| **s)
            .map(|(element, _)| element)
            .collect()
    }

    /// Evaluate the basis functions of an element at points on the reference triangle
    ///
    /// `points` stores the (x, y) coordinates of each point consecutively. Entry `[p, f, c]` of
    /// the result is component `c` of the local function `f` at point `p`. Local multipliers are
    /// applied, so the functions in slots with multiplier 0 vanish.
    pub fn evaluate<T: RealScalar>(
        &self,
        element: usize,
        points: &[T],
    ) -> Result<RlstArray<T, 3>> {
        let points = reference_points(points)?;
        let npoints = points.shape()[1];
        let mut reference_values =
            rlst_dynamic_array4!(T, Rwg0Shapeset.tabulate_array_shape(npoints));
        Rwg0Shapeset.tabulate(&points, &mut reference_values);
        let mut values = rlst_dynamic_array3!(T, [npoints, 3, 3]);
        Rwg0Shapeset.push_forward(
            &ElementGeometry::<T>::from_grid(self.grid, element),
            &reference_values,
            &mut values,
        );

        for (f, m) in self.dofs.local_multipliers(element).iter().enumerate() {
            let multiplier = match m.signum() {
                1 => T::one(),
                -1 => -T::one(),
                _ => T::zero(),
            };
            for p in 0..npoints {
                for c in 0..3 {
                    values[[p, f, c]] = multiplier * values[[p, f, c]];
                }
            }
        }
        Ok(values)
    }

    /// Evaluate the surface gradients of the basis functions
    ///
    /// RWG functions have no surface gradient, so this always fails.
    pub fn surface_gradient<T: RealScalar>(&self, _element: usize, _points: &[T]) -> Result<Vec<T>> {
        Err(Error::Unsupported(
            "surface gradients of rwg0 functions".to_string(),
        ))
    }
}

impl<'a, G: GridTopology> FunctionSpace for Rwg0FunctionSpace<'a, G> {
    type Grid = G;

    fn grid(&self) -> &G {
        self.grid
    }
    fn shapeset_identifier(&self) -> &str {
        Rwg0Shapeset.identifier()
    }
    fn number_of_shape_functions(&self) -> usize {
        3
    }
    fn global_dof_count(&self) -> usize {
        self.dofs.global_dof_count
    }
    fn support(&self) -> &[bool] {
        &self.dofs.support
    }
    fn local2global(&self, element: usize) -> &[usize] {
        &self.dofs.local2global[element]
    }
    fn local_multipliers(&self, element: usize) -> &[Multiplier] {
        &self.dofs.local_multipliers[element]
    }
    fn normal_multipliers(&self) -> &[i32] {
        &self.normal_multipliers
    }
}
