use approx::assert_relative_eq;
use bempp_rwg::assembly::{
    OperatorDescriptor, SparseAssembler, SparseAssemblerOptions, SparseDiscreteOperator,
};
use bempp_rwg::device::{CpuDevice, Kernel, KernelArguments, KernelSource};
use bempp_rwg::function::{Rwg0FunctionSpace, Rwg0SpaceOptions};
use bempp_rwg::grid::{FlatTriangleGrid, FlatTriangleGridBuilder};
use bempp_rwg::quadrature::triangle_gauss;
use bempp_rwg::shapes::{regular_sphere, screen_triangles};
use bempp_rwg::traits::{Builder, Device, FunctionSpace, GridTopology};
use bempp_rwg::types::{Error, Precision, RealScalar, Result};
use paste::paste;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

extern crate blas_src;
extern crate lapack_src;

/// A device that counts the calls made to it
struct CountingDevice {
    inner: CpuDevice,
    compiles: AtomicUsize,
    launches: AtomicUsize,
    fail_launches: bool,
}

impl CountingDevice {
    fn new(fail_launches: bool) -> Self {
        Self {
            inner: CpuDevice::new(),
            compiles: AtomicUsize::new(0),
            launches: AtomicUsize::new(0),
            fail_launches,
        }
    }
}

impl Device for CountingDevice {
    fn name(&self) -> &str {
        "counting"
    }
    fn vector_width(&self) -> usize {
        self.inner.vector_width()
    }
    fn compile_kernel<T: RealScalar>(&self, source: &KernelSource) -> Result<Kernel<T>> {
        self.compiles.fetch_add(1, Ordering::SeqCst);
        self.inner.compile_kernel(source)
    }
    fn launch<T: RealScalar>(
        &self,
        kernel: &Kernel<T>,
        arguments: &KernelArguments<'_, T>,
        positions: Range<usize>,
        output: &mut [T],
    ) -> Result<()> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail_launches {
            Err(Error::KernelExecution("device lost".to_string()))
        } else {
            self.inner.launch(kernel, arguments, positions, output)
        }
    }
}

fn reference_triangle() -> FlatTriangleGrid<f64> {
    let mut b = FlatTriangleGridBuilder::<f64>::new();
    b.add_point(0, [0.0, 0.0, 0.0]);
    b.add_point(1, [1.0, 0.0, 0.0]);
    b.add_point(2, [0.0, 1.0, 0.0]);
    b.add_cell(0, [0, 1, 2]);
    b.create_grid().unwrap()
}

fn boundary_options() -> Rwg0SpaceOptions {
    let mut options = Rwg0SpaceOptions::default();
    options.set_include_boundary_dofs(true);
    options
}

/// Assemble the identity on the host, one element at a time
fn host_identity<G: GridTopology<T = f64>>(space: &Rwg0FunctionSpace<'_, G>) -> Vec<f64> {
    let rule = triangle_gauss(4).unwrap();
    let npoints = rule.npoints;
    let ndofs = space.global_dof_count();
    let mut matrix = vec![0.0; ndofs * ndofs];
    for element in space.elements_in_support() {
        let values = space.evaluate(element, &rule.points).unwrap();
        let scale = space.grid().integration_element(element);
        let dofs = space.local2global(element);
        for i in 0..3 {
            for j in 0..3 {
                let entry = (0..npoints)
                    .map(|p| {
                        rule.weights[p]
                            * (0..3)
                                .map(|c| {
                                    values[[p, i, c]] * values[[p, j, c]]
                                })
                                .sum::<f64>()
                    })
                    .sum::<f64>();
                matrix[dofs[i] * ndofs + dofs[j]] += scale * entry;
            }
        }
    }
    matrix
}

#[test]
fn test_grid_mismatch() {
    let grid0 = regular_sphere::<f64>(1).unwrap();
    let grid1 = regular_sphere::<f64>(1).unwrap();
    let options = Rwg0SpaceOptions::default();
    let domain = Rwg0FunctionSpace::new(&grid0, &options).unwrap();
    let dual_to_range = Rwg0FunctionSpace::new(&grid1, &options).unwrap();

    let device = CountingDevice::new(false);
    let assembler = SparseAssembler::new(&domain, &dual_to_range);
    let result = assembler.assemble(&OperatorDescriptor::l2_identity(), &device, Precision::Double);
    assert!(matches!(result, Err(Error::GridMismatch)));
    assert_eq!(device.compiles.load(Ordering::SeqCst), 0);
    assert_eq!(device.launches.load(Ordering::SeqCst), 0);
}

#[test]
fn test_device_failure() {
    let grid = regular_sphere::<f64>(1).unwrap();
    let space = Rwg0FunctionSpace::new(&grid, &Rwg0SpaceOptions::default()).unwrap();
    let device = CountingDevice::new(true);
    let assembler = SparseAssembler::new(&space, &space);
    let result = assembler.assemble(&OperatorDescriptor::l2_identity(), &device, Precision::Double);
    assert!(matches!(result, Err(Error::KernelExecution(_))));
    assert_eq!(device.compiles.load(Ordering::SeqCst), 2);
}

#[test]
fn test_unknown_kernel() {
    let grid = regular_sphere::<f64>(0).unwrap();
    let space = Rwg0FunctionSpace::new(&grid, &Rwg0SpaceOptions::default()).unwrap();
    let device = CountingDevice::new(false);
    let assembler = SparseAssembler::new(&space, &space);
    let descriptor = OperatorDescriptor::new("laplace_single_layer", Default::default());
    assert!(matches!(
        assembler.assemble(&descriptor, &device, Precision::Double),
        Err(Error::UnknownKernel(_))
    ));
    assert_eq!(device.launches.load(Ordering::SeqCst), 0);
}

#[test]
fn test_missing_quadrature_rule() {
    let grid = regular_sphere::<f64>(0).unwrap();
    let space = Rwg0FunctionSpace::new(&grid, &Rwg0SpaceOptions::default()).unwrap();
    let mut options = SparseAssemblerOptions::default();
    options.set_quadrature_order(40);
    let assembler = SparseAssembler::new_with_options(&space, &space, options);
    assert!(matches!(
        assembler.assemble(&OperatorDescriptor::l2_identity(), &CpuDevice::new(), Precision::Double),
        Err(Error::QuadratureRuleNotFound(40))
    ));
}

#[test]
fn test_reference_triangle() {
    let grid = reference_triangle();
    let space = Rwg0FunctionSpace::new(&grid, &boundary_options()).unwrap();
    assert_eq!(space.global_dof_count(), 3);
    assert_eq!(space.local2global(0), &[0, 1, 2]);

    let assembler = SparseAssembler::new(&space, &space);
    let matrix = assembler
        .assemble(&OperatorDescriptor::l2_identity(), &CpuDevice::new(), Precision::Double)
        .unwrap();
    assert_eq!(matrix.shape(), [3, 3]);
    assert_eq!(matrix.precision(), Precision::Double);
    let debug = format!("{matrix:?}");
    assert!(debug.starts_with("SparseDiscreteOperator"));
    assert!(debug.contains("precision: Double"));
    assert!(debug.contains("shape: [3, 3]"));
    assert!(debug.contains(&format!("nnz: {}", matrix.nnz())));

    let expected = [
        [1.0 / 3.0, -1.0 / 6.0, 0.0],
        [-1.0 / 6.0, 1.0 / 3.0, 0.0],
        [0.0, 0.0, 1.0 / 3.0],
    ];
    let dense = matrix.to_dense();
    for i in 0..3 {
        for j in 0..3 {
            assert_relative_eq!(dense[3 * i + j], expected[i][j], epsilon = 1e-12);
        }
    }
}

#[test]
fn test_identity_on_sphere() {
    let grid = regular_sphere::<f64>(1).unwrap();
    let space = Rwg0FunctionSpace::new(&grid, &Rwg0SpaceOptions::default()).unwrap();
    let ndofs = space.global_dof_count();
    assert_eq!(ndofs, grid.number_of_edges());

    let assembler = SparseAssembler::new(&space, &space);
    let matrix = assembler
        .assemble(&OperatorDescriptor::l2_identity(), &CpuDevice::new(), Precision::Double)
        .unwrap();
    assert_eq!(matrix.shape(), [ndofs, ndofs]);
    let dense = matrix.to_dense();
    let expected = host_identity(&space);
    for (a, b) in dense.iter().zip(&expected) {
        assert_relative_eq!(*a, *b, epsilon = 1e-12);
    }
    for i in 0..ndofs {
        assert!(dense[i * ndofs + i] > 0.0);
        for j in 0..ndofs {
            assert_relative_eq!(dense[i * ndofs + j], dense[j * ndofs + i], epsilon = 1e-12);
        }
    }
}

#[test]
fn test_vector_width_does_not_change_result() {
    let grid = regular_sphere::<f64>(1).unwrap();
    let space = Rwg0FunctionSpace::new(&grid, &Rwg0SpaceOptions::default()).unwrap();
    let assembler = SparseAssembler::new(&space, &space);
    let descriptor = OperatorDescriptor::l2_identity();

    let reference = assembler
        .assemble(&descriptor, &CpuDevice::with_vector_width(1), Precision::Double)
        .unwrap()
        .to_dense();
    // 32 elements: widths that divide it exactly, leave a remainder, or exceed it
    for width in [3, 4, 7, 32, 40] {
        let dense = assembler
            .assemble(&descriptor, &CpuDevice::with_vector_width(width), Precision::Double)
            .unwrap()
            .to_dense();
        for (a, b) in dense.iter().zip(&reference) {
            assert_relative_eq!(*a, *b, epsilon = 1e-14);
        }
    }
}

#[test]
fn test_partial_support() {
    let grid = screen_triangles::<f64>(4).unwrap();
    let mut options = Rwg0SpaceOptions::default();
    options.set_segments(vec![0]);
    let domain = Rwg0FunctionSpace::new(&grid, &options).unwrap();
    options.set_include_boundary_dofs(true);
    let dual_to_range = Rwg0FunctionSpace::new(&grid, &options).unwrap();

    let assembler = SparseAssembler::new(&domain, &dual_to_range);
    assert_eq!(assembler.active_elements().unwrap(), domain.elements_in_support());
    let matrix = assembler
        .assemble(&OperatorDescriptor::l2_identity(), &CpuDevice::new(), Precision::Double)
        .unwrap();
    assert_eq!(
        matrix.shape(),
        [dual_to_range.global_dof_count(), domain.global_dof_count()]
    );
    assert!(matrix.nnz() > 0);
}

#[test]
fn test_disjoint_supports() {
    let grid = screen_triangles::<f64>(4).unwrap();
    let mut options = Rwg0SpaceOptions::default();
    options.set_segments(vec![0]);
    let domain = Rwg0FunctionSpace::new(&grid, &options).unwrap();
    options.set_segments(vec![1]);
    let dual_to_range = Rwg0FunctionSpace::new(&grid, &options).unwrap();

    let assembler = SparseAssembler::new(&domain, &dual_to_range);
    assert!(assembler.active_elements().unwrap().is_empty());
    let triplets = assembler
        .assemble_sparse::<f64, _>(&OperatorDescriptor::l2_identity(), &CpuDevice::new())
        .unwrap();
    assert!(triplets.is_empty());
    assert_eq!(triplets.shape, [18, 18]);
}

#[test]
fn test_twisted_identity_is_linear_in_normal_sign() {
    let grid = regular_sphere::<f64>(1).unwrap();
    let space = Rwg0FunctionSpace::new(&grid, &Rwg0SpaceOptions::default()).unwrap();
    let mut options = Rwg0SpaceOptions::default();
    options.set_swapped_normals(vec![0, 1]);
    let swapped = Rwg0FunctionSpace::new(&grid, &options).unwrap();
    assert!(swapped.normal_multipliers().iter().all(|n| *n == -1));

    let descriptor = OperatorDescriptor::twisted_identity();
    let device = CpuDevice::new();
    let matrix = SparseAssembler::new(&space, &space)
        .assemble(&descriptor, &device, Precision::Double)
        .unwrap()
        .to_dense();
    let flipped = SparseAssembler::new(&swapped, &space)
        .assemble(&descriptor, &device, Precision::Double)
        .unwrap()
        .to_dense();

    assert!(matrix.iter().any(|v| v.abs() > 1e-3));
    for (a, b) in matrix.iter().zip(&flipped) {
        assert_relative_eq!(*a, -*b, epsilon = 1e-12);
    }
}

macro_rules! test_precision {
    ($(($name:ident, $precision:ident, $promote:expr, $expected:ident, $tol:expr)),+) => {
        $(
            paste! {
                #[test]
                fn [<test_identity_ $name>]() {
                    let grid = regular_sphere::<f64>(2).unwrap();
                    let space = Rwg0FunctionSpace::new(&grid, &Rwg0SpaceOptions::default()).unwrap();
                    let mut options = SparseAssemblerOptions::default();
                    options.set_always_promote_to_double($promote);
                    let assembler = SparseAssembler::new_with_options(&space, &space, options);
                    let matrix = assembler
                        .assemble(&OperatorDescriptor::l2_identity(), &CpuDevice::new(), Precision::$precision)
                        .unwrap();
                    assert!(matches!(matrix, SparseDiscreteOperator::$expected(_)));

                    let expected = host_identity(&space);
                    for (a, b) in matrix.to_dense().iter().zip(&expected) {
                        assert_relative_eq!(*a, *b, epsilon = $tol);
                    }
                }
            }
        )*
    };
}

test_precision!(
    (single, Single, false, Single, 1e-5),
    (single_promoted, Single, true, Double, 1e-5),
    (double, Double, false, Double, 1e-12),
    (double_promoted, Double, true, Double, 1e-12)
);
