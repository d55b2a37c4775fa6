//! Sparse assembly of local operators on a device
use crate::assembly::common::{equal_grids, SparseMatrixData};
use crate::device::{
    kernel_source_from_identifier, AccessMode, DeviceBuffer, KernelArguments, KernelOption,
    KernelOptions, KernelVariant,
};
use crate::quadrature::triangle_gauss;
use crate::traits::{Device, FunctionSpace, GridTopology};
use crate::types::{convert, Error, Precision, RealScalar, Result};
use itertools::izip;
use rlst::{CsrMatrix, Shape};

/// An operator that is assembled element by element
#[derive(Debug, Clone)]
pub struct OperatorDescriptor {
    identifier: String,
    options: KernelOptions,
}

impl OperatorDescriptor {
    /// Create a descriptor from a kernel identifier and compile-time options
    ///
    /// The shapeset and quadrature options are filled in by the assembler and override any
    /// values given here.
    pub fn new(identifier: &str, options: KernelOptions) -> Self {
        Self {
            identifier: identifier.to_string(),
            options,
        }
    }

    /// The identity operator
    pub fn l2_identity() -> Self {
        Self::new("l2_identity", KernelOptions::new())
    }

    /// The identity operator with the trial functions rotated by the normal
    pub fn twisted_identity() -> Self {
        Self::new("twisted_identity", KernelOptions::new())
    }

    /// The kernel identifier
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The compile-time options
    pub fn options(&self) -> &KernelOptions {
        &self.options
    }
}

/// Options for a sparse assembler
#[derive(Debug, Clone)]
pub struct SparseAssemblerOptions {
    /// Order of the Gauss rule used on each element
    quadrature_order: usize,
    /// Return double precision matrices even when the device computes in single precision
    always_promote_to_double: bool,
}

impl Default for SparseAssemblerOptions {
    fn default() -> Self {
        Self {
            quadrature_order: 4,
            always_promote_to_double: false,
        }
    }
}

impl SparseAssemblerOptions {
    /// Order of the Gauss rule used on each element
    pub fn quadrature_order(&self) -> usize {
        self.quadrature_order
    }
    /// Set the order of the Gauss rule used on each element
    pub fn set_quadrature_order(&mut self, order: usize) {
        self.quadrature_order = order;
    }
    /// Are single precision results converted to double precision?
    pub fn always_promote_to_double(&self) -> bool {
        self.always_promote_to_double
    }
    /// Set whether single precision results are converted to double precision
    pub fn set_always_promote_to_double(&mut self, promote: bool) {
        self.always_promote_to_double = promote;
    }
}

/// A sparse matrix produced by a [SparseAssembler]
pub enum SparseDiscreteOperator {
    /// A single precision matrix
    Single(CsrMatrix<f32>),
    /// A double precision matrix
    Double(CsrMatrix<f64>),
}

impl std::fmt::Debug for SparseDiscreteOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparseDiscreteOperator")
            .field("precision", &self.precision())
            .field("shape", &self.shape())
            .field("nnz", &self.nnz())
            .finish()
    }
}

impl SparseDiscreteOperator {
    /// The precision of the matrix entries
    pub fn precision(&self) -> Precision {
        match self {
            SparseDiscreteOperator::Single(_) => Precision::Single,
            SparseDiscreteOperator::Double(_) => Precision::Double,
        }
    }

    /// The shape of the matrix
    pub fn shape(&self) -> [usize; 2] {
        match self {
            SparseDiscreteOperator::Single(m) => m.shape(),
            SparseDiscreteOperator::Double(m) => m.shape(),
        }
    }

    /// The number of stored entries
    pub fn nnz(&self) -> usize {
        match self {
            SparseDiscreteOperator::Single(m) => m.data().len(),
            SparseDiscreteOperator::Double(m) => m.data().len(),
        }
    }

    /// The entries of the matrix as a row-major dense array of doubles
    pub fn to_dense(&self) -> Vec<f64> {
        fn dense<T: RealScalar>(m: &CsrMatrix<T>) -> Vec<f64> {
            let [nrows, ncols] = m.shape();
            let mut out = vec![0.0; nrows * ncols];
            for (row, range) in m.indptr().windows(2).enumerate() {
                for (col, value) in m.indices()[range[0]..range[1]]
                    .iter()
                    .zip(&m.data()[range[0]..range[1]])
                {
                    out[row * ncols + col] += convert::<T, f64>(*value);
                }
            }
            out
        }
        match self {
            SparseDiscreteOperator::Single(m) => dense(m),
            SparseDiscreteOperator::Double(m) => dense(m),
        }
    }
}

/// Assembler for operators whose element contributions only couple functions on the same element
///
/// `domain` provides the trial functions (columns) and `dual_to_range` the test functions
/// (rows). Both spaces must be defined on the same grid.
pub struct SparseAssembler<'a, Domain: FunctionSpace, DualToRange: FunctionSpace> {
    domain: &'a Domain,
    dual_to_range: &'a DualToRange,
    options: SparseAssemblerOptions,
}

impl<'a, Domain: FunctionSpace, DualToRange: FunctionSpace> SparseAssembler<'a, Domain, DualToRange> {
    /// Create an assembler with default options
    pub fn new(domain: &'a Domain, dual_to_range: &'a DualToRange) -> Self {
        Self::new_with_options(domain, dual_to_range, SparseAssemblerOptions::default())
    }

    /// Create an assembler
    pub fn new_with_options(
        domain: &'a Domain,
        dual_to_range: &'a DualToRange,
        options: SparseAssemblerOptions,
    ) -> Self {
        Self {
            domain,
            dual_to_range,
            options,
        }
    }

    /// Get assembler options
    pub fn options(&self) -> &SparseAssemblerOptions {
        &self.options
    }

    /// Get mutable assembler options
    pub fn options_mut(&mut self) -> &mut SparseAssemblerOptions {
        &mut self.options
    }

    /// The shape of the assembled matrix
    pub fn shape(&self) -> [usize; 2] {
        [
            self.dual_to_range.global_dof_count(),
            self.domain.global_dof_count(),
        ]
    }

    /// The elements in the support of both spaces, in ascending order
    pub fn active_elements(&self) -> Result<Vec<usize>> {
        self.check_grids()?;
        let nelements = self.domain.grid().number_of_elements();
        let (domain_support, dual_support) = (self.domain.support(), self.dual_to_range.support());
        if domain_support.len() != nelements || dual_support.len() != nelements {
            return Err(Error::InvalidSupport(format!(
                "support masks of length {} and {} on a grid with {nelements} elements",
                domain_support.len(),
                dual_support.len()
            )));
        }
        Ok(izip!(domain_support, dual_support)
            .enumerate()
            .filter(|(_, (a, b))| **a && **b)
            .map(|(element, _)| element)
            .collect())
    }

    fn check_grids(&self) -> Result<()> {
        if equal_grids(self.domain.grid(), self.dual_to_range.grid()) {
            Ok(())
        } else {
            Err(Error::GridMismatch)
        }
    }

    fn kernel_options(&self, npoints: usize) -> KernelOptions {
        let mut options = KernelOptions::new();
        options.insert(
            "NUMBER_OF_QUAD_POINTS".to_string(),
            KernelOption::Integer(npoints),
        );
        options.insert(
            "TEST".to_string(),
            self.dual_to_range.shapeset_identifier().into(),
        );
        options.insert(
            "TRIAL".to_string(),
            self.domain.shapeset_identifier().into(),
        );
        options.insert(
            "NUMBER_OF_TEST_SHAPE_FUNCTIONS".to_string(),
            self.dual_to_range.number_of_shape_functions().into(),
        );
        options.insert(
            "NUMBER_OF_TRIAL_SHAPE_FUNCTIONS".to_string(),
            self.domain.number_of_shape_functions().into(),
        );
        options
    }

    /// Evaluate the kernel on every active element and map the element blocks to global DOFs
    ///
    /// The returned triplets are indexed by global test (row) and trial (column) DOFs, with the
    /// local multipliers applied. Entries at the same position are not yet summed.
    pub fn assemble_sparse<T: RealScalar, D: Device>(
        &self,
        descriptor: &OperatorDescriptor,
        device: &D,
    ) -> Result<SparseMatrixData<T>> {
        let elements = self.active_elements()?;
        let grid = self.domain.grid();
        let nelements = grid.number_of_elements();
        let nactive = elements.len();
        let ntest = self.dual_to_range.number_of_shape_functions();
        let ntrial = self.domain.number_of_shape_functions();
        log::debug!(
            "Assembling {} on {nactive} of {nelements} elements",
            descriptor.identifier()
        );

        let rule = triangle_gauss(self.options.quadrature_order)?;
        let mut options = descriptor.options().clone();
        options.extend(self.kernel_options(rule.npoints));

        let width = device.vector_width();
        let main_kernel = device.compile_kernel::<T>(&kernel_source_from_identifier(
            descriptor.identifier(),
            &options,
            KernelVariant::Vectorised(width),
        )?)?;
        let remainder_kernel = device.compile_kernel::<T>(&kernel_source_from_identifier(
            descriptor.identifier(),
            &options,
            KernelVariant::Scalar,
        )?)?;

        // Device buffers are dropped when this function returns, including on failure
        let grid_buffer = grid.push_to_device::<T>()?;
        let element_buffer = DeviceBuffer::from_vec(
            elements
                .iter()
                .map(|e| {
                    u32::try_from(*e).map_err(|_| {
                        Error::DeviceBuffer(format!("element index {e} does not fit in 32 bits"))
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            AccessMode::ReadOnly,
        );
        let test_signs = DeviceBuffer::from_slice(
            self.dual_to_range.normal_multipliers(),
            AccessMode::ReadOnly,
        )?;
        let trial_signs =
            DeviceBuffer::from_slice(self.domain.normal_multipliers(), AccessMode::ReadOnly)?;
        let quad_points = DeviceBuffer::from_vec(rule.points_as::<T>(), AccessMode::ReadOnly);
        let quad_weights = DeviceBuffer::from_vec(rule.weights_as::<T>(), AccessMode::ReadOnly);
        let mut result =
            DeviceBuffer::<T>::zeros(nactive * ntest * ntrial, AccessMode::WriteOnly)?;

        let arguments = KernelArguments {
            grid: &grid_buffer,
            elements: &element_buffer,
            test_normal_signs: &test_signs,
            trial_normal_signs: &trial_signs,
            quad_points: &quad_points,
            quad_weights: &quad_weights,
            number_of_grid_elements: nelements,
        };

        let split = nactive - nactive % width;
        {
            let (main_output, remainder_output) =
                result.as_mut_slice()?.split_at_mut(split * ntest * ntrial);
            let (main, remainder) = rayon::join(
                || device.launch(&main_kernel, &arguments, 0..split, main_output),
                || device.launch(&remainder_kernel, &arguments, split..nactive, remainder_output),
            );
            main?;
            remainder?;
        }
        let values = result.host_copy();

        // Row-major element blocks: position e holds rows e * ntest.. and columns e * ntrial..
        let rows = (0..nactive * ntest).flat_map(|row| std::iter::repeat(row).take(ntrial));
        let cols =
            (0..nactive).flat_map(|e| (0..ntest).flat_map(move |_| e * ntrial..(e + 1) * ntrial));

        let mut matrix = SparseMatrixData::new_known_size(self.shape(), values.len());
        for (row, col, value) in izip!(rows, cols, values) {
            let element = elements[row / ntest];
            let (i, j) = (row % ntest, col % ntrial);
            let multiplier = self.dual_to_range.local_multipliers(element)[i]
                * self.domain.local_multipliers(element)[j];
            if multiplier != 0 {
                matrix.push(
                    self.dual_to_range.local2global(element)[i],
                    self.domain.local2global(element)[j],
                    convert::<f64, T>(f64::from(multiplier)) * value,
                );
            }
        }
        Ok(matrix)
    }

    /// Assemble the operator into a sparse matrix
    ///
    /// The element kernels run on `device` in the given precision.
    pub fn assemble<D: Device>(
        &self,
        descriptor: &OperatorDescriptor,
        device: &D,
        precision: Precision,
    ) -> Result<SparseDiscreteOperator> {
        let operator = match precision {
            Precision::Single => {
                let matrix = self.assemble_sparse::<f32, D>(descriptor, device)?;
                if self.options.always_promote_to_double {
                    SparseDiscreteOperator::Double(matrix.promote::<f64>().to_csr()?)
                } else {
                    SparseDiscreteOperator::Single(matrix.to_csr()?)
                }
            }
            Precision::Double => SparseDiscreteOperator::Double(
                self.assemble_sparse::<f64, D>(descriptor, device)?
                    .to_csr()?,
            ),
        };
        log::info!(
            "Assembled {} on device {} in {} precision: shape {:?}, {} non-zeros",
            descriptor.identifier(),
            device.name(),
            precision.name(),
            operator.shape(),
            operator.nnz()
        );
        Ok(operator)
    }
}
