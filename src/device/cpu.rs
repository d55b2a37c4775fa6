//! A device that runs kernels on the host
use crate::device::{ElementKernelData, Kernel, KernelArguments, KernelSource, KernelVariant};
use crate::element::reference_points;
use crate::grid::{ElementGeometry, GEOMETRY_STRIDE};
use crate::traits::{Device, Shapeset};
use crate::types::{convert, Error, RealScalar, Result};
use rayon::prelude::*;
use rlst::rlst_dynamic_array4;
use std::ops::Range;

/// A device that runs kernels on the rayon thread pool of the host
#[derive(Debug, Clone)]
pub struct CpuDevice {
    name: String,
    vector_width: usize,
}

impl Default for CpuDevice {
    fn default() -> Self {
        Self {
            name: "cpu".to_string(),
            vector_width: 4,
        }
    }
}

impl CpuDevice {
    /// Create a device
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a device with a given vector width
    ///
    /// Panics if `vector_width` is zero.
    pub fn with_vector_width(vector_width: usize) -> Self {
        assert!(vector_width > 0, "Vector width must be positive");
        Self {
            vector_width,
            ..Self::default()
        }
    }

    fn check_arguments<T: RealScalar>(
        kernel: &Kernel<T>,
        arguments: &KernelArguments<'_, T>,
        positions: &Range<usize>,
        output: &[T],
    ) -> Result<()> {
        let source = kernel.source();
        let nelements = arguments.number_of_grid_elements;
        if output.len() != positions.len() * kernel.block_size() {
            return Err(Error::KernelExecution(format!(
                "{}: output has length {}, expected {}",
                source.name(),
                output.len(),
                positions.len() * kernel.block_size()
            )));
        }
        if let KernelVariant::Vectorised(width) = source.variant() {
            if positions.len() % width != 0 {
                return Err(Error::KernelExecution(format!(
                    "{}: {} elements is not a multiple of the vector width {width}",
                    source.name(),
                    positions.len()
                )));
            }
        }
        if positions.start > positions.end || positions.end > arguments.elements.len() {
            return Err(Error::KernelExecution(format!(
                "{}: positions {positions:?} out of range for {} active elements",
                source.name(),
                arguments.elements.len()
            )));
        }
        let npoints = source.number_of_quad_points();
        if arguments.quad_weights.len() != npoints || arguments.quad_points.len() != 2 * npoints {
            return Err(Error::KernelExecution(format!(
                "{}: compiled for {npoints} quadrature points, launched with {}",
                source.name(),
                arguments.quad_weights.len()
            )));
        }
        if arguments.grid.len() != GEOMETRY_STRIDE * nelements
            || arguments.test_normal_signs.len() != nelements
            || arguments.trial_normal_signs.len() != nelements
        {
            return Err(Error::KernelExecution(format!(
                "{}: grid buffers do not match a grid with {nelements} elements",
                source.name()
            )));
        }
        if let Some(e) = arguments.elements.as_slice()[positions.clone()]
            .iter()
            .find(|e| **e as usize >= nelements)
        {
            return Err(Error::KernelExecution(format!(
                "{}: element {e} is not in the grid",
                source.name()
            )));
        }
        Ok(())
    }
}

impl Device for CpuDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn vector_width(&self) -> usize {
        self.vector_width
    }

    fn compile_kernel<T: RealScalar>(&self, source: &KernelSource) -> Result<Kernel<T>> {
        if let KernelVariant::Vectorised(width) = source.variant() {
            if width != self.vector_width {
                return Err(Error::KernelExecution(format!(
                    "{}: cannot compile for vector width {width} on a device with vector width {}",
                    source.name(),
                    self.vector_width
                )));
            }
        }
        log::debug!(
            "Compiling kernel {} on device {} with {}",
            source.name(),
            self.name,
            source.defines().join(" ")
        );
        Ok(Kernel::new(source.clone()))
    }

    fn launch<T: RealScalar>(
        &self,
        kernel: &Kernel<T>,
        arguments: &KernelArguments<'_, T>,
        positions: Range<usize>,
        output: &mut [T],
    ) -> Result<()> {
        Self::check_arguments(kernel, arguments, &positions, output)?;
        if positions.is_empty() {
            return Ok(());
        }

        let source = kernel.source();
        let (test, trial) = (source.test(), source.trial());
        let points = reference_points(arguments.quad_points.as_slice())?;
        let npoints = source.number_of_quad_points();
        let mut test_values = rlst_dynamic_array4!(T, test.tabulate_array_shape(npoints));
        test.tabulate(&points, &mut test_values);
        let mut trial_values = rlst_dynamic_array4!(T, trial.tabulate_array_shape(npoints));
        trial.tabulate(&points, &mut trial_values);

        let grid = arguments.grid.as_slice();
        let test_signs = arguments.test_normal_signs.as_slice();
        let trial_signs = arguments.trial_normal_signs.as_slice();
        let block_size = kernel.block_size();
        let width = kernel.vector_length();

        output
            .par_chunks_mut(block_size * width)
            .zip(arguments.elements.as_slice()[positions].par_chunks(width))
            .for_each(|(chunk, elements)| {
                for (block, element) in chunk.chunks_mut(block_size).zip(elements) {
                    let element = *element as usize;
                    let data = ElementKernelData {
                        geometry: ElementGeometry::unpack(grid, element),
                        test_normal_sign: convert::<f64, T>(test_signs[element] as f64),
                        trial_normal_sign: convert::<f64, T>(trial_signs[element] as f64),
                        quad_weights: arguments.quad_weights.as_slice(),
                        test,
                        trial,
                        test_values: &test_values,
                        trial_values: &trial_values,
                    };
                    kernel.evaluate(&data, block);
                }
            });
        Ok(())
    }
}
