//! Kernel sources and compiled kernels
use crate::assembly::kernels;
use crate::device::DeviceBuffer;
use crate::element::ShapesetType;
use crate::grid::ElementGeometry;
use crate::traits::Shapeset;
use crate::types::{Error, RealScalar, Result, RlstArray};
use std::collections::HashMap;
use std::str::FromStr;

/// The value of a compile-time kernel option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelOption {
    /// An integer, eg a number of shape functions
    Integer(usize),
    /// A string, eg a shapeset identifier
    Text(String),
}

impl KernelOption {
    /// The value as an integer
    pub fn as_integer(&self) -> Option<usize> {
        match self {
            KernelOption::Integer(value) => Some(*value),
            KernelOption::Text(_) => None,
        }
    }

    /// The value as a string
    pub fn as_text(&self) -> Option<&str> {
        match self {
            KernelOption::Text(value) => Some(value),
            KernelOption::Integer(_) => None,
        }
    }
}

impl From<usize> for KernelOption {
    fn from(value: usize) -> Self {
        KernelOption::Integer(value)
    }
}

impl From<&str> for KernelOption {
    fn from(value: &str) -> Self {
        KernelOption::Text(value.to_string())
    }
}

impl From<String> for KernelOption {
    fn from(value: String) -> Self {
        KernelOption::Text(value)
    }
}

/// Compile-time kernel options, by name
pub type KernelOptions = HashMap<String, KernelOption>;

/// The variant of a kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelVariant {
    /// Processes elements in groups of the given width
    Vectorised(usize),
    /// Processes one element at a time
    Scalar,
}

impl KernelVariant {
    /// The number of elements processed together
    pub fn vector_length(&self) -> usize {
        match self {
            KernelVariant::Vectorised(width) => *width,
            KernelVariant::Scalar => 1,
        }
    }

    fn suffix(&self) -> String {
        match self {
            KernelVariant::Vectorised(width) => format!("_vec{width}"),
            KernelVariant::Scalar => "_novec".to_string(),
        }
    }
}

/// The integrals that element kernels exist for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementOperator {
    /// The integral of the product of a test and a trial function
    L2Identity,
    /// The integral of the product of a test function and the normal crossed with a trial function
    TwistedIdentity,
}

impl ElementOperator {
    /// The kernel identifier
    pub fn identifier(&self) -> &'static str {
        match self {
            ElementOperator::L2Identity => "l2_identity",
            ElementOperator::TwistedIdentity => "twisted_identity",
        }
    }

    fn element_kernel<T: RealScalar>(&self) -> ElementKernel<T> {
        match self {
            ElementOperator::L2Identity => kernels::l2_identity::<T>,
            ElementOperator::TwistedIdentity => kernels::twisted_identity::<T>,
        }
    }
}

impl FromStr for ElementOperator {
    type Err = Error;

    fn from_str(identifier: &str) -> Result<Self> {
        match identifier {
            "l2_identity" => Ok(ElementOperator::L2Identity),
            "twisted_identity" => Ok(ElementOperator::TwistedIdentity),
            _ => Err(Error::UnknownKernel(identifier.to_string())),
        }
    }
}

/// The source of a kernel, resolved from an identifier and a set of options
#[derive(Debug, Clone)]
pub struct KernelSource {
    name: String,
    operator: ElementOperator,
    variant: KernelVariant,
    test: ShapesetType,
    trial: ShapesetType,
    number_of_quad_points: usize,
    options: KernelOptions,
}

impl KernelSource {
    /// The name of the kernel, including the variant
    pub fn name(&self) -> &str {
        &self.name
    }
    /// The operator that the kernel computes
    pub fn operator(&self) -> ElementOperator {
        self.operator
    }
    /// The kernel variant
    pub fn variant(&self) -> KernelVariant {
        self.variant
    }
    /// The test shapeset
    pub fn test(&self) -> ShapesetType {
        self.test
    }
    /// The trial shapeset
    pub fn trial(&self) -> ShapesetType {
        self.trial
    }
    /// The number of quadrature points
    pub fn number_of_quad_points(&self) -> usize {
        self.number_of_quad_points
    }
    /// The options that the kernel was created with
    pub fn options(&self) -> &KernelOptions {
        &self.options
    }
    /// The options as compiler defines, sorted by name
    pub fn defines(&self) -> Vec<String> {
        let mut defines = self
            .options
            .iter()
            .map(|(name, value)| match value {
                KernelOption::Integer(value) => format!("-D{name}={value}"),
                KernelOption::Text(value) => format!("-D{name}={value}"),
            })
            .collect::<Vec<_>>();
        defines.sort();
        defines
    }
}

fn integer_option(options: &KernelOptions, name: &str) -> Result<usize> {
    options
        .get(name)
        .and_then(KernelOption::as_integer)
        .ok_or_else(|| Error::MissingKernelOption(name.to_string()))
}

fn text_option<'a>(options: &'a KernelOptions, name: &str) -> Result<&'a str> {
    options
        .get(name)
        .and_then(KernelOption::as_text)
        .ok_or_else(|| Error::MissingKernelOption(name.to_string()))
}

/// Get the source of a kernel from its identifier and compile-time options
///
/// The options must contain `NUMBER_OF_QUAD_POINTS`, the `TEST` and `TRIAL` shapeset
/// identifiers, and `NUMBER_OF_TEST_SHAPE_FUNCTIONS` and `NUMBER_OF_TRIAL_SHAPE_FUNCTIONS`
/// matching those shapesets.
pub fn kernel_source_from_identifier(
    identifier: &str,
    options: &KernelOptions,
    variant: KernelVariant,
) -> Result<KernelSource> {
    let operator = identifier.parse::<ElementOperator>()?;
    let test = text_option(options, "TEST")?.parse::<ShapesetType>()?;
    let trial = text_option(options, "TRIAL")?.parse::<ShapesetType>()?;

    let number_of_quad_points = integer_option(options, "NUMBER_OF_QUAD_POINTS")?;
    if number_of_quad_points == 0 {
        return Err(Error::MissingKernelOption(
            "NUMBER_OF_QUAD_POINTS must be positive".to_string(),
        ));
    }
    for (name, shapeset) in [
        ("NUMBER_OF_TEST_SHAPE_FUNCTIONS", test),
        ("NUMBER_OF_TRIAL_SHAPE_FUNCTIONS", trial),
    ] {
        let n = integer_option(options, name)?;
        if n != shapeset.number_of_shape_functions() {
            return Err(Error::MissingKernelOption(format!(
                "{name} is {n}, but shapeset {} has {} functions",
                shapeset.identifier(),
                shapeset.number_of_shape_functions()
            )));
        }
    }
    if variant.vector_length() == 0 {
        return Err(Error::MissingKernelOption(
            "vector width must be positive".to_string(),
        ));
    }

    Ok(KernelSource {
        name: format!("{identifier}{}", variant.suffix()),
        operator,
        variant,
        test,
        trial,
        number_of_quad_points,
        options: options.clone(),
    })
}

/// Function that computes the block of values for a single element
pub type ElementKernel<T> = fn(&ElementKernelData<'_, T>, &mut [T]);

/// The data an element kernel reads
pub struct ElementKernelData<'a, T: RealScalar> {
    /// The geometry of the element
    pub geometry: ElementGeometry<T>,
    /// The normal orientation of the test space on the element
    pub test_normal_sign: T,
    /// The normal orientation of the trial space on the element
    pub trial_normal_sign: T,
    /// Quadrature weights
    pub quad_weights: &'a [T],
    /// The test shapeset
    pub test: ShapesetType,
    /// The trial shapeset
    pub trial: ShapesetType,
    /// Test shapeset values on the reference triangle at the quadrature points
    pub test_values: &'a RlstArray<T, 4>,
    /// Trial shapeset values on the reference triangle at the quadrature points
    pub trial_values: &'a RlstArray<T, 4>,
}

/// The buffers a kernel is launched with
pub struct KernelArguments<'a, T: RealScalar> {
    /// Packed element geometry of the whole grid
    pub grid: &'a DeviceBuffer<T>,
    /// Grid indices of the active elements
    pub elements: &'a DeviceBuffer<u32>,
    /// Normal orientation of the test space on every grid element
    pub test_normal_signs: &'a DeviceBuffer<i32>,
    /// Normal orientation of the trial space on every grid element
    pub trial_normal_signs: &'a DeviceBuffer<i32>,
    /// Quadrature points
    pub quad_points: &'a DeviceBuffer<T>,
    /// Quadrature weights
    pub quad_weights: &'a DeviceBuffer<T>,
    /// The number of elements in the grid
    pub number_of_grid_elements: usize,
}

/// A kernel compiled for a device
pub struct Kernel<T: RealScalar> {
    source: KernelSource,
    function: ElementKernel<T>,
}

impl<T: RealScalar> Kernel<T> {
    /// Create a kernel from its source
    pub fn new(source: KernelSource) -> Self {
        let function = source.operator.element_kernel::<T>();
        Self { source, function }
    }

    /// The source of the kernel
    pub fn source(&self) -> &KernelSource {
        &self.source
    }

    /// The number of values written for each element
    pub fn block_size(&self) -> usize {
        self.source.test.number_of_shape_functions() * self.source.trial.number_of_shape_functions()
    }

    /// The number of elements processed together
    pub fn vector_length(&self) -> usize {
        self.source.variant.vector_length()
    }

    /// Compute the block for a single element
    ///
    /// The value for test function `i` and trial function `j` is written at index
    /// `i * number_of_trial_shape_functions + j`.
    pub fn evaluate(&self, data: &ElementKernelData<'_, T>, result: &mut [T]) {
        (self.function)(data, result)
    }
}
