//! Element kernels
//!
//! Each kernel fills the `ntest x ntrial` block of a single element. Local multipliers are not
//! applied here: the block holds integrals of the unsigned basis functions.
use crate::device::ElementKernelData;
use crate::traits::Shapeset;
use crate::types::{RealScalar, RlstArray};
use rlst::{rlst_array_from_slice_mut2, rlst_dynamic_array3, rlst_static_array, Shape};

fn physical_values<T: RealScalar>(
    data: &ElementKernelData<'_, T>,
    shapeset: &impl Shapeset,
    reference: &RlstArray<T, 4>,
) -> RlstArray<T, 3> {
    let npoints = reference.shape()[1];
    let mut values = rlst_dynamic_array3!(T, [npoints, shapeset.number_of_shape_functions(), 3]);
    shapeset.push_forward(&data.geometry, reference, &mut values);
    values
}

/// Integrate the product of each pair of test and trial functions over the element
fn integrate<T: RealScalar>(
    data: &ElementKernelData<'_, T>,
    test_values: &RlstArray<T, 3>,
    trial_values: &RlstArray<T, 3>,
    result: &mut [T],
) {
    let ntest = test_values.shape()[1];
    let ntrial = trial_values.shape()[1];
    debug_assert_eq!(result.len(), ntest * ntrial);

    // The block is stored row by row, ie as its column-major transpose
    let mut block = rlst_array_from_slice_mut2!(result, [ntrial, ntest]);
    for i in 0..ntest {
        for j in 0..ntrial {
            block[[j, i]] = data
                .quad_weights
                .iter()
                .enumerate()
                .map(|(p, w)| {
                    *w * (0..3)
                        .map(|c| test_values[[p, i, c]] * trial_values[[p, j, c]])
                        .sum::<T>()
                })
                .sum::<T>()
                * data.geometry.integration_element;
        }
    }
}

/// The L2 inner product of the test and trial functions
pub(crate) fn l2_identity<T: RealScalar>(data: &ElementKernelData<'_, T>, result: &mut [T]) {
    let test_values = physical_values(data, &data.test, data.test_values);
    let trial_values = physical_values(data, &data.trial, data.trial_values);
    integrate(data, &test_values, &trial_values, result);
}

/// The L2 inner product of the test functions and the normal crossed with the trial functions
///
/// The normal is oriented by the normal sign of the trial space.
pub(crate) fn twisted_identity<T: RealScalar>(data: &ElementKernelData<'_, T>, result: &mut [T]) {
    let test_values = physical_values(data, &data.test, data.test_values);
    let trial_values = physical_values(data, &data.trial, data.trial_values);

    let mut normal = rlst_static_array!(T, 3);
    normal.fill_from(data.geometry.normal.view());
    normal.scale_inplace(data.trial_normal_sign);

    let [npoints, ntrial, _] = trial_values.shape();
    let mut twisted = rlst_dynamic_array3!(T, [npoints, ntrial, 3]);
    let mut trial = rlst_static_array!(T, 3);
    let mut rotated = rlst_static_array!(T, 3);
    for p in 0..npoints {
        for j in 0..ntrial {
            for c in 0..3 {
                trial[[c]] = trial_values[[p, j, c]];
            }
            normal.cross(trial.view(), rotated.view_mut());
            for c in 0..3 {
                twisted[[p, j, c]] = rotated[[c]];
            }
        }
    }
    integrate(data, &test_values, &twisted, result);
}
