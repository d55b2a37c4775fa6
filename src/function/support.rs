//! Selection of the elements that a function space is supported on
use crate::traits::GridTopology;
use crate::types::{Error, Result};

/// Compute the support mask and the normal multiplier of every element of a grid
///
/// The support is either the explicit list `support_elements` or every element whose domain
/// index is in `segments`. At most one of the two may be given; if neither is given the
/// support is the whole grid. The normal multiplier is `-1` on elements whose domain index is
/// in `swapped_normals` and `1` elsewhere.
pub fn process_segments<G: GridTopology>(
    grid: &G,
    support_elements: Option<&[usize]>,
    segments: Option<&[usize]>,
    swapped_normals: Option<&[usize]>,
) -> Result<(Vec<bool>, Vec<i32>)> {
    let nelements = grid.number_of_elements();

    let normal_multipliers = (0..nelements)
        .map(|element| match swapped_normals {
            Some(swapped) if swapped.contains(&grid.domain_index(element)) => -1,
            _ => 1,
        })
        .collect::<Vec<_>>();

    let support = match (support_elements, segments) {
        (Some(_), Some(_)) => {
            return Err(Error::InvalidSupport(
                "only one of support_elements and segments may be given".to_string(),
            ));
        }
        (Some(elements), None) => {
            let mut support = vec![false; nelements];
            for element in elements {
                *support.get_mut(*element).ok_or_else(|| {
                    Error::InvalidSupport(format!(
                        "element {element} is not in a grid with {nelements} elements"
                    ))
                })? = true;
            }
            support
        }
        (None, Some(segments)) => (0..nelements)
            .map(|element| segments.contains(&grid.domain_index(element)))
            .collect(),
        (None, None) => vec![true; nelements],
    };

    Ok((support, normal_multipliers))
}
