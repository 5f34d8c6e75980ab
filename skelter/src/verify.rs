//! Result checking by solving the dual task.

use crate::SkelterError as Error;
use crate::dd::{DdOptions, dual_description};
use crate::linalg::dot;
use crate::matrix::Matrix;
use crate::num::{DefaultNormalizer, Num, Tolerance};

/// Checks a dual-description result: every output ray must satisfy
/// every input row, and running the engine on the ray matrix must
/// reproduce the facet rows (up to tolerance, in any order).
///
/// The comparison is row-for-row against the input, so it expects the
/// input rows in canonical form. Floating-point runs can legitimately
/// fail the round trip; the checker reports, it does not repair.
pub fn check_dual_description<N>(
    inequalities: &Matrix<N>,
    extreme_rays: &Matrix<N>,
    facets: &[usize],
    options: &DdOptions,
    tol: &Tolerance<N>,
) -> Result<bool, Error>
where
    N: Num + DefaultNormalizer,
{
    for ray in extreme_rays.iter() {
        for row in inequalities.iter() {
            if tol.is_negative(&dot(ray, row)) {
                return Ok(false);
            }
        }
    }

    let dual = dual_description(extreme_rays, options, tol)?;
    if facets.len() != dual.rays.row_count() {
        return Ok(false);
    }
    for &facet in facets {
        let target = inequalities.row(facet);
        let found = dual.rays.iter().any(|row| {
            row.iter()
                .zip(target)
                .all(|(a, b)| tol.is_zero(&a.ref_sub(b)))
        });
        if !found {
            return Ok(false);
        }
    }
    Ok(true)
}
