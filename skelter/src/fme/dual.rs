//! Dual description through elimination.
//!
//! The extreme rays of `{x : A x ≥ 0}` are the facet normals of the
//! dual cone `{x : x = Aᵀ y, y ≥ 0}`. Rather than eliminating all of
//! `y` from the raw system, the basic `y` block found by Gaussian
//! elimination is substituted away first, which shrinks the elimination
//! task to the nonbasic `y` variables:
//!
//! 1. assemble the equations `(Aᵀ | −E)` over `(y, x)`,
//! 2. Gauss over the `y` columns: an invertible block `B` on the basic
//!    `y`s, plus the null space of `Aᵀ` (the lineality directions),
//! 3. substituting `y_B = B⁻¹(…)` into `y_B ≥ 0` and appending unit
//!    rows for the nonbasic `y`s yields an all-inequality system over
//!    the nonbasic `y`s and `x`,
//! 4. eliminate the nonbasic `y`s; the trailing `d` columns of the
//!    result are the extreme rays, with the lineality directions
//!    re-attached as sign-flipped pairs.

use super::{FmeOptions, FmeOutput, eliminate};
use crate::SkelterError as Error;
use crate::gauss::gauss;
use crate::matrix::Matrix;
use crate::num::{DefaultNormalizer, Num, Tolerance};

pub fn dual_description_via_elimination<N>(
    inequalities: &Matrix<N>,
    options: &FmeOptions,
    tol: &Tolerance<N>,
) -> Result<FmeOutput<N>, Error>
where
    N: Num + DefaultNormalizer,
{
    let n = inequalities.row_count();
    let d = inequalities.col_count();

    // (Aᵀ | −E), d equations over (y, x).
    let mut equations = Matrix::new(d, n + d);
    for i in 0..d {
        for j in 0..n {
            equations.set(i, j, inequalities.at(j, i).clone());
        }
        equations.set(i, i + n, N::one().ref_neg());
    }

    // Pivots restricted to the y columns.
    let basis = gauss(&equations.transpose(), n, tol);
    let rank = basis.rank;
    let basic: Vec<usize> = basis.perm[..rank].to_vec();

    // B⁻¹ applied to the equations; orient each row so the basic y it
    // solves for has a negative coefficient, making the remaining
    // expression the `y_B ≥ 0` constraint.
    let mut extended = Matrix::product(&basis.preimage, &equations);
    for i in 0..rank {
        if tol.is_positive(extended.at(i, basic[i])) {
            let minus_one = N::one().ref_neg();
            extended.scale_row(i, &minus_one);
        }
    }
    for i in 0..n {
        if !basic.contains(&i) {
            let mut row = vec![N::zero(); n + d];
            row[i] = N::one();
            extended.push_row(&row);
        }
    }

    // Dropping the basic-y columns leaves the system over the nonbasic
    // y's followed by x.
    let kept: Vec<usize> = (0..n + d).filter(|col| !basic.contains(col)).collect();
    let reduced = extended.select_columns(&kept);

    let variables: Vec<usize> = (0..reduced.col_count() - d).collect();
    let outcome = eliminate(&reduced, &variables, options, tol)?;

    // Trailing d columns are the ray coordinates; lineality directions
    // come back as sign-flipped pairs ahead of them.
    let shift = outcome.inequalities.col_count() - d;
    let trailing: Vec<usize> = (shift..shift + d).collect();
    let tail = outcome.inequalities.select_columns(&trailing);

    let mut result = Matrix::with_columns(d);
    for i in 0..basis.nullspace.row_count() {
        result.push_row(basis.nullspace.row(i));
        let negated: Vec<N> = basis.nullspace.row(i).iter().map(Num::ref_neg).collect();
        result.push_row(&negated);
    }
    for i in 0..tail.row_count() {
        result.push_row(tail.row(i));
    }

    Ok(FmeOutput {
        inequalities: result,
        elapsed: outcome.elapsed,
    })
}
