//! Gaussian elimination over the transpose.
//!
//! `gauss` simplifies `aᵀ` to an echelon form `q` via elementary row
//! transforms and column permutation, so that `F · aᵀ · P = q` with the
//! first `rank` rows of `q` diagonal-dominant. Rows of `aᵀ` that vanish
//! under the transforms peel off into the null-space basis together with
//! their pre-images in `F`.
//!
//! Exact scalars eliminate without division (cross-multiplying by the
//! pivot over the gcd, then reducing both row images by their combined
//! gcd); approximate scalars normalize the pivot row and cancel by
//! subtraction.

use crate::matrix::Matrix;
use crate::num::{Num, Tolerance, gcd_slice};

#[derive(Clone, Debug)]
pub struct GaussOutcome<N> {
    /// Pre-images of the surviving echelon rows: `rank` rows of length
    /// `a.col_count()`. Row `i` pairs positively with `a.row(perm[i])`
    /// and annihilates `a.row(perm[j])` for the other `j < rank`.
    pub preimage: Matrix<N>,
    /// Basis of `{x : a · x = 0}` seen through the same pre-images.
    pub nullspace: Matrix<N>,
    pub rank: usize,
    /// Column permutation: position `i` of the echelon corresponds to
    /// row `perm[i]` of `a`.
    pub perm: Vec<usize>,
}

/// Runs the elimination, considering only columns `i..max_basis` of the
/// transposed system when hunting for the pivot of row `i`. A row with
/// no admissible pivot above the tolerance is a zero row.
pub fn gauss<N: Num>(a: &Matrix<N>, max_basis: usize, tol: &Tolerance<N>) -> GaussOutcome<N> {
    let m = a.row_count();
    let n = a.col_count();
    let mut f = Matrix::identity(n);
    let mut nullspace = Matrix::with_columns(n);
    let mut q = a.transpose();
    let mut perm: Vec<usize> = (0..m).collect();

    let mut i = 0;
    while i < q.row_count().min(q.col_count()) {
        // Largest |entry| in the admissible column range; ties keep the
        // leftmost column. An empty range behaves like an all-zero row.
        let mut j_pivot = i;
        let mut pivot_abs = N::zero();
        for j in i..max_basis.min(q.col_count()) {
            let abs = q.at(i, j).abs();
            if abs > pivot_abs {
                j_pivot = j;
                pivot_abs = abs;
            }
        }
        if !tol.is_positive(&pivot_abs) {
            // Zero row: record its pre-image as a null-space direction.
            q.erase_row(i);
            nullspace.push_row(&f.take_row(i));
            continue;
        }

        if j_pivot != i {
            q.swap_cols(i, j_pivot);
            perm.swap(i, j_pivot);
        }
        if *q.at(i, i) < N::zero() {
            let minus_one = N::one().ref_neg();
            q.scale_row(i, &minus_one);
            f.scale_row(i, &minus_one);
        }

        if N::EXACT {
            eliminate_exact(&mut q, &mut f, i);
        } else {
            eliminate_approx(&mut q, &mut f, i);
        }
        i += 1;
    }

    let rank = q.row_count().min(q.col_count());
    while f.row_count() > rank {
        nullspace.push_row(&f.take_row(rank));
    }

    GaussOutcome {
        preimage: f,
        nullspace,
        rank,
        perm,
    }
}

fn eliminate_exact<N: Num>(q: &mut Matrix<N>, f: &mut Matrix<N>, i: usize) {
    let b = q.at(i, i).clone();
    for ii in 0..q.row_count() {
        if ii == i {
            continue;
        }
        let b_ii = q.at(ii, i).clone();
        let alpha = b.gcd(&b_ii);
        let b_i = b.ref_div(&alpha);
        let b_ii = b_ii.ref_div(&alpha).ref_neg();
        q.scale_row(ii, &b_i);
        q.add_scaled_row(ii, i, &b_ii);
        f.scale_row(ii, &b_i);
        f.add_scaled_row(ii, i, &b_ii);

        // Keep entries bounded: reduce both images by their common gcd.
        let alpha = gcd_slice(q.row(ii)).gcd(&gcd_slice(f.row(ii)));
        if alpha != N::one() {
            q.div_row(ii, &alpha);
            f.div_row(ii, &alpha);
        }
    }
}

fn eliminate_approx<N: Num>(q: &mut Matrix<N>, f: &mut Matrix<N>, i: usize) {
    let b = q.at(i, i).clone();
    q.div_row(i, &b);
    f.div_row(i, &b);
    for ii in 0..q.row_count() {
        if ii == i {
            continue;
        }
        let b_ii = q.at(ii, i).ref_neg();
        q.add_scaled_row(ii, i, &b_ii);
        f.add_scaled_row(ii, i, &b_ii);
    }
}

#[cfg(test)]
mod tests {
    use super::gauss;
    use crate::linalg::dot;
    use crate::matrix::Matrix;
    use crate::num::Tolerance;

    fn check_preimage_pairing(a: &Matrix<i64>, outcome: &super::GaussOutcome<i64>) {
        for i in 0..outcome.rank {
            for j in 0..outcome.rank {
                let product = dot(outcome.preimage.row(i), a.row(outcome.perm[j]));
                if i == j {
                    assert!(product > 0, "diagonal pairing must be positive");
                } else {
                    assert_eq!(product, 0, "off-diagonal pairing must vanish");
                }
            }
        }
        for i in 0..outcome.nullspace.row_count() {
            for j in 0..a.row_count() {
                assert_eq!(dot(outcome.nullspace.row(i), a.row(j)), 0);
            }
        }
    }

    #[test]
    fn full_rank_identity() {
        let a = Matrix::from_rows(vec![vec![1i64, 0], vec![0, 1]]);
        let outcome = gauss(&a, a.row_count(), &Tolerance::exact());
        assert_eq!(outcome.rank, 2);
        assert!(outcome.nullspace.is_empty());
        check_preimage_pairing(&a, &outcome);
    }

    #[test]
    fn rank_deficient_rows_produce_nullspace() {
        let a = Matrix::from_rows(vec![vec![1i64, 0], vec![2, 0]]);
        let outcome = gauss(&a, a.row_count(), &Tolerance::exact());
        assert_eq!(outcome.rank, 1);
        assert_eq!(outcome.nullspace.row_count(), 1);
        check_preimage_pairing(&a, &outcome);
    }

    #[test]
    fn overdetermined_system() {
        let a = Matrix::from_rows(vec![vec![1i64, 0], vec![0, 1], vec![1, 1], vec![2, -1]]);
        let outcome = gauss(&a, a.row_count(), &Tolerance::exact());
        assert_eq!(outcome.rank, 2);
        assert!(outcome.nullspace.is_empty());
        check_preimage_pairing(&a, &outcome);
    }

    #[test]
    fn restricted_pivot_region_sends_trailing_rows_to_nullspace() {
        // Only the first column may host pivots; the second transposed
        // row cannot pivot and must peel off.
        let a = Matrix::from_rows(vec![vec![1i64, 1]]);
        let outcome = gauss(&a, a.row_count(), &Tolerance::exact());
        assert_eq!(outcome.rank, 1);
        assert_eq!(outcome.nullspace.row_count(), 1);
        check_preimage_pairing(&a, &outcome);
    }

    #[test]
    fn floating_point_mode_matches_integer_rank() {
        let a = Matrix::from_rows(vec![
            vec![1.0f64, 2.0, 0.0],
            vec![0.5, 1.0, 0.0],
            vec![0.0, 0.0, 3.0],
        ]);
        let outcome = gauss(&a, a.row_count(), &Tolerance::new(1e-9));
        assert_eq!(outcome.rank, 2);
        assert_eq!(outcome.nullspace.row_count(), 1);
    }
}
