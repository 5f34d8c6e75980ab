//! Algorithm driver: initial simplex, main loop, finalization.

use rand::SeedableRng as _;
use rand::rngs::StdRng;

use super::adjacency::AdjacencyChecker;
use super::pivoting::Pivoting;
use super::ray::{RayId, RayStore};
use super::DdOptions;
use crate::SkelterError as Error;
use crate::gauss::gauss;
use crate::matrix::Matrix;
use crate::num::{DefaultNormalizer, Num, Tolerance};
use crate::summary::DdSummary;
use skelter_core::SmallSet;

#[derive(Clone, Debug)]
pub struct DdOutput<N> {
    /// Null-space directions as sign-flipped pairs, then the extreme
    /// rays, one per row.
    pub rays: Matrix<N>,
    /// Input rows that are facets of the cone, in first-seen order.
    pub facets: Vec<usize>,
    pub summary: DdSummary,
}

pub(super) fn run<N, S>(
    inequalities: &Matrix<N>,
    options: &DdOptions,
    tol: &Tolerance<N>,
) -> Result<DdOutput<N>, Error>
where
    N: Num + DefaultNormalizer,
    S: SmallSet,
{
    let mut summary = DdSummary::default();
    summary.total.start();

    let mut matrix = inequalities.clone();
    let mut rng = match options.random_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let row_origin = Pivoting::reorder_inequalities(options.pivoting_order, &mut matrix, &mut rng);

    let m = matrix.row_count();
    let dim = matrix.col_count();

    summary.computing_basis.start();
    let basis = gauss(&matrix, m, tol);
    summary.computing_basis.stop();
    let rank = basis.rank;

    let num_discrepancies = if options.use_plus_plus { m } else { 0 };
    let mut store: RayStore<N, S> = RayStore::new(dim, num_discrepancies, m);
    let mut pivoting = Pivoting::new(options.pivoting_order, m);
    let checker = AdjacencyChecker::new(options.adjacency_test, options.use_plus_plus, rank);

    // Initial simplex: the first `rank` pre-image rows, ray `i`
    // incident to all basis rows but its own.
    let mut extreme: Vec<RayId> = Vec::with_capacity(rank);
    let mut discrepancies = vec![N::zero(); num_discrepancies];
    for ray_idx in 0..rank {
        let coordinates = basis.preimage.row(ray_idx);
        if options.use_plus_plus {
            Pivoting::compute_discrepancies(&matrix, coordinates, &mut discrepancies);
        }
        let id = store.create(coordinates, &discrepancies);
        for j in 0..rank {
            if j != ray_idx {
                store.ray_mut(id).cobasis.insert(basis.perm[j]);
            }
        }
        extreme.push(id);
    }
    summary.add_rays(extreme.len());

    // The simplex is complete, so every candidate pair is adjacent; the
    // common routine certifies that for free.
    checker.compute_adjacency(&extreme, &pivoting.not_processed, &mut store, tol, &mut summary);

    summary.partitioning.start();
    for inequality in 0..m {
        pivoting.assign_inequality(inequality, &extreme, &mut store, &matrix, tol, &mut summary);
    }
    summary.partitioning.stop();
    log_iteration(&pivoting, &extreme, m, &store);

    while !pivoting.is_ended(m) {
        let mut zero = Vec::new();
        pivoting.classify_rays(&mut extreme, &mut zero, &mut store, &matrix, tol, &mut summary);
        checker.compute_adjacency(&zero, &pivoting.not_processed, &mut store, tol, &mut summary);
        log_iteration(&pivoting, &extreme, m, &store);
    }

    summary.total.stop();
    Ok(finalize(
        dim,
        &basis.nullspace,
        extreme,
        &mut store,
        &pivoting,
        &row_origin,
        rank,
        summary,
    ))
}

#[allow(clippy::too_many_arguments)]
fn finalize<N, S>(
    dim: usize,
    nullspace: &Matrix<N>,
    extreme: Vec<RayId>,
    store: &mut RayStore<N, S>,
    pivoting: &Pivoting,
    row_origin: &[usize],
    rank: usize,
    mut summary: DdSummary,
) -> DdOutput<N>
where
    N: Num + DefaultNormalizer,
    S: SmallSet,
{
    let mut rays = Matrix::with_columns(dim);
    // Lineality directions enter as sign-flipped pairs.
    for i in 0..nullspace.row_count() {
        rays.push_row(nullspace.row(i));
        let negated: Vec<N> = nullspace.row(i).iter().map(Num::ref_neg).collect();
        rays.push_row(&negated);
    }
    for &id in &extreme {
        rays.push_row(store.coordinates(id));
    }
    summary.set_num_extreme_rays(rays.row_count());

    // Facets, mapped back to the input row numbering.
    let mut facets: Vec<usize> = Vec::new();
    for &id in &extreme {
        for position in store.ray(id).cobasis.indices() {
            let original = row_origin[position];
            if !facets.contains(&original) {
                facets.push(original);
            }
        }
    }
    summary.set_num_facets(facets.len());

    // Degree sum counts each edge twice. Rank 2 is the exception: both
    // rays meet in the same pair of facets.
    let num_edges = if rank > 2 {
        extreme
            .iter()
            .map(|&id| store.ray(id).adjacent.len())
            .sum::<usize>()
            / 2
    } else {
        2
    };
    summary.set_num_edges(num_edges);
    summary.set_num_iterations(pivoting.step());

    for id in extreme {
        store.release(id);
    }
    debug_assert_eq!(store.outstanding(), 0, "every ray must return to its pool");

    DdOutput {
        rays,
        facets,
        summary,
    }
}

fn log_iteration<N, S>(
    pivoting: &Pivoting,
    extreme: &[RayId],
    num_inequalities: usize,
    store: &RayStore<N, S>,
) where
    N: Num + DefaultNormalizer,
    S: SmallSet,
{
    tracing::info!(
        iteration = pivoting.step(),
        rays = extreme.len(),
        processed = pivoting.num_processed(),
        total = num_inequalities,
        "iteration completed"
    );
    if tracing::enabled!(tracing::Level::TRACE) {
        for &id in extreme {
            let coordinates: Vec<String> = store
                .coordinates(id)
                .iter()
                .map(ToString::to_string)
                .collect();
            tracing::trace!(ray = coordinates.join(" "));
        }
    }
}
