//! The elimination loop.

use std::time::{Duration, Instant};

use super::inequality::{IneqId, IneqStore};
use super::order::EliminationOrder;
use super::{ChernikovTest, FmeOptions};
use crate::SkelterError as Error;
use crate::matrix::Matrix;
use crate::num::{DefaultNormalizer, Num, Sign, Tolerance};
use skelter_core::SmallSet;

#[derive(Clone, Debug)]
pub struct FmeOutput<N> {
    /// The surviving inequalities, normalized, one per row. Columns of
    /// eliminated variables are zero.
    pub inequalities: Matrix<N>,
    pub elapsed: Duration,
}

pub(super) fn run<N, S>(
    matrix: &Matrix<N>,
    variables: &[usize],
    options: &FmeOptions,
    tol: &Tolerance<N>,
) -> Result<FmeOutput<N>, Error>
where
    N: Num + DefaultNormalizer,
    S: SmallSet,
{
    let started = Instant::now();
    let n = matrix.row_count();
    let dim = matrix.col_count();

    let mut seen = vec![false; dim];
    for &variable in variables {
        if variable >= dim {
            return Err(Error::VariableOutOfRange {
                variable,
                dimension: dim,
            });
        }
        if seen[variable] {
            return Err(Error::InvalidArgument {
                context: "elimination variables must be unique",
            });
        }
        seen[variable] = true;
    }

    let mut store: IneqStore<N, S> = IneqStore::new(dim, n);
    let mut active: Vec<IneqId> = Vec::with_capacity(n);
    for i in 0..n {
        let id = store.create(matrix.row(i));
        for j in 0..n {
            if j != i {
                store.get_mut(id).complement.insert(j);
            }
        }
        active.push(id);
    }
    tracing::info!(inequalities = active.len(), "initial step");
    log_system(&store, &active);

    let mut order = EliminationOrder::new(variables.to_vec(), options.ordering);
    for step in 0..variables.len() {
        let eliminated = order.select_next(step, &active, &store, tol);

        // Partition by the sign of the eliminated coefficient; the
        // zero rows stay in place.
        let mut plus: Vec<IneqId> = Vec::new();
        let mut minus: Vec<IneqId> = Vec::new();
        let mut zeros: Vec<IneqId> = Vec::with_capacity(active.len());
        for id in active.drain(..) {
            match tol.sign(&store.get(id).normal[eliminated]) {
                Sign::Positive => plus.push(id),
                Sign::Negative => minus.push(id),
                Sign::Zero => zeros.push(id),
            }
        }
        active = zeros;
        let num_zero = active.len();

        // 1st Chernikov rule: |index(p) ∪ index(m)| ≤ step + 2, i.e.
        // the complements intersect in at least n − (step + 2) rows.
        let required = n.saturating_sub(step + 2);
        for &p in &plus {
            let batch_start = active.len();
            for &m in &minus {
                if S::intersection_cardinality(&store.get(p).complement, &store.get(m).complement)
                    >= required
                {
                    active.push(store.combine(p, m, eliminated));
                }
            }
            if options.chernikov_test == ChernikovTest::Graph {
                prune_redundant(&mut active, batch_start, num_zero, &mut store);
            }
        }
        if options.chernikov_test != ChernikovTest::Graph {
            prune_redundant(&mut active, num_zero, num_zero, &mut store);
        }

        for id in plus.into_iter().chain(minus) {
            store.release(id);
        }

        tracing::info!(
            step = step + 1,
            total = variables.len(),
            variable = eliminated,
            inequalities = active.len(),
            "elimination step completed"
        );
        log_system(&store, &active);
    }

    let mut inequalities = Matrix::with_columns(dim);
    for &id in &active {
        inequalities.push_row(&store.get(id).normal);
    }
    for id in active {
        store.release(id);
    }
    debug_assert_eq!(
        store.outstanding(),
        0,
        "every inequality must return to its pool"
    );

    Ok(FmeOutput {
        inequalities,
        elapsed: started.elapsed(),
    })
}

/// 2nd Chernikov rule: a row from `start..` is redundant iff its
/// complement is a subset of another current row's complement, checked
/// against the zero rows first and then against the `start..` block.
fn prune_redundant<N, S>(
    active: &mut Vec<IneqId>,
    start: usize,
    num_zero: usize,
    store: &mut IneqStore<N, S>,
) where
    N: Num + DefaultNormalizer,
    S: SmallSet,
{
    let mut i = start;
    while i < active.len() {
        let mut redundant = false;
        for j in 0..num_zero {
            if store
                .get(active[i])
                .complement
                .subset_of(&store.get(active[j]).complement)
            {
                redundant = true;
                break;
            }
        }
        if !redundant {
            for j in start..active.len() {
                if j != i
                    && store
                        .get(active[i])
                        .complement
                        .subset_of(&store.get(active[j]).complement)
                {
                    redundant = true;
                    break;
                }
            }
        }
        if redundant {
            store.release(active.remove(i));
        } else {
            i += 1;
        }
    }
}

fn log_system<N, S>(store: &IneqStore<N, S>, active: &[IneqId])
where
    N: Num + DefaultNormalizer,
    S: SmallSet,
{
    if !tracing::enabled!(tracing::Level::TRACE) {
        return;
    }
    for &id in active {
        let normal: Vec<String> = store
            .get(id)
            .normal
            .iter()
            .map(ToString::to_string)
            .collect();
        tracing::trace!(inequality = normal.join(" "));
    }
}
