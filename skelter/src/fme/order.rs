//! Elimination-order selection.

use rand::Rng as _;
use rand::SeedableRng as _;
use rand::rngs::StdRng;

use super::EliminationOrdering;
use super::inequality::{IneqId, IneqStore};
use crate::num::{DefaultNormalizer, Num, Sign, Tolerance};
use skelter_core::SmallSet;

pub(crate) struct EliminationOrder {
    ordering: EliminationOrdering,
    variables: Vec<usize>,
}

impl EliminationOrder {
    /// The static orders fix `variables` up front; the pair-counting
    /// orders reorder lazily in `select_next`. The random shuffle is
    /// seeded from the list length, so a given task is reproducible.
    pub(crate) fn new(mut variables: Vec<usize>, ordering: EliminationOrdering) -> Self {
        match ordering {
            EliminationOrdering::MinIndex => variables.sort_unstable(),
            EliminationOrdering::MaxIndex => {
                variables.sort_unstable_by(|a, b| b.cmp(a));
            }
            EliminationOrdering::Random => {
                let size = variables.len();
                let mut rng = StdRng::seed_from_u64((size * size) as u64);
                for i in 0..size {
                    let j = rng.random_range(0..size);
                    variables.swap(i, j);
                }
            }
            _ => {}
        }
        Self {
            ordering,
            variables,
        }
    }

    /// The variable to eliminate at `step`. For the pair-counting
    /// orders this computes `P(v) = |plus(v)| · |minus(v)|` over the
    /// remaining variables and picks the minimum (`minpairs`) or
    /// maximum (`maxpairs`), first index on ties.
    pub(crate) fn select_next<N, S>(
        &mut self,
        step: usize,
        active: &[IneqId],
        store: &IneqStore<N, S>,
        tol: &Tolerance<N>,
    ) -> usize
    where
        N: Num + DefaultNormalizer,
        S: SmallSet,
    {
        if !matches!(
            self.ordering,
            EliminationOrdering::MinPairs | EliminationOrdering::MaxPairs
        ) {
            return self.variables[step];
        }

        let remaining = &self.variables[step..];
        let mut best_offset = 0;
        let mut best_pairs = None;
        for (offset, &variable) in remaining.iter().enumerate() {
            let (mut plus, mut minus) = (0usize, 0usize);
            for &id in active {
                match tol.sign(&store.get(id).normal[variable]) {
                    Sign::Positive => plus += 1,
                    Sign::Negative => minus += 1,
                    Sign::Zero => {}
                }
            }
            let pairs = plus * minus;
            let better = match best_pairs {
                None => true,
                Some(best) => match self.ordering {
                    EliminationOrdering::MinPairs => pairs < best,
                    _ => pairs > best,
                },
            };
            if better {
                best_pairs = Some(pairs);
                best_offset = offset;
            }
        }
        self.variables.swap(step, step + best_offset);
        self.variables[step]
    }
}

#[cfg(test)]
mod tests {
    use super::{EliminationOrder, EliminationOrdering};
    use crate::fme::inequality::{IneqId, IneqStore};
    use crate::num::Tolerance;
    use skelter_core::SortedSet;

    fn store_with_rows(rows: &[&[i64]]) -> (IneqStore<i64, SortedSet<u8>>, Vec<IneqId>) {
        let mut store = IneqStore::new(rows[0].len(), rows.len());
        let ids = rows.iter().map(|row| store.create(row)).collect();
        (store, ids)
    }

    #[test]
    fn static_orders_fix_the_sequence() {
        let variables = vec![2, 0, 1];
        let min = EliminationOrder::new(variables.clone(), EliminationOrdering::MinIndex);
        assert_eq!(min.variables, vec![0, 1, 2]);
        let max = EliminationOrder::new(variables.clone(), EliminationOrdering::MaxIndex);
        assert_eq!(max.variables, vec![2, 1, 0]);
        let fixed = EliminationOrder::new(variables.clone(), EliminationOrdering::Fixed);
        assert_eq!(fixed.variables, variables);
    }

    // Pins the pair-counting interpretation: minpairs takes the fewest
    // (+, −) pairs, maxpairs the most.
    #[test]
    fn pair_counting_orders_pick_min_and_max() {
        // Variable 0: 2 plus, 2 minus -> 4 pairs.
        // Variable 1: 1 plus, 1 minus -> 1 pair.
        let (store, active) = store_with_rows(&[
            &[1, 1],
            &[1, -1],
            &[-1, 0],
            &[-1, 0],
        ]);
        let tol = Tolerance::exact();

        let mut min = EliminationOrder::new(vec![0, 1], EliminationOrdering::MinPairs);
        assert_eq!(min.select_next(0, &active, &store, &tol), 1);

        let mut max = EliminationOrder::new(vec![0, 1], EliminationOrdering::MaxPairs);
        assert_eq!(max.select_next(0, &active, &store, &tol), 0);
    }
}
