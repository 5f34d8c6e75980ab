//! Pivot selection, ray classification and outside-set bookkeeping.

use std::cmp::Ordering;

use rand::Rng as _;
use rand::rngs::StdRng;

use super::PivotingOrder;
use super::ray::{RayId, RayStore};
use crate::linalg::dot;
use crate::matrix::Matrix;
use crate::num::{DefaultNormalizer, Num, Tolerance};
use crate::summary::DdSummary;
use skelter_core::SmallSet;

pub(crate) struct Pivoting {
    order: PivotingOrder,
    step: u64,
    /// Cursor over the (reordered) rows for the static orders; the
    /// chosen row for quickhull.
    pivot_inequality: usize,
    num_processed: usize,
    /// The ray each unprocessed inequality is assigned to.
    assignee: Vec<Option<RayId>>,
    pub(crate) not_processed: Vec<usize>,
}

impl Pivoting {
    pub(crate) fn new(order: PivotingOrder, num_inequalities: usize) -> Self {
        Self {
            order,
            step: 0,
            pivot_inequality: 0,
            num_processed: 0,
            assignee: vec![None; num_inequalities],
            not_processed: (0..num_inequalities).collect(),
        }
    }

    pub(crate) fn step(&self) -> u64 {
        self.step
    }

    pub(crate) fn num_processed(&self) -> usize {
        self.num_processed
    }

    pub(crate) fn is_ended(&self, num_inequalities: usize) -> bool {
        self.num_processed >= num_inequalities
    }

    /// Rearranges the rows as the static orders require. Returns the
    /// origin map: `origin[pos]` is the input index of the row now at
    /// `pos`.
    pub(crate) fn reorder_inequalities<N: Num>(
        order: PivotingOrder,
        matrix: &mut Matrix<N>,
        rng: &mut StdRng,
    ) -> Vec<usize> {
        let m = matrix.row_count();
        let mut origin: Vec<usize> = (0..m).collect();
        if matches!(order, PivotingOrder::LexMin | PivotingOrder::LexMax) {
            let mut perm: Vec<usize> = (0..m).collect();
            perm.sort_by(|&a, &b| lex_cmp(matrix.row(a), matrix.row(b)));
            matrix.reorder_rows_by(&perm);
            origin = perm;
        }
        if matches!(order, PivotingOrder::MaxIndex | PivotingOrder::LexMax) {
            for i in 0..m / 2 {
                matrix.swap_rows(i, m - 1 - i);
                origin.swap(i, m - 1 - i);
            }
        }
        if order == PivotingOrder::Random {
            for i in 0..m {
                let j = rng.random_range(0..m);
                matrix.swap_rows(i, j);
                origin.swap(i, j);
            }
        }
        origin
    }

    /// Dot products of `coordinates` against every row.
    pub(crate) fn compute_discrepancies<N: Num>(
        matrix: &Matrix<N>,
        coordinates: &[N],
        out: &mut [N],
    ) {
        for (slot, row) in out.iter_mut().zip(matrix.iter()) {
            *slot = dot(coordinates, row);
        }
    }

    fn discrepancy<N, S>(
        matrix: &Matrix<N>,
        store: &RayStore<N, S>,
        ray: RayId,
        inequality: usize,
    ) -> N
    where
        N: Num + DefaultNormalizer,
        S: SmallSet,
    {
        dot(store.coordinates(ray), matrix.row(inequality))
    }

    /// Advances to the next pivot: chooses the pivot inequality and the
    /// seed ray known to violate it, caching the seed's discrepancy.
    fn select_pivot<N, S>(
        &mut self,
        extreme: &[RayId],
        store: &mut RayStore<N, S>,
        matrix: &Matrix<N>,
        summary: &mut DdSummary,
    ) -> RayId
    where
        N: Num + DefaultNormalizer,
        S: SmallSet,
    {
        self.step += 1;
        summary.selecting_pivot.start();
        let pivot_ray = if self.order == PivotingOrder::Quickhull {
            let seed = extreme
                .iter()
                .copied()
                .find(|&id| !store.ray(id).outside.is_empty())
                .expect("an unprocessed inequality is always assigned to some ray");
            let mut chosen = store.ray(seed).outside[0];
            let mut min_discrepancy = Self::discrepancy(matrix, store, seed, chosen);
            for j in 1..store.ray(seed).outside.len() {
                let inequality = store.ray(seed).outside[j];
                let discrepancy = Self::discrepancy(matrix, store, seed, inequality);
                if discrepancy < min_discrepancy {
                    min_discrepancy = discrepancy;
                    chosen = inequality;
                }
            }
            self.pivot_inequality = chosen;
            store.ray_mut(seed).pivot_discrepancy = min_discrepancy;
            seed
        } else {
            // The static orders advance a cursor, skipping rows that no
            // current ray violates.
            while self.assignee[self.pivot_inequality].is_none() {
                self.pivot_inequality += 1;
            }
            let seed = self.assignee[self.pivot_inequality]
                .expect("cursor stopped at an assigned inequality");
            let discrepancy = Self::discrepancy(matrix, store, seed, self.pivot_inequality);
            store.ray_mut(seed).pivot_discrepancy = discrepancy;
            seed
        };
        summary.selecting_pivot.stop();
        pivot_ray
    }

    /// One full pivot step: classify rays against the chosen pivot row
    /// by BFS over the adjacency graph, build new rays on crossing
    /// edges, repartition outside sets, and swap the minus rays for the
    /// new ones in `extreme`. `zero` receives the cluster (incident
    /// plus newly built rays) for the adjacency pass that follows.
    pub(crate) fn classify_rays<N, S>(
        &mut self,
        extreme: &mut Vec<RayId>,
        zero: &mut Vec<RayId>,
        store: &mut RayStore<N, S>,
        matrix: &Matrix<N>,
        tol: &Tolerance<N>,
        summary: &mut DdSummary,
    ) where
        N: Num + DefaultNormalizer,
        S: SmallSet,
    {
        let pivot_ray = self.select_pivot(extreme, store, matrix, summary);

        summary.classifying_rays.start();
        let mut minus: Vec<RayId> = Vec::with_capacity(extreme.len());
        let mut fresh: Vec<RayId> = Vec::with_capacity(extreme.len());
        store.ray_mut(pivot_ray).visiting_step = self.step;
        minus.push(pivot_ray);
        let (mut minus_idx, mut zero_idx) = (0, 0);
        while minus_idx < minus.len() || zero_idx < zero.len() {
            let ray = if minus_idx < minus.len() {
                minus_idx += 1;
                minus[minus_idx - 1]
            } else {
                zero_idx += 1;
                zero[zero_idx - 1]
            };
            self.search_adjacent(ray, &mut minus, zero, &mut fresh, store, matrix, tol);
        }
        summary.add_rays(fresh.len());
        summary.classifying_rays.stop();

        zero.extend_from_slice(&fresh);
        self.partition_outside_sets(&minus, zero.as_slice(), store, matrix, tol, summary);

        // Swap the minus rays out for the new ones. Any surviving ray
        // carries a non-negative discrepancy from its last visit.
        extreme.retain(|&id| {
            if tol.is_negative(&store.ray(id).pivot_discrepancy) {
                store.release(id);
                false
            } else {
                true
            }
        });
        extreme.extend_from_slice(&fresh);
    }

    /// Visits the neighbors of `ray`, classifying the unseen ones and
    /// rewriting the edge list in place: a minus ray keeps only its
    /// crossing edges (each spawning a new ray), a zero ray keeps only
    /// its edges into the plus side.
    #[allow(clippy::too_many_arguments)]
    fn search_adjacent<N, S>(
        &mut self,
        ray: RayId,
        minus: &mut Vec<RayId>,
        zero: &mut Vec<RayId>,
        fresh: &mut Vec<RayId>,
        store: &mut RayStore<N, S>,
        matrix: &Matrix<N>,
        tol: &Tolerance<N>,
    ) where
        N: Num + DefaultNormalizer,
        S: SmallSet,
    {
        let ray_is_minus = tol.is_negative(&store.ray(ray).pivot_discrepancy);
        let mut adjacent = store.take_adjacent(ray);
        let mut kept = 0;
        for idx in 0..adjacent.len() {
            let adj = adjacent[idx];
            if store.ray(adj).visiting_step != self.step {
                let discrepancy = Self::discrepancy(matrix, store, adj, self.pivot_inequality);
                let adj_ray = store.ray_mut(adj);
                adj_ray.visiting_step = self.step;
                adj_ray.pivot_discrepancy = discrepancy.clone();
                if tol.is_negative(&discrepancy) {
                    minus.push(adj);
                } else if !tol.is_positive(&discrepancy) {
                    adj_ray.cobasis.insert(self.pivot_inequality);
                    zero.push(adj);
                }
            }

            let adj_is_plus = tol.is_positive(&store.ray(adj).pivot_discrepancy);
            if ray_is_minus {
                if adj_is_plus {
                    // Crossing edge: build the new ray, keep the edge.
                    fresh.push(store.combine(adj, ray, self.pivot_inequality));
                    adjacent[kept] = adj;
                    kept += 1;
                }
            } else if adj_is_plus {
                adjacent[kept] = adj;
                kept += 1;
            }
        }
        adjacent.truncate(kept);
        store.put_adjacent(ray, adjacent);
    }

    /// Re-probes every inequality stranded on a removed minus ray
    /// against the zero-and-new cluster; plus rays still satisfy their
    /// assignments.
    fn partition_outside_sets<N, S>(
        &mut self,
        minus: &[RayId],
        cluster: &[RayId],
        store: &mut RayStore<N, S>,
        matrix: &Matrix<N>,
        tol: &Tolerance<N>,
        summary: &mut DdSummary,
    ) where
        N: Num + DefaultNormalizer,
        S: SmallSet,
    {
        summary.partitioning.start();
        for &minus_ray in minus {
            let outside = std::mem::take(&mut store.ray_mut(minus_ray).outside);
            for inequality in outside {
                self.assign_inequality_inner(inequality, cluster, store, matrix, tol, summary);
            }
        }
        summary.partitioning.stop();
    }

    /// Hands `inequality` to the first ray strictly violating it; if
    /// none does, the inequality is processed.
    pub(crate) fn assign_inequality<N, S>(
        &mut self,
        inequality: usize,
        rays: &[RayId],
        store: &mut RayStore<N, S>,
        matrix: &Matrix<N>,
        tol: &Tolerance<N>,
        summary: &mut DdSummary,
    ) where
        N: Num + DefaultNormalizer,
        S: SmallSet,
    {
        self.assign_inequality_inner(inequality, rays, store, matrix, tol, summary);
    }

    fn assign_inequality_inner<N, S>(
        &mut self,
        inequality: usize,
        rays: &[RayId],
        store: &mut RayStore<N, S>,
        matrix: &Matrix<N>,
        tol: &Tolerance<N>,
        summary: &mut DdSummary,
    ) where
        N: Num + DefaultNormalizer,
        S: SmallSet,
    {
        for &id in rays {
            summary.add_dot_product();
            if tol.is_negative(&Self::discrepancy(matrix, store, id, inequality)) {
                store.ray_mut(id).outside.push(inequality);
                self.assignee[inequality] = Some(id);
                return;
            }
        }
        self.assignee[inequality] = None;
        self.num_processed += 1;
        if let Some(pos) = self.not_processed.iter().position(|&v| v == inequality) {
            self.not_processed.remove(pos);
        }
    }
}

fn lex_cmp<N: Num>(a: &[N], b: &[N]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match x.partial_cmp(y) {
            Some(Ordering::Equal) | None => continue,
            Some(order) => return order,
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::Pivoting;
    use crate::dd::PivotingOrder;
    use crate::matrix::Matrix;
    use rand::SeedableRng as _;
    use rand::rngs::StdRng;

    fn rows(matrix: &Matrix<i64>) -> Vec<Vec<i64>> {
        matrix.iter().map(<[i64]>::to_vec).collect()
    }

    #[test]
    fn lexmin_sorts_and_lexmax_reverses() {
        let source = Matrix::from_rows(vec![vec![1i64, 0], vec![0, 1], vec![1, -1]]);
        let mut rng = StdRng::seed_from_u64(0);

        let mut lexmin = source.clone();
        let origin = Pivoting::reorder_inequalities(PivotingOrder::LexMin, &mut lexmin, &mut rng);
        assert_eq!(rows(&lexmin), vec![vec![0, 1], vec![1, -1], vec![1, 0]]);
        assert_eq!(origin, vec![1, 2, 0]);

        let mut lexmax = source.clone();
        let origin = Pivoting::reorder_inequalities(PivotingOrder::LexMax, &mut lexmax, &mut rng);
        assert_eq!(rows(&lexmax), vec![vec![1, 0], vec![1, -1], vec![0, 1]]);
        assert_eq!(origin, vec![0, 2, 1]);
    }

    #[test]
    fn maxindex_reverses_the_input_order() {
        let mut matrix = Matrix::from_rows(vec![vec![1i64], vec![2], vec![3]]);
        let mut rng = StdRng::seed_from_u64(0);
        let origin = Pivoting::reorder_inequalities(PivotingOrder::MaxIndex, &mut matrix, &mut rng);
        assert_eq!(rows(&matrix), vec![vec![3], vec![2], vec![1]]);
        assert_eq!(origin, vec![2, 1, 0]);
    }

    #[test]
    fn random_order_keeps_the_origin_map_consistent() {
        let source = Matrix::from_rows(vec![vec![10i64], vec![20], vec![30], vec![40]]);
        let mut shuffled = source.clone();
        let mut rng = StdRng::seed_from_u64(7);
        let origin = Pivoting::reorder_inequalities(PivotingOrder::Random, &mut shuffled, &mut rng);
        for (pos, &orig) in origin.iter().enumerate() {
            assert_eq!(shuffled.row(pos), source.row(orig));
        }
    }
}
