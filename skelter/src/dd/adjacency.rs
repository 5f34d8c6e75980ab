//! Certification of candidate edges in the just-created ray cluster.

use super::AdjacencyTest;
use super::ray::{RayId, RayStore};
use crate::num::{DefaultNormalizer, Num, Tolerance};
use crate::summary::DdSummary;
use skelter_core::SmallSet;

pub(crate) struct AdjacencyChecker {
    test: AdjacencyTest,
    use_plus_plus: bool,
    rank: usize,
}

struct Candidate<S> {
    ray: RayId,
    edge_cobasis: S,
}

impl AdjacencyChecker {
    pub(crate) fn new(test: AdjacencyTest, use_plus_plus: bool, rank: usize) -> Self {
        Self {
            test,
            use_plus_plus,
            rank,
        }
    }

    /// Finds and certifies the edges inside `rays`, committing each
    /// surviving edge onto both endpoints' adjacency lists.
    pub(crate) fn compute_adjacency<N, S>(
        &self,
        rays: &[RayId],
        not_processed: &[usize],
        store: &mut RayStore<N, S>,
        tol: &Tolerance<N>,
        summary: &mut DdSummary,
    ) where
        N: Num + DefaultNormalizer,
        S: SmallSet,
    {
        for i in 0..rays.len() {
            let mut candidates = self.find_candidates(i, rays, not_processed, store, tol, summary);
            self.certify(rays[i], rays, &mut candidates, store, summary);
            for candidate in &candidates {
                store.ray_mut(rays[i]).adjacent.push(candidate.ray);
                store.ray_mut(candidate.ray).adjacent.push(rays[i]);
            }
            summary.add_edges(candidates.len());
        }
    }

    /// Candidate edges out of `rays[ray_idx]` into the later part of
    /// the cluster: common cobasis of at least `rank − 2`, minus the
    /// edges the plus/plus criterion rules out.
    fn find_candidates<N, S>(
        &self,
        ray_idx: usize,
        rays: &[RayId],
        not_processed: &[usize],
        store: &RayStore<N, S>,
        tol: &Tolerance<N>,
        summary: &mut DdSummary,
    ) -> Vec<Candidate<S>>
    where
        N: Num + DefaultNormalizer,
        S: SmallSet,
    {
        let ray = rays[ray_idx];
        let mut candidates = Vec::new();

        // A simple ray has exactly rank + 1 neighbors; once they are
        // all present there is nothing left to find.
        if !self.use_plus_plus
            && store.ray(ray).cobasis.cardinality() + 1 == self.rank
            && store.ray(ray).adjacent.len() == self.rank + 1
        {
            return candidates;
        }

        // An edge is eliminable only when both endpoints sit strictly
        // inside every not-yet-processed halfspace.
        let plus_plus_applicable = self.use_plus_plus
            && not_processed
                .iter()
                .all(|&row| tol.is_positive(&store.discrepancies(ray)[row]));

        summary.potential_adjacency_testing.start();
        for &other in &rays[ray_idx + 1..] {
            let common =
                S::intersection_cardinality(&store.ray(ray).cobasis, &store.ray(other).cobasis);
            if common + 2 < self.rank {
                continue;
            }
            let eliminate = plus_plus_applicable
                && not_processed
                    .iter()
                    .all(|&row| tol.is_positive(&store.discrepancies(other)[row]));
            if !eliminate {
                candidates.push(Candidate {
                    ray: other,
                    edge_cobasis: S::intersection(
                        &store.ray(ray).cobasis,
                        &store.ray(other).cobasis,
                    ),
                });
            }
        }
        summary.add_potential_adjacency_tests(rays.len() - ray_idx - 1);
        summary.potential_adjacency_testing.stop();
        candidates
    }

    /// Drops the candidates whose edge cobasis is dominated by a third
    /// ray. Simple rays and low ranks need no certificate.
    fn certify<N, S>(
        &self,
        ray: RayId,
        cluster: &[RayId],
        candidates: &mut Vec<Candidate<S>>,
        store: &RayStore<N, S>,
        summary: &mut DdSummary,
    ) where
        N: Num + DefaultNormalizer,
        S: SmallSet,
    {
        if store.ray(ray).cobasis.cardinality() + 1 == self.rank || self.rank <= 3 {
            return;
        }
        summary.adjacency_testing.start();
        summary.add_adjacency_tests(candidates.len());
        match self.test {
            AdjacencyTest::Graph => {
                // Any dominator shares the edge cobasis, so it suffices
                // to scan the candidates and the current neighbors.
                let mut vertices: Vec<RayId> = candidates.iter().map(|c| c.ray).collect();
                vertices.extend_from_slice(&store.ray(ray).adjacent);
                Self::remove_dominated(ray, &vertices, candidates, store);
            }
            AdjacencyTest::Combinatoric => {
                Self::remove_dominated(ray, cluster, candidates, store);
            }
        }
        summary.adjacency_testing.stop();
    }

    fn remove_dominated<N, S>(
        ray: RayId,
        dominators: &[RayId],
        candidates: &mut Vec<Candidate<S>>,
        store: &RayStore<N, S>,
    ) where
        N: Num + DefaultNormalizer,
        S: SmallSet,
    {
        candidates.retain(|candidate| {
            !dominators.iter().any(|&third| {
                third != ray
                    && third != candidate.ray
                    && candidate.edge_cobasis.subset_of(&store.ray(third).cobasis)
            })
        });
    }
}
