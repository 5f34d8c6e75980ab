//! Rays and their factory.
//!
//! A ray owns one contiguous coefficient block: the `dim` coordinates,
//! followed by one cached discrepancy per input row when the plus/plus
//! optimization is on. Normalization always covers the whole block, so
//! cached discrepancies stay consistent with the coordinates.
//!
//! Cross-links between rays are stable slab indices, never references;
//! the store recycles both the control blocks and the coefficient
//! blocks.

use skelter_core::{BlockPool, Slab, SmallSet};

use crate::linalg::lin_comb2_into;
use crate::num::{DefaultNormalizer, Normalizer as _, Num};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RayId(u32);

impl RayId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
pub(crate) struct Ray<N, S> {
    /// Coordinates, then cached discrepancies.
    pub(crate) block: Vec<N>,
    /// Input rows incident to this ray.
    pub(crate) cobasis: S,
    /// Current neighbors in the 1-skeleton.
    pub(crate) adjacent: Vec<RayId>,
    /// Not-yet-processed inequalities this ray violates.
    pub(crate) outside: Vec<usize>,
    /// Cached dot product against the current pivot row.
    pub(crate) pivot_discrepancy: N,
    /// Last pivot step that touched this ray.
    pub(crate) visiting_step: u64,
}

pub(crate) struct RayStore<N: DefaultNormalizer, S> {
    dim: usize,
    extended_dim: usize,
    /// Row count of the inequality system; capacity of every cobasis.
    universe: usize,
    slab: Slab<Ray<N, S>>,
    blocks: BlockPool<N>,
    norm: N::Norm,
}

impl<N: Num + DefaultNormalizer, S: SmallSet> RayStore<N, S> {
    pub(crate) fn new(dim: usize, num_discrepancies: usize, universe: usize) -> Self {
        Self {
            dim,
            extended_dim: dim + num_discrepancies,
            universe,
            slab: Slab::new(),
            blocks: BlockPool::new(),
            norm: N::Norm::default(),
        }
    }

    /// New normalized ray from explicit coordinates (and cached
    /// discrepancies when the store carries them). The cobasis starts
    /// empty.
    pub(crate) fn create(&mut self, coordinates: &[N], discrepancies: &[N]) -> RayId {
        let mut block = self.blocks.acquire(self.extended_dim, N::zero());
        block[..self.dim].clone_from_slice(coordinates);
        block[self.dim..].clone_from_slice(&discrepancies[..self.extended_dim - self.dim]);
        self.norm.normalize(&mut block);
        let ray = Ray {
            block,
            cobasis: S::empty(self.universe),
            adjacent: Vec::new(),
            outside: Vec::new(),
            pivot_discrepancy: N::zero(),
            visiting_step: 0,
        };
        RayId(self.slab.insert(ray) as u32)
    }

    /// New ray on the `(plus, minus)` edge cut by the pivot row:
    /// `r' = d⁺ · r⁻ − d⁻ · r⁺` over the whole block, so the cached
    /// discrepancies combine along with the coordinates.
    ///
    /// The new ray starts adjacent to `plus`, and the edge `plus–minus`
    /// is rewritten to `plus–r'` in place.
    pub(crate) fn combine(&mut self, plus: RayId, minus: RayId, pivot_inequality: usize) -> RayId {
        let mut block = self.blocks.acquire(self.extended_dim, N::zero());
        let (mut cobasis, visiting_step) = {
            let plus_ray = &self.slab[plus.index()];
            let minus_ray = &self.slab[minus.index()];
            lin_comb2_into(
                &mut block,
                &minus_ray.block,
                &plus_ray.pivot_discrepancy,
                &plus_ray.block,
                &minus_ray.pivot_discrepancy.ref_neg(),
            );
            (
                S::intersection(&plus_ray.cobasis, &minus_ray.cobasis),
                plus_ray.visiting_step,
            )
        };
        self.norm.normalize(&mut block);
        cobasis.insert(pivot_inequality);
        let ray = Ray {
            block,
            cobasis,
            adjacent: vec![plus],
            outside: Vec::new(),
            pivot_discrepancy: N::zero(),
            visiting_step,
        };
        let id = RayId(self.slab.insert(ray) as u32);
        let plus_ray = &mut self.slab[plus.index()];
        if let Some(entry) = plus_ray.adjacent.iter_mut().find(|entry| **entry == minus) {
            *entry = id;
        }
        id
    }

    pub(crate) fn release(&mut self, id: RayId) {
        let ray = self.slab.remove(id.index());
        self.blocks.release(ray.block);
    }

    #[inline]
    pub(crate) fn ray(&self, id: RayId) -> &Ray<N, S> {
        &self.slab[id.index()]
    }

    #[inline]
    pub(crate) fn ray_mut(&mut self, id: RayId) -> &mut Ray<N, S> {
        &mut self.slab[id.index()]
    }

    #[inline]
    pub(crate) fn coordinates(&self, id: RayId) -> &[N] {
        &self.ray(id).block[..self.dim]
    }

    /// Cached discrepancies; empty unless the store was built with them.
    #[inline]
    pub(crate) fn discrepancies(&self, id: RayId) -> &[N] {
        &self.ray(id).block[self.dim..]
    }

    pub(crate) fn take_adjacent(&mut self, id: RayId) -> Vec<RayId> {
        std::mem::take(&mut self.ray_mut(id).adjacent)
    }

    pub(crate) fn put_adjacent(&mut self, id: RayId, adjacent: Vec<RayId>) {
        self.ray_mut(id).adjacent = adjacent;
    }

    pub(crate) fn outstanding(&self) -> usize {
        self.slab.outstanding()
    }
}

#[cfg(test)]
mod tests {
    use super::RayStore;
    use crate::num::Num;
    use skelter_core::{SmallSet, SortedSet};

    #[test]
    fn created_rays_are_normalized() {
        let mut store: RayStore<i64, SortedSet<u8>> = RayStore::new(3, 0, 4);
        let id = store.create(&[2, -4, 6], &[]);
        assert_eq!(store.coordinates(id), &[1, -2, 3]);
        store.release(id);
        assert_eq!(store.outstanding(), 0);
    }

    #[test]
    fn combine_lands_on_the_pivot_hyperplane() {
        let mut store: RayStore<i64, SortedSet<u8>> = RayStore::new(2, 0, 3);
        let plus = store.create(&[1, 0], &[]);
        let minus = store.create(&[0, 1], &[]);
        store.ray_mut(plus).cobasis.insert(0);
        store.ray_mut(plus).cobasis.insert(2);
        store.ray_mut(minus).cobasis.insert(0);
        store.ray_mut(minus).adjacent.push(plus);
        store.ray_mut(plus).adjacent.push(minus);
        // Pivot row x - y >= 0: plus has discrepancy 1, minus has -1.
        store.ray_mut(plus).pivot_discrepancy = 1;
        store.ray_mut(minus).pivot_discrepancy = -1;

        let fresh = store.combine(plus, minus, 1);
        // d+ * r- - d- * r+ = (0,1) + (1,0).
        assert_eq!(store.coordinates(fresh), &[1, 1]);
        assert_eq!(store.ray(fresh).cobasis.indices(), vec![0, 1]);
        assert_eq!(store.ray(fresh).adjacent, vec![plus]);
        // The plus ray's edge to the consumed minus ray now points at
        // the new ray.
        assert_eq!(store.ray(plus).adjacent, vec![fresh]);
        assert_eq!(store.ray(fresh).visiting_step, 0);
        assert_eq!(store.ray(fresh).pivot_discrepancy, i64::zero());
    }
}
