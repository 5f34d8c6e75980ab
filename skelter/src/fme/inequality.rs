//! Inequalities and their factory.
//!
//! Beyond its normal vector, an inequality carries the complement of
//! its Chernikov index: the original rows *not* involved in deriving
//! it. Storing the complement turns the first Chernikov rule into an
//! intersection-cardinality test and the second into a subset test.

use skelter_core::{BlockPool, Slab, SmallSet};

use crate::num::{DefaultNormalizer, Normalizer as _, Num};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct IneqId(u32);

impl IneqId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
pub(crate) struct Inequality<N, S> {
    pub(crate) normal: Vec<N>,
    /// Complement of the Chernikov index, relative to the input rows.
    pub(crate) complement: S,
}

pub(crate) struct IneqStore<N: DefaultNormalizer, S> {
    dim: usize,
    /// Input row count; capacity of every complement set.
    universe: usize,
    slab: Slab<Inequality<N, S>>,
    blocks: BlockPool<N>,
    norm: N::Norm,
}

impl<N: Num + DefaultNormalizer, S: SmallSet> IneqStore<N, S> {
    pub(crate) fn new(dim: usize, universe: usize) -> Self {
        Self {
            dim,
            universe,
            slab: Slab::new(),
            blocks: BlockPool::new(),
            norm: N::Norm::default(),
        }
    }

    /// New normalized inequality with an empty complement; the caller
    /// fills the complement in.
    pub(crate) fn create(&mut self, normal: &[N]) -> IneqId {
        let mut block = self.blocks.acquire(self.dim, N::zero());
        block.clone_from_slice(normal);
        self.norm.normalize(&mut block);
        let inequality = Inequality {
            normal: block,
            complement: S::empty(self.universe),
        };
        IneqId(self.slab.insert(inequality) as u32)
    }

    /// Combination of a `(+, −)` pair on the eliminated variable:
    /// `normal[k] = p[v] · m[k] − m[v] · p[k]`, complement intersected.
    pub(crate) fn combine(&mut self, plus: IneqId, minus: IneqId, eliminated: usize) -> IneqId {
        let mut block = self.blocks.acquire(self.dim, N::zero());
        let complement = {
            let p = &self.slab[plus.index()];
            let m = &self.slab[minus.index()];
            crate::linalg::lin_comb2_into(
                &mut block,
                &m.normal,
                &p.normal[eliminated],
                &p.normal,
                &m.normal[eliminated].ref_neg(),
            );
            S::intersection(&p.complement, &m.complement)
        };
        self.norm.normalize(&mut block);
        let inequality = Inequality {
            normal: block,
            complement,
        };
        IneqId(self.slab.insert(inequality) as u32)
    }

    pub(crate) fn release(&mut self, id: IneqId) {
        let inequality = self.slab.remove(id.index());
        self.blocks.release(inequality.normal);
    }

    #[inline]
    pub(crate) fn get(&self, id: IneqId) -> &Inequality<N, S> {
        &self.slab[id.index()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: IneqId) -> &mut Inequality<N, S> {
        &mut self.slab[id.index()]
    }

    pub(crate) fn outstanding(&self) -> usize {
        self.slab.outstanding()
    }
}

#[cfg(test)]
mod tests {
    use super::IneqStore;
    use skelter_core::{SmallSet, SortedSet};

    #[test]
    fn combine_cancels_the_eliminated_variable() {
        let mut store: IneqStore<i64, SortedSet<u8>> = IneqStore::new(3, 4);
        let plus = store.create(&[2, 1, 0]);
        let minus = store.create(&[-3, 0, 1]);
        for row in [1, 2] {
            store.get_mut(plus).complement.insert(row);
        }
        for row in [2, 3] {
            store.get_mut(minus).complement.insert(row);
        }
        let combined = store.combine(plus, minus, 0);
        // 2*(-3,0,1) + 3*(2,1,0) = (0,3,2)
        assert_eq!(store.get(combined).normal, vec![0, 3, 2]);
        assert_eq!(store.get(combined).complement.indices(), vec![2]);
    }
}
