use crate::set::SmallSet;

/// Element types usable inside a [`SortedSet`].
///
/// The engines pick the smallest unsigned type whose range covers the
/// universe, keeping per-set storage tight.
pub trait SetElement: Copy + Ord + std::fmt::Debug {
    const MAX_UNIVERSE: usize;

    fn from_index(index: usize) -> Self;
    fn index(self) -> usize;
}

macro_rules! impl_set_element {
    ($($ty:ty),*) => {
        $(impl SetElement for $ty {
            const MAX_UNIVERSE: usize = (<$ty>::MAX as usize).saturating_add(1);

            #[inline]
            fn from_index(index: usize) -> Self {
                debug_assert!(index < Self::MAX_UNIVERSE);
                index as $ty
            }

            #[inline]
            fn index(self) -> usize {
                self as usize
            }
        })*
    };
}

impl_set_element!(u8, u16, u32, u64);

/// Sorted-vector set over a compact element type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SortedSet<E: SetElement> {
    elements: Vec<E>,
}

impl<E: SetElement> SmallSet for SortedSet<E> {
    fn empty(capacity: usize) -> Self {
        debug_assert!(capacity <= E::MAX_UNIVERSE);
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    fn intersection(a: &Self, b: &Self) -> Self {
        let mut elements = Vec::with_capacity(a.elements.len().min(b.elements.len()));
        let (mut i, mut j) = (0, 0);
        while i < a.elements.len() && j < b.elements.len() {
            match a.elements[i].cmp(&b.elements[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    elements.push(a.elements[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        Self { elements }
    }

    fn insert(&mut self, element: usize) {
        let element = E::from_index(element);
        match self.elements.binary_search(&element) {
            Ok(_) => debug_assert!(false, "duplicate insert into sorted set"),
            Err(pos) => self.elements.insert(pos, element),
        }
    }

    fn contains(&self, element: usize) -> bool {
        element < E::MAX_UNIVERSE
            && self
                .elements
                .binary_search(&E::from_index(element))
                .is_ok()
    }

    fn cardinality(&self) -> usize {
        self.elements.len()
    }

    fn subset_of(&self, other: &Self) -> bool {
        if self.elements.len() > other.elements.len() {
            return false;
        }
        let mut i = 0;
        for candidate in &other.elements {
            if i == self.elements.len() {
                break;
            }
            match self.elements[i].cmp(candidate) {
                std::cmp::Ordering::Less => return false,
                std::cmp::Ordering::Equal => i += 1,
                std::cmp::Ordering::Greater => {}
            }
        }
        i == self.elements.len()
    }

    fn intersection_cardinality(a: &Self, b: &Self) -> usize {
        let (mut i, mut j, mut count) = (0, 0, 0);
        while i < a.elements.len() && j < b.elements.len() {
            match a.elements[i].cmp(&b.elements[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    count += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        count
    }

    fn indices(&self) -> Vec<usize> {
        self.elements.iter().map(|e| e.index()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::SortedSet;
    use crate::set::SmallSet;

    #[test]
    fn insert_keeps_elements_sorted() {
        let mut set = SortedSet::<u8>::empty(10);
        for element in [7, 1, 4, 0, 9] {
            set.insert(element);
        }
        assert_eq!(set.indices(), vec![0, 1, 4, 7, 9]);
    }

    #[test]
    fn subset_walk_handles_gaps() {
        let mut a = SortedSet::<u16>::empty(300);
        let mut b = SortedSet::<u16>::empty(300);
        for element in [2, 120, 299] {
            a.insert(element);
        }
        for element in [1, 2, 60, 120, 200, 299] {
            b.insert(element);
        }
        assert!(a.subset_of(&b));
        assert!(!b.subset_of(&a));
        assert_eq!(SortedSet::intersection_cardinality(&a, &b), 3);
        assert_eq!(SortedSet::intersection(&a, &b).indices(), vec![2, 120, 299]);
    }
}
