/// Contract shared by the compact index-set representations.
///
/// A `SmallSet` is a subset of `{0, …, m−1}` for a small universe `m`
/// fixed at construction. The universe stays in the low thousands, so
/// implementations trade generality for dense storage and cheap
/// intersection.
///
/// `insert` may be called at most once per element of a given set.
pub trait SmallSet: Clone + std::fmt::Debug {
    /// An empty set able to hold elements below `capacity`.
    fn empty(capacity: usize) -> Self;

    /// The intersection of two sets over the same universe.
    fn intersection(a: &Self, b: &Self) -> Self;

    fn insert(&mut self, element: usize);

    fn contains(&self, element: usize) -> bool;

    fn cardinality(&self) -> usize;

    fn subset_of(&self, other: &Self) -> bool;

    fn intersection_cardinality(a: &Self, b: &Self) -> usize;

    /// Elements in increasing order.
    fn indices(&self) -> Vec<usize>;
}
