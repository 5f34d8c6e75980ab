use skelter_core::{BitSet, SmallSet, SortedSet};

fn build<S: SmallSet>(universe: usize, elements: &[usize]) -> S {
    let mut set = S::empty(universe);
    for &element in elements {
        set.insert(element);
    }
    set
}

fn check_laws<S: SmallSet>(universe: usize) {
    let a: S = build(universe, &[0, 3, 5, universe - 1]);
    let b: S = build(universe, &[3, 4, universe - 1]);

    let common = S::intersection(&a, &b);
    assert_eq!(common.indices(), vec![3, universe - 1]);
    assert_eq!(
        S::intersection_cardinality(&a, &b),
        common.cardinality(),
        "intersection cardinality must match the materialized intersection"
    );

    assert!(a.subset_of(&a));
    assert!(common.subset_of(&a));
    assert!(common.subset_of(&b));
    assert!(!a.subset_of(&b));

    // Mutual inclusion means equality of the index sequences.
    let a2: S = build(universe, &[universe - 1, 5, 3, 0]);
    assert!(a.subset_of(&a2) && a2.subset_of(&a));
    assert_eq!(a.indices(), a2.indices());

    let empty = S::empty(universe);
    assert_eq!(empty.cardinality(), 0);
    assert!(empty.subset_of(&a));
    assert_eq!(S::intersection_cardinality(&empty, &a), 0);
}

#[test]
fn bitfield_widths_satisfy_the_set_laws() {
    check_laws::<BitSet<1>>(32);
    check_laws::<BitSet<2>>(64);
    check_laws::<BitSet<3>>(96);
    check_laws::<BitSet<4>>(128);
}

#[test]
fn sorted_vectors_satisfy_the_set_laws() {
    check_laws::<SortedSet<u8>>(256);
    check_laws::<SortedSet<u16>>(300);
    check_laws::<SortedSet<u32>>(70_000);
    check_laws::<SortedSet<u64>>(70_000);
}

#[test]
fn representations_agree_on_a_dense_universe() {
    let elements: Vec<usize> = (0..96).filter(|v| v % 3 != 1).collect();
    let bits: BitSet<3> = build(96, &elements);
    let sorted: SortedSet<u8> = build(96, &elements);
    assert_eq!(bits.indices(), sorted.indices());
    assert_eq!(bits.cardinality(), sorted.cardinality());
}
