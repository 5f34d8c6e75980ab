use crate::set::SmallSet;

const CELL_BITS: usize = u32::BITS as usize;

/// Fixed-width bitfield set over `W` 32-bit cells.
///
/// The engines instantiate `W` in `1..=4`, covering universes of 32, 64,
/// 96 and 128 elements.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BitSet<const W: usize> {
    cells: [u32; W],
}

#[cfg(feature = "serde")]
impl<const W: usize> serde::Serialize for BitSet<W> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(self.cells.as_slice(), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, const W: usize> serde::Deserialize<'de> for BitSet<W> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Vec<u32> = <Vec<u32> as serde::Deserialize>::deserialize(deserializer)?;
        if raw.len() != W {
            return Err(serde::de::Error::invalid_length(raw.len(), &"bitfield cell count"));
        }
        let mut cells = [0u32; W];
        cells.copy_from_slice(&raw);
        Ok(Self { cells })
    }
}

impl<const W: usize> BitSet<W> {
    pub const CAPACITY: usize = W * CELL_BITS;
}

impl<const W: usize> SmallSet for BitSet<W> {
    fn empty(capacity: usize) -> Self {
        debug_assert!(
            capacity <= Self::CAPACITY,
            "universe of {capacity} exceeds bitfield width {}",
            Self::CAPACITY
        );
        Self { cells: [0; W] }
    }

    fn intersection(a: &Self, b: &Self) -> Self {
        let mut cells = [0u32; W];
        for (out, (x, y)) in cells.iter_mut().zip(a.cells.iter().zip(&b.cells)) {
            *out = x & y;
        }
        Self { cells }
    }

    fn insert(&mut self, element: usize) {
        debug_assert!(element < Self::CAPACITY, "element {element} out of range");
        self.cells[element / CELL_BITS] |= 1 << (element % CELL_BITS);
    }

    fn contains(&self, element: usize) -> bool {
        element < Self::CAPACITY
            && self.cells[element / CELL_BITS] & (1 << (element % CELL_BITS)) != 0
    }

    fn cardinality(&self) -> usize {
        self.cells.iter().map(|c| c.count_ones() as usize).sum()
    }

    fn subset_of(&self, other: &Self) -> bool {
        self.cells
            .iter()
            .zip(&other.cells)
            .all(|(x, y)| x & !y == 0)
    }

    fn intersection_cardinality(a: &Self, b: &Self) -> usize {
        a.cells
            .iter()
            .zip(&b.cells)
            .map(|(x, y)| (x & y).count_ones() as usize)
            .sum()
    }

    fn indices(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.cardinality());
        for (cell_idx, &cell) in self.cells.iter().enumerate() {
            let mut bits = cell;
            while bits != 0 {
                let bit = bits.trailing_zeros() as usize;
                out.push(cell_idx * CELL_BITS + bit);
                bits &= bits - 1;
            }
        }
        out
    }
}

impl<const W: usize> std::fmt::Debug for BitSet<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.indices()).finish()
    }
}
