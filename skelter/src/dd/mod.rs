//! Double description method.
//!
//! The engine consumes the inequality system `{x : A x ≥ 0}` one row at
//! a time while maintaining the extreme rays of the cone cut out by the
//! rows consumed so far. Each pivot step classifies rays by the sign of
//! their discrepancy against the pivot row, builds new rays on the
//! crossing edges, and re-certifies adjacency.
//!
//! The public entry is [`dual_description`]; it picks a monomorphic
//! engine instance per run, dispatching on the requested set
//! representation and the row count.

mod adjacency;
mod engine;
mod pivoting;
mod ray;

use skelter_core::{BitSet, SetElement, SortedSet};

use crate::SkelterError as Error;
use crate::matrix::Matrix;
use crate::num::{DefaultNormalizer, Num, Tolerance};

pub use engine::DdOutput;

/// Order in which inequalities are fed to the pivoting loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PivotingOrder {
    /// Pick the inequality most violated by some current ray.
    #[default]
    Quickhull,
    MinIndex,
    MaxIndex,
    LexMin,
    LexMax,
    Random,
}

impl PivotingOrder {
    /// Every order except quickhull fixes the row sequence up front.
    pub fn is_static(self) -> bool {
        self != PivotingOrder::Quickhull
    }
}

impl std::str::FromStr for PivotingOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(match s {
            "quickhull" => Self::Quickhull,
            "minindex" => Self::MinIndex,
            "maxindex" => Self::MaxIndex,
            "lexmin" => Self::LexMin,
            "lexmax" => Self::LexMax,
            "random" => Self::Random,
            _ => {
                return Err(Error::UnknownName {
                    what: "pivoting order",
                    value: s.to_owned(),
                });
            }
        })
    }
}

impl std::fmt::Display for PivotingOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Quickhull => "quickhull",
            Self::MinIndex => "minindex",
            Self::MaxIndex => "maxindex",
            Self::LexMin => "lexmin",
            Self::LexMax => "lexmax",
            Self::Random => "random",
        })
    }
}

/// How candidate edges are certified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AdjacencyTest {
    /// Dominance scan restricted to the candidates and the current
    /// neighbors of the ray under test.
    #[default]
    Graph,
    /// Dominance scan over the whole just-created cluster.
    Combinatoric,
}

impl std::str::FromStr for AdjacencyTest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(match s {
            "graph" => Self::Graph,
            // "algebraic" survives on the command line as an alias; no
            // separate algebraic certificate exists.
            "combinatoric" | "algebraic" => Self::Combinatoric,
            _ => {
                return Err(Error::UnknownName {
                    what: "adjacency test",
                    value: s.to_owned(),
                });
            }
        })
    }
}

impl std::fmt::Display for AdjacencyTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Graph => "graph",
            Self::Combinatoric => "combinatoric",
        })
    }
}

/// Which small-set representation backs cobases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SetRepresentation {
    #[default]
    SortedVector,
    BitField,
}

impl std::str::FromStr for SetRepresentation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(match s {
            "sortedvector" => Self::SortedVector,
            "bitfield" => Self::BitField,
            _ => {
                return Err(Error::UnknownName {
                    what: "set representation",
                    value: s.to_owned(),
                });
            }
        })
    }
}

impl std::fmt::Display for SetRepresentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::SortedVector => "sortedvector",
            Self::BitField => "bitfield",
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct DdOptions {
    pub pivoting_order: PivotingOrder,
    pub adjacency_test: AdjacencyTest,
    pub set_representation: SetRepresentation,
    /// Cache per-ray discrepancies against every input row, enabling
    /// the plus/plus edge-elimination criterion during candidate search.
    pub use_plus_plus: bool,
    /// Seed for the random pivoting order; entropy when absent.
    pub random_seed: Option<u64>,
}

impl DdOptions {
    pub fn with_pivoting_order(mut self, order: PivotingOrder) -> Self {
        self.pivoting_order = order;
        self
    }

    pub fn with_adjacency_test(mut self, test: AdjacencyTest) -> Self {
        self.adjacency_test = test;
        self
    }

    pub fn with_set_representation(mut self, representation: SetRepresentation) -> Self {
        self.set_representation = representation;
        self
    }

    pub fn with_plus_plus(mut self, enabled: bool) -> Self {
        self.use_plus_plus = enabled;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }
}

/// Computes the extreme rays of `{x : inequalities · x ≥ 0}` and the
/// indices of the input rows that are facets of the cone.
///
/// Facet indices refer to rows of the input matrix, regardless of the
/// pivoting order's internal row shuffle.
pub fn dual_description<N>(
    inequalities: &Matrix<N>,
    options: &DdOptions,
    tol: &Tolerance<N>,
) -> Result<DdOutput<N>, Error>
where
    N: Num + DefaultNormalizer,
{
    let m = inequalities.row_count();
    if options.set_representation == SetRepresentation::BitField {
        if m <= BitSet::<1>::CAPACITY {
            return engine::run::<N, BitSet<1>>(inequalities, options, tol);
        }
        if m <= BitSet::<2>::CAPACITY {
            return engine::run::<N, BitSet<2>>(inequalities, options, tol);
        }
        if m <= BitSet::<3>::CAPACITY {
            return engine::run::<N, BitSet<3>>(inequalities, options, tol);
        }
        if m <= BitSet::<4>::CAPACITY {
            return engine::run::<N, BitSet<4>>(inequalities, options, tol);
        }
        // No bitfield is wide enough; fall back to sorted vectors.
    }
    if m <= <u8 as SetElement>::MAX_UNIVERSE {
        engine::run::<N, SortedSet<u8>>(inequalities, options, tol)
    } else if m <= <u16 as SetElement>::MAX_UNIVERSE {
        engine::run::<N, SortedSet<u16>>(inequalities, options, tol)
    } else if m <= <u32 as SetElement>::MAX_UNIVERSE {
        engine::run::<N, SortedSet<u32>>(inequalities, options, tol)
    } else {
        engine::run::<N, SortedSet<u64>>(inequalities, options, tol)
    }
}

#[cfg(test)]
mod tests {
    use super::{AdjacencyTest, PivotingOrder, SetRepresentation};

    #[test]
    fn option_names_round_trip() {
        for order in [
            PivotingOrder::Quickhull,
            PivotingOrder::MinIndex,
            PivotingOrder::MaxIndex,
            PivotingOrder::LexMin,
            PivotingOrder::LexMax,
            PivotingOrder::Random,
        ] {
            assert_eq!(order.to_string().parse::<PivotingOrder>().unwrap(), order);
        }
        assert_eq!("bitfield".parse::<SetRepresentation>().unwrap(), SetRepresentation::BitField);
        assert!("quickhull".parse::<AdjacencyTest>().is_err());
    }

    #[test]
    fn algebraic_is_an_alias_for_combinatoric() {
        assert_eq!(
            "algebraic".parse::<AdjacencyTest>().unwrap(),
            AdjacencyTest::Combinatoric
        );
    }
}
