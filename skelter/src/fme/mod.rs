//! Fourier–Motzkin elimination with Chernikov pruning.
//!
//! Each step eliminates one variable: inequalities are partitioned by
//! the sign of the variable's coefficient, every `(+, −)` pair passing
//! the first Chernikov rule is combined into a new inequality, and the
//! second rule prunes the redundant survivors. The Chernikov index of a
//! derived row is tracked through its complement, turning both rules
//! into cheap set-cardinality and subset tests.

mod engine;
mod inequality;
mod order;

pub mod dual;

use skelter_core::{BitSet, SetElement, SortedSet};

use crate::SkelterError as Error;
use crate::matrix::Matrix;
use crate::num::{DefaultNormalizer, Num, Tolerance};

pub use engine::FmeOutput;

/// How the second Chernikov rule is scheduled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChernikovTest {
    /// After each plus row's batch, test only that batch against the
    /// zero rows and against itself.
    #[default]
    Graph,
    /// After all pairs are generated, test every new row against every
    /// zero row and every other new row.
    Enumeration,
}

impl std::str::FromStr for ChernikovTest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(match s {
            "graph" => Self::Graph,
            "enumeration" => Self::Enumeration,
            _ => {
                return Err(Error::UnknownName {
                    what: "Chernikov test",
                    value: s.to_owned(),
                });
            }
        })
    }
}

impl std::fmt::Display for ChernikovTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Graph => "graph",
            Self::Enumeration => "enumeration",
        })
    }
}

/// Order in which the requested variables are eliminated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EliminationOrdering {
    /// At each step, the remaining variable with the fewest
    /// `|plus| · |minus|` pairs.
    #[default]
    MinPairs,
    /// At each step, the remaining variable with the most pairs.
    MaxPairs,
    MinIndex,
    MaxIndex,
    Random,
    /// Exactly the order given in the elimination file.
    Fixed,
}

impl std::str::FromStr for EliminationOrdering {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(match s {
            "minpairs" => Self::MinPairs,
            "maxpairs" => Self::MaxPairs,
            "minindex" => Self::MinIndex,
            "maxindex" => Self::MaxIndex,
            "random" => Self::Random,
            "fixed" => Self::Fixed,
            _ => {
                return Err(Error::UnknownName {
                    what: "elimination ordering",
                    value: s.to_owned(),
                });
            }
        })
    }
}

impl std::fmt::Display for EliminationOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::MinPairs => "minpairs",
            Self::MaxPairs => "maxpairs",
            Self::MinIndex => "minindex",
            Self::MaxIndex => "maxindex",
            Self::Random => "random",
            Self::Fixed => "fixed",
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct FmeOptions {
    pub chernikov_test: ChernikovTest,
    pub ordering: EliminationOrdering,
}

impl FmeOptions {
    pub fn with_chernikov_test(mut self, test: ChernikovTest) -> Self {
        self.chernikov_test = test;
        self
    }

    pub fn with_ordering(mut self, ordering: EliminationOrdering) -> Self {
        self.ordering = ordering;
        self
    }
}

/// Eliminates the listed variables from `{x : inequalities · x ≥ 0}`,
/// returning the reduced system over the remaining variables
/// (eliminated columns come back zero).
pub fn eliminate<N>(
    inequalities: &Matrix<N>,
    variables: &[usize],
    options: &FmeOptions,
    tol: &Tolerance<N>,
) -> Result<FmeOutput<N>, Error>
where
    N: Num + DefaultNormalizer,
{
    let n = inequalities.row_count();
    if n <= BitSet::<1>::CAPACITY {
        return engine::run::<N, BitSet<1>>(inequalities, variables, options, tol);
    }
    if n <= BitSet::<2>::CAPACITY {
        return engine::run::<N, BitSet<2>>(inequalities, variables, options, tol);
    }
    if n <= BitSet::<3>::CAPACITY {
        return engine::run::<N, BitSet<3>>(inequalities, variables, options, tol);
    }
    if n <= BitSet::<4>::CAPACITY {
        return engine::run::<N, BitSet<4>>(inequalities, variables, options, tol);
    }
    // No bitfield is wide enough; use a sorted vector of the smallest
    // fitting element type.
    if n <= <u16 as SetElement>::MAX_UNIVERSE {
        engine::run::<N, SortedSet<u16>>(inequalities, variables, options, tol)
    } else if n <= <u32 as SetElement>::MAX_UNIVERSE {
        engine::run::<N, SortedSet<u32>>(inequalities, variables, options, tol)
    } else {
        engine::run::<N, SortedSet<u64>>(inequalities, variables, options, tol)
    }
}
