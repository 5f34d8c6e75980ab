pub use crate::SkelterError;
pub use crate::dd::{
    AdjacencyTest, DdOptions, DdOutput, PivotingOrder, SetRepresentation, dual_description,
};
pub use crate::fme::dual::dual_description_via_elimination;
pub use crate::fme::{ChernikovTest, EliminationOrdering, FmeOptions, FmeOutput, eliminate};
pub use crate::gauss::{GaussOutcome, gauss};
pub use crate::matrix::Matrix;
pub use crate::num::{DefaultNormalizer, Num, Sign, Tolerance};
pub use crate::summary::DdSummary;
pub use crate::verify::check_dual_description;
