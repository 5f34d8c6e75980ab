//! Dual descriptions of polyhedral cones and Fourier–Motzkin
//! elimination.
//!
//! Two engines over one substrate: the double description method
//! (`dd`) computes the extreme rays of `{x : A x ≥ 0}` together with
//! the facet rows, and Fourier–Motzkin elimination (`fme`) projects an
//! inequality system onto a subset of its variables, with a dual-
//! description path built on top of it. Both are generic over the
//! coefficient scalar (exact `i64`, or `f32`/`f64` under an absolute
//! tolerance) and over the cobasis set representation.

pub mod dd;
pub mod error;
pub mod fme;
pub mod gauss;
pub mod linalg;
pub mod matrix;
pub mod num;
pub mod prelude;
pub mod summary;
pub mod verify;

pub use error::SkelterError;
