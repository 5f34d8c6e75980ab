//! Substrate for the skelter engines.
//!
//! This crate holds the allocation and set primitives the combinatorial
//! engines are built on:
//! - compact index-set representations (`bitfield`, `sorted`) behind one
//!   contract (`set`)
//! - a typed slab arena with stable indices and per-length block pools
//!   (`arena`)
//!
//! The engines themselves live in the `skelter` crate and pick a set
//! representation per run based on the row count of the input.

pub mod arena;
pub mod bitfield;
pub mod set;
pub mod sorted;

pub use arena::{BlockPool, Slab};
pub use bitfield::BitSet;
pub use set::SmallSet;
pub use sorted::{SetElement, SortedSet};
