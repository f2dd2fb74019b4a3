//! Diff engine for veld.
//!
//! Computes a compact edit program transforming one JSON-shaped value
//! (`serde_json::Value`) into another, using content-addressed hashing to
//! detect reusable substructure. The program is a fast heuristic diff, always
//! correct but not guaranteed minimal: replaying it against the source value
//! reproduces the target exactly.
//!
//! # Key Types
//!
//! - [`diff_values`] / [`Patch`] / [`Op`] -- Diff two values into an edit program
//! - [`HashTree`] / [`HashEntry`] -- Flattened, hashed entry arena over a value
//! - [`HashIndex`] -- Reverse hash lookup over the source tree
//! - [`CandidateStrategy`] / [`SingleRoot`] -- Pluggable reuse-context selection
//! - [`apply_patch`] -- Reference interpreter for round-trip verification

pub mod apply;
pub mod differ;
pub mod error;
pub mod index;
pub mod patch;
pub mod strategy;
pub mod tree;

pub use apply::apply_patch;
pub use differ::{diff_values, diff_values_with};
pub use error::{DiffError, DiffResult};
pub use index::HashIndex;
pub use patch::{Op, Patch};
pub use strategy::{Candidate, CandidateStrategy, SingleRoot};
pub use tree::{HashEntry, HashTree, Slot};
