//! Foundation types for the veld diff engine.
//!
//! This crate provides the content digest type and the shared error type used
//! by the hashing and diffing crates.
//!
//! # Key Types
//!
//! - [`Digest`] — Fixed-width 256-bit content hash of a value's canonical encoding
//! - [`TypeError`] — Errors from digest construction

pub mod digest;
pub mod error;

pub use digest::Digest;
pub use error::TypeError;
