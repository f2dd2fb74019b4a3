//! Hashing primitives for the veld diff engine.
//!
//! Provides domain-separated BLAKE3 digesting for each value kind, incremental
//! hashers for container nodes, and the order-insensitive XOR combinator used
//! for map aggregates.
//!
//! Every digest starts with a single tag byte identifying the value kind, so
//! values of different kinds can never collide: the string `"true"` and the
//! boolean `true` hash to different digests even before their payloads are
//! considered.
//!
//! All hashing wraps BLAKE3 — no custom cryptography.

pub mod hasher;
pub mod tag;

pub use hasher::{
    bool_digest, null_digest, number_digest, string_digest, xor_bytes, HashError, MapHasher,
    SliceHasher,
};
pub use tag::TypeTag;
