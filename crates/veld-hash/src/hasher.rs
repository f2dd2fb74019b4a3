//! Per-kind value digesting and incremental container hashers.
//!
//! Scalar kinds hash in one shot; lists and maps accumulate child digests
//! through [`SliceHasher`] and [`MapHasher`] so the tree builder can hash a
//! container while walking its children, without materializing the
//! concatenated canonical bytes.

use std::sync::OnceLock;

use serde_json::Number;
use veld_types::{Digest, TypeError};

use crate::tag::TypeTag;

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HashError {
    /// A value outside the modeled kind-set was encountered.
    ///
    /// With `serde_json::Value` input the only reachable case is a number
    /// with no IEEE-754 double representation (arbitrary precision).
    #[error("unsupported value kind: {0}")]
    UnsupportedValue(String),
}

fn tagged(tag: TypeTag, payload: &[u8]) -> Digest {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[tag.byte()]);
    hasher.update(payload);
    Digest::from_hash(*hasher.finalize().as_bytes())
}

/// Digest of the null value. Computed once, cached for the process lifetime.
pub fn null_digest() -> Digest {
    static NULL: OnceLock<Digest> = OnceLock::new();
    *NULL.get_or_init(|| tagged(TypeTag::Null, &[]))
}

/// Digest of a boolean. Both constants are computed once and cached.
pub fn bool_digest(value: bool) -> Digest {
    static TRUE: OnceLock<Digest> = OnceLock::new();
    static FALSE: OnceLock<Digest> = OnceLock::new();
    if value {
        *TRUE.get_or_init(|| tagged(TypeTag::True, &[]))
    } else {
        *FALSE.get_or_init(|| tagged(TypeTag::False, &[]))
    }
}

/// Digest of a number: float tag followed by the 8-byte big-endian IEEE-754
/// double.
///
/// Integers are hashed through their double representation, so `1` and `1.0`
/// digest identically.
pub fn number_digest(number: &Number) -> Result<Digest, HashError> {
    let value = number
        .as_f64()
        .ok_or_else(|| HashError::UnsupportedValue(format!("number {number} is not an f64")))?;
    Ok(tagged(TypeTag::Float, &value.to_be_bytes()))
}

/// Digest of a string: string tag followed by the UTF-8 bytes.
pub fn string_digest(value: &str) -> Digest {
    tagged(TypeTag::String, value.as_bytes())
}

/// XOR two raw digest byte slices into a combined digest.
///
/// Fails with [`TypeError::InvalidLength`] if either slice is not a full
/// digest width. Combining digests of mismatched width is an internal
/// invariant violation, never expected in normal operation.
pub fn xor_bytes(a: &[u8], b: &[u8]) -> Result<Digest, TypeError> {
    let a = Digest::from_slice(a)?;
    let b = Digest::from_slice(b)?;
    Ok(a.xor(&b))
}

/// Incremental hasher for list nodes.
///
/// Order-sensitive: the digest covers the slice tag followed by each child
/// digest in original order.
pub struct SliceHasher {
    inner: blake3::Hasher,
}

impl SliceHasher {
    /// Start a new list digest.
    pub fn new() -> Self {
        let mut inner = blake3::Hasher::new();
        inner.update(&[TypeTag::Slice.byte()]);
        Self { inner }
    }

    /// Append one element's digest.
    pub fn write_element(&mut self, hash: &Digest) {
        self.inner.update(hash.as_bytes());
    }

    /// Finalize into the list's digest.
    pub fn sum(self) -> Digest {
        Digest::from_hash(*self.inner.finalize().as_bytes())
    }
}

impl Default for SliceHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Incremental hasher for map nodes.
///
/// The caller must feed fields in sorted key order; the digest covers the map
/// tag followed by, per field, the string tag, the key's UTF-8 bytes, and the
/// field value's digest. Sorting is what makes two maps with the same fields
/// in different insertion order digest identically.
pub struct MapHasher {
    inner: blake3::Hasher,
}

impl MapHasher {
    /// Start a new map digest.
    pub fn new() -> Self {
        let mut inner = blake3::Hasher::new();
        inner.update(&[TypeTag::Map.byte()]);
        Self { inner }
    }

    /// Append one field (key and value digest).
    pub fn write_field(&mut self, key: &str, hash: &Digest) {
        self.inner.update(&[TypeTag::String.byte()]);
        self.inner.update(key.as_bytes());
        self.inner.update(hash.as_bytes());
    }

    /// Finalize into the map's digest.
    pub fn sum(self) -> Digest {
        Digest::from_hash(*self.inner.finalize().as_bytes())
    }
}

impl Default for MapHasher {
    fn default() -> Self {
        Self::new()
    }
}
