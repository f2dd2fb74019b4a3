//! The edit program model.
//!
//! A [`Patch`] is a flat, ordered sequence of [`Op`]s. It is built once by the
//! reconstruction engine, immutable after construction, and consumed wholly by
//! an interpreter maintaining a value stack and a container-builder stack.
//! The numeric wire encoding of opcodes is an external contract; this crate
//! never serializes a program to bytes or text.

use serde_json::Value;

/// One edit instruction.
///
/// Positional operands resolve against the *original source value* by
/// structural position: array slices index the source root's elements, field
/// copies index the source root's fields in sorted key order, and string
/// slices are UTF-8 byte offsets into the source root string, always landing
/// on codepoint boundaries.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    /// Push a literal value onto the value stack.
    Value(Value),
    /// Open a blank container. Its concrete kind (array, object, or string)
    /// is fixed by the first bind or append applied to it.
    Blank,
    /// Bind the top of the value stack into the open array. With an empty
    /// value stack this only commits the container's array kind.
    ReturnIntoArray,
    /// Bind the top of the value stack into the open object under `key`. With
    /// an empty value stack this only commits the container's object kind.
    ReturnIntoObject { key: String },
    /// Copy the source object's field at `index` (sorted key order), key and
    /// value, into the open object.
    ObjectCopyField { index: usize },
    /// Append the source array's elements in `[start, end)` to the open array.
    ArrayAppendSlice { start: usize, end: usize },
    /// Append a literal string to the open string.
    StringAppendString(String),
    /// Append the source string's bytes in `[start, end)` to the open string.
    StringAppendSlice { start: usize, end: usize },
    /// Discard the top of the value stack.
    Pop,
}

/// A complete edit program.
///
/// An empty program means "the target equals the source".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Patch {
    /// The instruction sequence, in execution order.
    pub ops: Vec<Op>,
}

impl Patch {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.ops.len()
    }
}

impl From<Vec<Op>> for Patch {
    fn from(ops: Vec<Op>) -> Self {
        Self { ops }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_patch_is_empty() {
        let patch = Patch::new();
        assert!(patch.is_empty());
        assert_eq!(patch.len(), 0);
    }

    #[test]
    fn from_ops_preserves_order() {
        let patch = Patch::from(vec![
            Op::Blank,
            Op::Value(json!(1)),
            Op::ReturnIntoObject { key: "a".into() },
        ]);
        assert_eq!(patch.len(), 3);
        assert_eq!(patch.ops[0], Op::Blank);
    }
}
