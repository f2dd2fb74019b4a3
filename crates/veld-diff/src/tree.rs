//! Flattened hash tree: one pass over a value producing a linked entry arena.
//!
//! Instead of a pointer-based tree, every node becomes a [`HashEntry`] in a
//! single growable array, linked by integer indices. Entries appear in stable
//! preorder, so a non-root entry's parent index is always smaller than its own
//! index, and a node's children start (if any) at the slot right after it.
//!
//! # Invariants
//!
//! - Entries form a valid forest via parent/sibling links.
//! - Traversal order is stable preorder.
//! - Sibling chains link only entries sharing a parent, in emission order
//!   (original order for lists, sorted-key order for maps).
//!
//! Building recurses per nesting level; depth is bounded by the nesting depth
//! of the input value.

use serde_json::Value;
use veld_types::Digest;

use veld_hash::{bool_digest, null_digest, number_digest, string_digest, MapHasher, SliceHasher};

use crate::error::DiffResult;

/// Positional reference of an entry under its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot<'a> {
    /// Index under the parent (element position for lists, sorted-key field
    /// position for maps, 0 for the root).
    pub index: usize,
    /// The field key, when the parent is a map.
    pub key: Option<&'a str>,
}

/// One flattened tree node: content hash, links, positional reference, and a
/// borrow of the raw value.
#[derive(Clone, Copy, Debug)]
pub struct HashEntry<'a> {
    /// Content hash of this node's canonical encoding.
    pub hash: Digest,
    /// Order-insensitive XOR of the children's hashes. `Some` only for map
    /// nodes with at least one field.
    pub aggregate: Option<Digest>,
    /// The raw value this entry was built from.
    pub value: &'a Value,
    /// Approximate size weight, used only as a cost signal.
    pub size: usize,
    /// Index of the parent entry, `None` for the root.
    pub parent: Option<usize>,
    /// Index of the next sibling, `None` if this is the last child.
    pub sibling: Option<usize>,
    /// Position under the parent.
    pub slot: Slot<'a>,
}

/// A value flattened into hashed entries.
///
/// The root is always entry 0. The tree borrows the input value; it is built
/// once and read-only thereafter.
#[derive(Clone, Debug)]
pub struct HashTree<'a> {
    entries: Vec<HashEntry<'a>>,
}

impl<'a> HashTree<'a> {
    /// Hash `root` into a flattened entry sequence.
    pub fn build(root: &'a Value) -> DiffResult<Self> {
        let mut tree = Self {
            entries: Vec::new(),
        };
        tree.add_node(None, Slot { index: 0, key: None }, root)?;
        Ok(tree)
    }

    /// All entries, in preorder.
    pub fn entries(&self) -> &[HashEntry<'a>] {
        &self.entries
    }

    /// Number of entries (nodes in the value).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree has no entries. Never the case for a built
    /// tree, which holds at least the root.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The root entry.
    pub fn root(&self) -> &HashEntry<'a> {
        &self.entries[0]
    }

    /// The root's content hash.
    pub fn root_hash(&self) -> Digest {
        self.entries[0].hash
    }

    /// Iterate the child entry indices of `idx` by following sibling links.
    pub fn children(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        let first = (idx + 1 < self.entries.len() && self.entries[idx + 1].parent == Some(idx))
            .then_some(idx + 1);
        std::iter::successors(first, move |&i| self.entries[i].sibling)
    }

    fn add_node(
        &mut self,
        parent: Option<usize>,
        slot: Slot<'a>,
        value: &'a Value,
    ) -> DiffResult<Digest> {
        let idx = self.entries.len();
        self.entries.push(HashEntry {
            hash: Digest::zero(),
            aggregate: None,
            value,
            size: 1,
            parent,
            sibling: None,
            slot,
        });

        let hash = match value {
            Value::Null => null_digest(),
            Value::Bool(b) => bool_digest(*b),
            Value::Number(n) => number_digest(n)?,
            Value::String(s) => {
                self.entries[idx].size = s.len() + 1;
                string_digest(s)
            }
            Value::Array(items) => {
                let mut hasher = SliceHasher::new();
                let mut prev: Option<usize> = None;
                let mut size = 1;

                for (i, child) in items.iter().enumerate() {
                    let child_idx = self.entries.len();
                    let child_hash =
                        self.add_node(Some(idx), Slot { index: i, key: None }, child)?;

                    if let Some(prev_idx) = prev {
                        self.entries[prev_idx].sibling = Some(child_idx);
                    }
                    prev = Some(child_idx);

                    hasher.write_element(&child_hash);
                    size += self.entries[child_idx].size + 1;
                }

                self.entries[idx].size = size;
                hasher.sum()
            }
            Value::Object(map) => {
                // Sorted key order canonicalizes insertion order.
                let mut fields: Vec<(&'a str, &'a Value)> =
                    map.iter().map(|(k, v)| (k.as_str(), v)).collect();
                fields.sort_unstable_by_key(|(key, _)| *key);

                let mut hasher = MapHasher::new();
                let mut aggregate: Option<Digest> = None;
                let mut prev: Option<usize> = None;
                let mut size = 1;

                for (i, (key, child)) in fields.into_iter().enumerate() {
                    let child_idx = self.entries.len();
                    let child_hash = self.add_node(
                        Some(idx),
                        Slot {
                            index: i,
                            key: Some(key),
                        },
                        child,
                    )?;

                    if let Some(prev_idx) = prev {
                        self.entries[prev_idx].sibling = Some(child_idx);
                    }
                    prev = Some(child_idx);

                    hasher.write_field(key, &child_hash);
                    aggregate = Some(match aggregate {
                        Some(agg) => agg.xor(&child_hash),
                        None => child_hash,
                    });
                    size += key.len() + self.entries[child_idx].size + 1;
                }

                self.entries[idx].aggregate = aggregate;
                self.entries[idx].size = size;
                hasher.sum()
            }
        };

        self.entries[idx].hash = hash;
        Ok(hash)
    }
}
