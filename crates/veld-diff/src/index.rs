//! Reverse hash index over a flattened source tree.
//!
//! Maps content hash to the source entry indices carrying it, in discovery
//! (ascending) order — the deterministic tie-break used when reconstruction
//! picks among equal-valued candidates. A secondary table keys rolling XOR
//! aggregates along the sibling chains of map-bearing nodes; it exists to
//! recognize field sets whose identity survives reordering, and is built but
//! not yet queried by reconstruction.

use std::collections::HashMap;

use veld_types::Digest;

use crate::tree::HashEntry;

/// Hash-to-entries lookup over the source tree. Built once, read-only after.
#[derive(Clone, Debug, Default)]
pub struct HashIndex {
    /// Content hash -> entry indices, ascending.
    pub by_hash: HashMap<Digest, Vec<usize>>,
    /// Rolling XOR over a map node's sibling chain -> entry indices.
    /// Not consumed by reconstruction; extension point for reordered or
    /// partial field-set matching.
    pub by_rolling_xor: HashMap<Digest, Vec<usize>>,
}

impl HashIndex {
    /// Index the given source entries.
    pub fn new(entries: &[HashEntry<'_>]) -> Self {
        let mut by_hash: HashMap<Digest, Vec<usize>> = HashMap::new();
        let mut by_rolling_xor: HashMap<Digest, Vec<usize>> = HashMap::new();

        for (idx, entry) in entries.iter().enumerate() {
            by_hash.entry(entry.hash).or_default().push(idx);

            if let Some(aggregate) = entry.aggregate {
                let mut rolling = aggregate;
                let mut next = entry.sibling;

                while let Some(sibling) = next {
                    rolling = rolling.xor(&entries[sibling].hash);
                    let bucket = by_rolling_xor.entry(rolling).or_default();
                    if bucket.last() != Some(&idx) {
                        bucket.push(idx);
                    }
                    next = entries[sibling].sibling;
                }
            }
        }

        Self {
            by_hash,
            by_rolling_xor,
        }
    }

    /// Source entry indices whose content hash equals `hash`, ascending.
    /// Empty when the hash does not occur in the source.
    pub fn lookup(&self, hash: &Digest) -> &[usize] {
        self.by_hash.get(hash).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct content hashes indexed.
    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    /// Returns `true` if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::HashTree;
    use serde_json::json;
    use veld_hash::{number_digest, string_digest};

    #[test]
    fn lookup_returns_ascending_indices() {
        let value = json!([1, 2, 1, 1]);
        let tree = HashTree::build(&value).unwrap();
        let index = HashIndex::new(tree.entries());

        let one = number_digest(&serde_json::Number::from(1)).unwrap();
        assert_eq!(index.lookup(&one), &[1, 3, 4]);
    }

    #[test]
    fn lookup_missing_hash_is_empty() {
        let value = json!([1]);
        let tree = HashTree::build(&value).unwrap();
        let index = HashIndex::new(tree.entries());

        assert!(index.lookup(&string_digest("absent")).is_empty());
    }

    #[test]
    fn every_entry_is_indexed() {
        let value = json!({"a": [1, "s"], "b": {"c": null}});
        let tree = HashTree::build(&value).unwrap();
        let index = HashIndex::new(tree.entries());

        for (idx, entry) in tree.entries().iter().enumerate() {
            assert!(index.lookup(&entry.hash).contains(&idx));
        }
    }

    #[test]
    fn rolling_xor_covers_map_sibling_chains() {
        // Three sibling maps: each contributes rolling keys combining its
        // aggregate with the hashes of the siblings after it.
        let value = json!([{"a": 1}, {"b": 2}, {"c": 3}]);
        let tree = HashTree::build(&value).unwrap();
        let index = HashIndex::new(tree.entries());

        let entries = tree.entries();
        let maps: Vec<usize> = tree.children(0).collect();
        let first = &entries[maps[0]];

        let step1 = first.aggregate.unwrap().xor(&entries[maps[1]].hash);
        let step2 = step1.xor(&entries[maps[2]].hash);

        assert_eq!(index.by_rolling_xor.get(&step1), Some(&vec![maps[0]]));
        assert_eq!(index.by_rolling_xor.get(&step2), Some(&vec![maps[0]]));
    }

    #[test]
    fn rolling_xor_skips_non_map_nodes() {
        let value = json!([1, [2], "s"]);
        let tree = HashTree::build(&value).unwrap();
        let index = HashIndex::new(tree.entries());

        assert!(index.by_rolling_xor.is_empty());
    }

    #[test]
    fn last_sibling_map_contributes_no_rolling_keys() {
        // A map with no following siblings has an empty rolling chain.
        let value = json!([{"a": 1}]);
        let tree = HashTree::build(&value).unwrap();
        let index = HashIndex::new(tree.entries());

        assert!(index.by_rolling_xor.is_empty());
    }
}
