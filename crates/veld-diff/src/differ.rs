//! The reconstruction engine: diff two values into an edit program.
//!
//! Both inputs are hashed into flattened [`HashTree`]s (in parallel — the two
//! walks are independent pure computation), a reverse [`HashIndex`] is built
//! over the source, and the engine emits a program that rebuilds the target
//! from literal pieces and reused source substructure. The result is a fast
//! heuristic diff: always correct, not guaranteed minimal.
//!
//! Dispatch is on the root kind pair. Matching container kinds reconstruct
//! structurally; anything else falls back to a single literal replacement,
//! which guarantees termination with a valid program for every input pair.

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::DiffResult;
use crate::index::HashIndex;
use crate::patch::{Op, Patch};
use crate::strategy::{Candidate, CandidateStrategy, SingleRoot};
use crate::tree::HashTree;

/// Compute an edit program transforming `source` into `target`.
///
/// Replaying the program against `source` yields `target` exactly. Identical
/// inputs (same reference or same content hash) yield an empty program.
pub fn diff_values(source: &Value, target: &Value) -> DiffResult<Patch> {
    diff_values_with(&SingleRoot, source, target)
}

/// [`diff_values`] with an explicit candidate-selection strategy.
pub fn diff_values_with(
    strategy: &dyn CandidateStrategy,
    source: &Value,
    target: &Value,
) -> DiffResult<Patch> {
    if std::ptr::eq(source, target) {
        return Ok(Patch::new());
    }

    let (source_tree, target_tree) =
        rayon::join(|| HashTree::build(source), || HashTree::build(target));
    let (source_tree, target_tree) = (source_tree?, target_tree?);

    if source_tree.root_hash() == target_tree.root_hash() {
        return Ok(Patch::new());
    }

    let index = HashIndex::new(source_tree.entries());
    debug!(
        source_entries = source_tree.len(),
        target_entries = target_tree.len(),
        indexed_hashes = index.len(),
        "hashed inputs, reconstructing"
    );

    let differ = Differ {
        source: &source_tree,
        target: &target_tree,
        index: &index,
    };
    Ok(differ.build(strategy))
}

/// Borrows both hashed trees and the source index for one reconstruction run.
pub(crate) struct Differ<'t, 'a> {
    pub(crate) source: &'t HashTree<'a>,
    pub(crate) target: &'t HashTree<'a>,
    pub(crate) index: &'t HashIndex,
}

impl Differ<'_, '_> {
    pub(crate) fn build(&self, strategy: &dyn CandidateStrategy) -> Patch {
        let candidates = strategy.candidates(self.source, self.target);
        self.reconstruct(0, &candidates)
    }

    fn reconstruct(&self, target_idx: usize, candidates: &[Candidate]) -> Patch {
        let target = &self.target.entries()[target_idx];
        let Some(first) = candidates.first() else {
            return Patch::from(vec![Op::Value(target.value.clone())]);
        };
        let context = &self.source.entries()[first.context];
        trace!(context = first.context, cost = first.cost, "dispatching on root kind pair");

        match (context.value, target.value) {
            (Value::Array(_), Value::Array(_)) => self.reconstruct_array(target_idx, first.context),
            (Value::Object(_), Value::Object(_)) => {
                self.reconstruct_object(target_idx, first.context)
            }
            (Value::String(_), Value::String(s)) => self.reconstruct_string(s, candidates),
            _ => Patch::from(vec![Op::Value(target.value.clone())]),
        }
    }

    /// Rebuild a map: reuse fields that occupy the same structural slot in
    /// the context (same key, direct field of the context entry), write the
    /// rest literally. Source-only fields are never visited, hence dropped.
    fn reconstruct_object(&self, target_idx: usize, context_idx: usize) -> Patch {
        let mut ops = vec![Op::Blank];
        let fields: Vec<usize> = self.target.children(target_idx).collect();

        if fields.is_empty() {
            // Empty-key bind with nothing on the value stack: commits the
            // container's object kind.
            ops.push(Op::ReturnIntoObject { key: String::new() });
            return Patch::from(ops);
        }

        for field_idx in fields {
            let field = &self.target.entries()[field_idx];
            let reused = self.index.lookup(&field.hash).iter().find(|&&m| {
                let candidate = &self.source.entries()[m];
                candidate.parent == Some(context_idx) && candidate.slot.key == field.slot.key
            });

            match reused {
                Some(&m) => {
                    ops.push(Op::ObjectCopyField {
                        index: self.source.entries()[m].slot.index,
                    });
                }
                None => {
                    ops.push(Op::Value(field.value.clone()));
                    ops.push(Op::ReturnIntoObject {
                        key: field.slot.key.unwrap_or("").to_string(),
                    });
                }
            }
        }

        Patch::from(ops)
    }

    /// Rebuild a list: compress contiguous matched runs of context elements
    /// into slice copies, write unmatched elements literally.
    fn reconstruct_array(&self, target_idx: usize, context_idx: usize) -> Patch {
        let mut ops = vec![Op::Blank];
        let elements: Vec<usize> = self.target.children(target_idx).collect();

        if elements.is_empty() {
            // No-value bind commits the array kind; the discard balances the
            // stack for the interpreter.
            ops.push(Op::ReturnIntoArray);
            ops.push(Op::Pop);
            return Patch::from(ops);
        }

        // Open run over source positions, as (start, end-exclusive).
        let mut run: Option<(usize, usize)> = None;

        for element_idx in elements {
            let element = &self.target.entries()[element_idx];
            let matched = self
                .index
                .lookup(&element.hash)
                .iter()
                .find(|&&m| self.source.entries()[m].parent == Some(context_idx));

            match matched {
                Some(&m) => {
                    let position = self.source.entries()[m].slot.index;
                    run = match run {
                        Some((start, end)) if position == end => Some((start, end + 1)),
                        Some((start, end)) => {
                            ops.push(Op::ArrayAppendSlice { start, end });
                            Some((position, position + 1))
                        }
                        None => Some((position, position + 1)),
                    };
                }
                None => {
                    if let Some((start, end)) = run.take() {
                        ops.push(Op::ArrayAppendSlice { start, end });
                    }
                    ops.push(Op::Value(element.value.clone()));
                    ops.push(Op::ReturnIntoArray);
                }
            }
        }

        if let Some((start, end)) = run {
            ops.push(Op::ArrayAppendSlice { start, end });
        }

        Patch::from(ops)
    }

    /// Rebuild a string from the first candidate that is a string: copy the
    /// longest common prefix and suffix, write one literal middle. Multiple
    /// disjoint edits collapse into a single larger middle.
    fn reconstruct_string(&self, target: &str, candidates: &[Candidate]) -> Patch {
        for candidate in candidates {
            let Value::String(source) = self.source.entries()[candidate.context].value else {
                continue;
            };
            if source.as_str() == target {
                return Patch::new();
            }

            let prefix = common_prefix(source, target);
            let suffix = common_suffix(source, target, prefix);

            let mut ops = vec![Op::Blank];
            if prefix > 0 {
                ops.push(Op::StringAppendSlice {
                    start: 0,
                    end: prefix,
                });
            }
            let middle = &target[prefix..target.len() - suffix];
            if !middle.is_empty() {
                ops.push(Op::StringAppendString(middle.to_string()));
            }
            if suffix > 0 {
                ops.push(Op::StringAppendSlice {
                    start: source.len() - suffix,
                    end: source.len(),
                });
            }
            if ops.len() == 1 {
                // Empty target: an empty literal append commits the string
                // kind, as the no-op binds do for empty containers.
                ops.push(Op::StringAppendString(String::new()));
            }
            return Patch::from(ops);
        }

        Patch::from(vec![Op::Value(Value::String(target.to_string()))])
    }
}

/// Byte length of the longest common prefix, advancing whole codepoints only.
fn common_prefix(a: &str, b: &str) -> usize {
    let mut len = 0;
    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca != cb {
            break;
        }
        len += ca.len_utf8();
    }
    len
}

/// Byte length of the longest common suffix, restricted to the regions after
/// the common prefix so the two never overlap, again in whole codepoints.
fn common_suffix(a: &str, b: &str, prefix: usize) -> usize {
    let mut len = 0;
    for (ca, cb) in a[prefix..].chars().rev().zip(b[prefix..].chars().rev()) {
        if ca != cb {
            break;
        }
        len += ca.len_utf8();
    }
    len
}
