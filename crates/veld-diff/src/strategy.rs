//! Candidate selection for reconstruction contexts.
//!
//! Reconstruction diffs the target root against one or more *candidate*
//! source contexts. The selection policy sits behind [`CandidateStrategy`];
//! the default [`SingleRoot`] yields exactly the source root, which keeps the
//! historical single-context behavior. String reconstruction walks the full
//! candidate list; container reconstruction uses the first candidate only.
//! A richer strategy (ranking several source subtrees by cost) can slot in
//! without touching the engine.

use crate::tree::HashTree;

/// A source context considered as the counterpart of the target root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Index of the context entry in the source tree.
    pub context: usize,
    /// Approximate cost of rebuilding the target against this context
    /// (size-weight signal only, not a guaranteed program length).
    pub cost: usize,
}

/// Supplies the candidate contexts reconstruction may diff against.
pub trait CandidateStrategy {
    /// Candidate contexts, best first. An empty list forces the literal
    /// fallback.
    fn candidates(&self, source: &HashTree<'_>, target: &HashTree<'_>) -> Vec<Candidate>;
}

/// The trivial strategy: the source root is the only candidate.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleRoot;

impl CandidateStrategy for SingleRoot {
    fn candidates(&self, _source: &HashTree<'_>, target: &HashTree<'_>) -> Vec<Candidate> {
        vec![Candidate {
            context: 0,
            cost: target.root().size + 1,
        }]
    }
}
