//! Per-pass declaration batches.

use indexmap::{IndexMap, IndexSet};
use kiln_model::{Declaration, MarkerKind};

/// Mapping from marker kind to the set of declarations carrying it,
/// built fresh for each pass.
///
/// Kinds with no matching declarations are never inserted, so an empty
/// batch means the pass has no work at all. A declaration that matches
/// several kinds appears once under each of them, but never twice within
/// one kind's set. Once handed to stages the batch is read-only and is
/// discarded when the pass completes.
///
/// Iteration order within a kind's set is insertion order. That makes
/// dispatch deterministic, but it is not part of the contract: stages that
/// need ordered output must sort their own results before emission.
#[derive(Debug, Default, Clone)]
pub struct PassBatch {
    entries: IndexMap<MarkerKind, IndexSet<Declaration>>,
}

impl PassBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a kind's declarations into the batch, skipping empty results.
    pub fn insert(
        &mut self,
        kind: MarkerKind,
        declarations: impl IntoIterator<Item = Declaration>,
    ) {
        let mut declarations = declarations.into_iter().peekable();
        if declarations.peek().is_none() {
            return;
        }
        self.entries.entry(kind).or_default().extend(declarations);
    }

    /// The sub-batch containing only the given kinds.
    pub fn restricted_to(&self, kinds: &IndexSet<MarkerKind>) -> PassBatch {
        PassBatch {
            entries: self
                .entries
                .iter()
                .filter(|(kind, _)| kinds.contains(*kind))
                .map(|(kind, declarations)| (kind.clone(), declarations.clone()))
                .collect(),
        }
    }

    /// True when no kind has any matching declaration.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The kinds present in this batch.
    pub fn kinds(&self) -> impl Iterator<Item = &MarkerKind> {
        self.entries.keys()
    }

    /// Declarations carrying the given kind, if any matched this pass.
    pub fn declarations(&self, kind: &MarkerKind) -> Option<&IndexSet<Declaration>> {
        self.entries.get(kind)
    }

    /// Iterate over `(kind, declarations)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&MarkerKind, &IndexSet<Declaration>)> {
        self.entries.iter()
    }

    /// Total number of `(kind, declaration)` pairings in the batch.
    pub fn declaration_count(&self) -> usize {
        self.entries.values().map(IndexSet::len).sum()
    }
}
