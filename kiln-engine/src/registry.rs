//! Marker kind registry.

use indexmap::IndexSet;
use kiln_model::MarkerKind;

/// Union of the marker kinds all registered stages care about.
///
/// The registry is append-only for the session lifetime: each stage
/// contributes its supported kinds once, at session construction, and the
/// union tells the host which declarations to supply. Iteration order is
/// first-registration order, so batch construction is deterministic.
#[derive(Debug, Default, Clone)]
pub struct MarkerRegistry {
    kinds: IndexSet<MarkerKind>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stage's supported kinds to the union.
    pub fn register(&mut self, kinds: impl IntoIterator<Item = MarkerKind>) {
        self.kinds.extend(kinds);
    }

    /// All registered kinds, in first-registration order.
    pub fn all_kinds(&self) -> &IndexSet<MarkerKind> {
        &self.kinds
    }

    pub fn contains(&self, kind: &MarkerKind) -> bool {
        self.kinds.contains(kind)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
