//! Declaration model boundary.

use indexmap::{IndexMap, IndexSet};
use kiln_model::{Declaration, MarkerKind};

/// The host's view of program declarations.
///
/// The engine asks the model "which declarations carry marker kind K?"
/// without knowing how declarations are represented internally. The model
/// is queried afresh on every pass, and may return declarations that were
/// not visible earlier (other tooling, including the engine's own stages,
/// can produce new source during the session).
///
/// A kind the model cannot resolve yields an empty set; absence of matches
/// is never an error.
pub trait DeclarationModel {
    fn declarations_annotated_with(&self, kind: &MarkerKind) -> IndexSet<Declaration>;
}

/// Declaration model backed by an in-process table.
///
/// Used by the CLI host (populated from the session manifest) and as the
/// test double for engine tests. Declarations can be added between passes
/// to simulate source that becomes visible later in the session.
#[derive(Debug, Default, Clone)]
pub struct InMemoryModel {
    by_kind: IndexMap<MarkerKind, IndexSet<Declaration>>,
}

impl InMemoryModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `declaration` carries `kind`.
    pub fn annotate(&mut self, kind: MarkerKind, declaration: Declaration) {
        self.by_kind.entry(kind).or_default().insert(declaration);
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.values().all(IndexSet::is_empty)
    }
}

impl DeclarationModel for InMemoryModel {
    fn declarations_annotated_with(&self, kind: &MarkerKind) -> IndexSet<Declaration> {
        self.by_kind.get(kind).cloned().unwrap_or_default()
    }
}
