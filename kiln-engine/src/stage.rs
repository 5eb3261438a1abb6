//! Generation stage trait.

use indexmap::IndexSet;
use kiln_model::MarkerKind;

use crate::{ArtifactStore, CodeSink, Diagnostic, PassBatch};

/// Collaborators lent to a stage for the duration of one invocation.
///
/// The coordinator owns the artifact store and the code sink; stages
/// borrow them here, which is what makes an earlier stage's appends
/// visible to later stages in the same pass without any persisted format.
pub struct StageContext<'a> {
    /// Session-scoped artifact store, shared across stages and passes.
    pub artifacts: &'a mut ArtifactStore,
    /// Destination for generated units.
    pub sink: &'a mut dyn CodeSink,
}

/// Result of one stage invocation.
#[derive(Debug)]
pub enum StageOutcome {
    /// Every declaration in the sub-batch was handled.
    Completed,
    /// The stage finished, but some declarations produced diagnostics.
    CompletedWithDiagnostics(Vec<Diagnostic>),
    /// The stage hit an internal inconsistency it cannot reconcile.
    /// Recorded as an error diagnostic; sibling stages still run.
    Fatal(eyre::Report),
}

/// A unit of generation work dispatched by the coordinator.
///
/// Stages are registered once at session start; registration order is
/// dispatch order, which is what lets a later stage consume artifacts an
/// earlier stage produced in the same pass.
///
/// A stage must be safe to invoke zero or more times per session. A
/// declaration that keeps matching its marker is handed to the stage again
/// on every pass, so each stage keeps its own bookkeeping of what it has
/// already fully processed and must not duplicate emitted output.
pub trait Stage {
    /// Stage name, used as diagnostic context.
    fn name(&self) -> &'static str;

    /// The marker kinds this stage consumes. Static; queried once at
    /// registration.
    fn supported_markers(&self) -> IndexSet<MarkerKind>;

    /// Process this stage's sub-batch for the current pass.
    ///
    /// The batch is already restricted to the stage's supported kinds and
    /// is never empty.
    fn run(&mut self, batch: &PassBatch, cx: &mut StageContext<'_>) -> StageOutcome;

    /// Whether the stage is still holding work it deferred to a later pass.
    ///
    /// Checked by the coordinator when the host signals the final pass; a
    /// stage that still reports pending work at that point has a bug, which
    /// surfaces as an error diagnostic.
    fn pending_work(&self) -> bool {
        false
    }
}
