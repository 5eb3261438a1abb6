//! Inter-stage artifact store.

use kiln_model::AdapterDescriptor;

/// Append-only collection of artifacts shared between stages.
///
/// An earlier stage appends descriptors that stages running later in the
/// same pass (or in any later pass) read through [`snapshot`]. The store is
/// scoped to the session and is never reset between passes, so an artifact
/// produced in pass N stays visible in pass N+1. There is no removal.
///
/// [`snapshot`]: ArtifactStore::snapshot
#[derive(Debug, Default)]
pub struct ArtifactStore {
    artifacts: Vec<AdapterDescriptor>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an artifact for the remainder of the session.
    pub fn append(&mut self, artifact: AdapterDescriptor) {
        self.artifacts.push(artifact);
    }

    /// Read-only view of every artifact, in insertion order.
    pub fn snapshot(&self) -> &[AdapterDescriptor] {
        &self.artifacts
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}
