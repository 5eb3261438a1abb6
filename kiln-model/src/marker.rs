//! Marker kind identifiers.

use serde::{Deserialize, Serialize};

/// Identifier for one class of marker annotation.
///
/// A marker kind names a category of annotated declarations (for example
/// `serializable`). Kinds are globally unique per name, ordered, and
/// hashable, so they can key the per-pass batches the engine builds.
/// Stages declare the kinds they support statically, at registration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerKind(String);

impl MarkerKind {
    /// Create a marker kind from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The marker's name, without any sigil.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MarkerKind {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_kind_equality() {
        assert_eq!(MarkerKind::new("serializable"), "serializable".into());
        assert_ne!(
            MarkerKind::new("serializable"),
            MarkerKind::new("serializable-factory")
        );
    }

    #[test]
    fn test_marker_kind_display() {
        assert_eq!(MarkerKind::new("serializable").to_string(), "serializable");
    }
}
