//! Marker kinds recognized by the built-in stages.

use kiln_model::MarkerKind;

/// Marker carried by types that should receive a generated serialization
/// adapter.
pub fn serializable() -> MarkerKind {
    MarkerKind::new("serializable")
}

/// Marker carried by the factory declaration that aggregates every
/// generated adapter.
pub fn serializable_factory() -> MarkerKind {
    MarkerKind::new("serializable-factory")
}
