//! Inter-stage artifact descriptors.

use crate::Declaration;

/// Record of one generated serialization adapter.
///
/// The adapter stage appends one descriptor per adapter it emits; the
/// factory stage later reads the accumulated descriptors to register every
/// adapter in a generated factory. Descriptors live for the remainder of
/// the session once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterDescriptor {
    /// The declaration the adapter was generated for.
    pub declaration: Declaration,
    /// Name of the generated adapter type (e.g. `FooAdapter`).
    pub adapter_name: String,
    /// Qualified name of the emitted source unit.
    pub unit_name: String,
}
