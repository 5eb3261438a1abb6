//! Generated source units.

/// A single generated source unit, handed to a code sink for emission.
///
/// The qualified name identifies the unit within the session; writing a
/// unit with a name that was already written replaces the earlier contents
/// (aggregating stages re-emit as they see more of the program).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Unit name, unique within the session (e.g. `FooAdapter`).
    pub qualified_name: String,
    /// Full source text of the unit.
    pub contents: String,
}

impl GeneratedUnit {
    pub fn new(qualified_name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            contents: contents.into(),
        }
    }
}
