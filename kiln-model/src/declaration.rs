//! Opaque declaration handles.

use serde::{Deserialize, Serialize};

/// What sort of program entity a declaration names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    /// A package or module.
    Package,
    /// A named type.
    Type,
    /// A member of a type, written `Type::member`.
    Member,
}

impl DeclarationKind {
    /// Lowercase label used in diagnostics and reports.
    pub fn label(&self) -> &'static str {
        match self {
            DeclarationKind::Package => "package",
            DeclarationKind::Type => "type",
            DeclarationKind::Member => "member",
        }
    }
}

/// Handle to a program declaration provided by the host declaration model.
///
/// The engine treats declarations as opaque: it only relies on identity,
/// equality, and hashing to key batches and route work to stages. The
/// underlying program entity is owned by the host for the lifetime of the
/// session; a handle is just `(kind, name)` and is cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Declaration {
    kind: DeclarationKind,
    name: String,
}

impl Declaration {
    /// Create a declaration handle.
    pub fn new(kind: DeclarationKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Handle for a package declaration.
    pub fn for_package(name: impl Into<String>) -> Self {
        Self::new(DeclarationKind::Package, name)
    }

    /// Handle for a type declaration.
    pub fn for_type(name: impl Into<String>) -> Self {
        Self::new(DeclarationKind::Type, name)
    }

    /// Handle for a member declaration (`Type::member`).
    pub fn for_member(name: impl Into<String>) -> Self {
        Self::new(DeclarationKind::Member, name)
    }

    pub fn kind(&self) -> DeclarationKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for Declaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind.label(), self.name)
    }
}
