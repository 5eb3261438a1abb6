//! Diagnostic types for the dispatch engine.
//!
//! This module provides types for collecting errors, warnings, and
//! informational messages during a generation session. Diagnostics carry
//! enough context (stage name, declaration, marker kind) to locate the
//! source construct responsible.

use kiln_model::{Declaration, MarkerKind};
use serde::Serialize;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    /// An error that is expected to fail the overall compilation.
    Error,
    /// A warning that doesn't prevent processing but should be addressed.
    Warning,
    /// Informational message about the session.
    Info,
}

impl Severity {
    /// Returns true if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns true if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A diagnostic message from a generation stage or the coordinator.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The stage (or `coordinator`) that produced this diagnostic.
    pub stage: String,
    /// The diagnostic message.
    pub message: String,
    /// The declaration the diagnostic is attached to, if any.
    pub declaration: Option<Declaration>,
    /// The marker kind being processed, if any.
    pub marker: Option<MarkerKind>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            stage: stage.into(),
            message: message.into(),
            declaration: None,
            marker: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            stage: stage.into(),
            message: message.into(),
            declaration: None,
            marker: None,
        }
    }

    /// Create a new info diagnostic.
    pub fn info(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            stage: stage.into(),
            message: message.into(),
            declaration: None,
            marker: None,
        }
    }

    /// Attach the offending declaration.
    pub fn at(mut self, declaration: Declaration) -> Self {
        self.declaration = Some(declaration);
        self
    }

    /// Attach the marker kind being processed.
    pub fn for_marker(mut self, marker: MarkerKind) -> Self {
        self.marker = Some(marker);
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(declaration) = &self.declaration {
            write!(f, " (at {declaration}")?;
            if let Some(marker) = &self.marker {
                write!(f, ", marker '{marker}'")?;
            }
            write!(f, ")")?;
        } else if let Some(marker) = &self.marker {
            write!(f, " (marker '{marker}')")?;
        }
        write!(f, " [{}]", self.stage)
    }
}
