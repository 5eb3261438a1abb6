//! Pure operations behind the CLI commands.
//!
//! Each operation drives a generation session (or inspects a manifest) and
//! returns a report struct; rendering is left to the reports layer.

mod check;
mod explain;
mod fire;

pub use check::check;
pub use explain::explain;
pub use fire::fire;

use kiln_engine::{Diagnostic, Severity};
use kiln_manifest::Schema;

/// Build the in-memory declaration model the manifest describes.
pub(crate) fn build_model(schema: &Schema) -> kiln_engine::InMemoryModel {
    let mut model = kiln_engine::InMemoryModel::new();
    for (declaration, kind) in schema.annotations() {
        model.annotate(kind, declaration);
    }
    model
}

/// Split session diagnostics into error, warning, and info messages.
pub(crate) fn split_diagnostics(
    diagnostics: &[Diagnostic],
) -> (Vec<String>, Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut infos = Vec::new();

    for diagnostic in diagnostics {
        let mut message = diagnostic.message.clone();
        if let Some(declaration) = &diagnostic.declaration {
            message.push_str(&format!("\n  --> {declaration}"));
        }

        match diagnostic.severity {
            Severity::Error => errors.push(message),
            Severity::Warning => warnings.push(message),
            Severity::Info => infos.push(message),
        }
    }

    (errors, warnings, infos)
}
