//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from manifest validation and a dry-run session.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    /// Session name from the manifest.
    pub session: String,
    /// Number of declarations in the manifest.
    pub declaration_count: usize,
    /// Marker kinds referenced by the manifest.
    pub markers: Vec<String>,
    /// Units the session would generate.
    pub units: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Info messages.
    pub infos: Vec<String>,
}

impl CheckReport {
    /// Whether the check passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for error in &self.errors {
            out.warning(&format!("error: {}", error));
        }

        for warning in &self.warnings {
            out.warning(&format!("warning: {}", warning));
        }

        for info in &self.infos {
            out.preformatted(&format!("info: {}", info));
        }

        if !self.warnings.is_empty() || !self.errors.is_empty() {
            out.newline();
        }

        if self.is_valid() {
            out.preformatted(&format!("✓ {} is valid", self.config_path.display()));
            out.newline();
        }

        out.key_value("Session", &self.session);
        out.key_value("Declarations", &self.declaration_count.to_string());
        out.key_value("Markers", &self.markers.join(", "));

        if !self.units.is_empty() {
            out.newline();
            out.section(&format!("Would generate {} unit(s)", self.units.len()));
            for unit in &self.units {
                out.list_item(unit);
            }
        }
    }
}
