//! Fire command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from a full generation session.
#[derive(Debug)]
pub struct FireReport {
    /// Session name from the manifest.
    pub session: String,
    /// Output directory units were written into.
    pub out_dir: PathBuf,
    /// Number of non-final passes the session took.
    pub passes: usize,
    /// Files written, in first-write order.
    pub files: Vec<PathBuf>,
    /// Error messages.
    pub errors: Vec<String>,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Info messages.
    pub infos: Vec<String>,
}

impl FireReport {
    /// Whether the session completed without error diagnostics.
    pub fn succeeded(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Report for FireReport {
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

        out.preformatted(&format!(
            "session '{}' completed in {} pass{}",
            self.session,
            self.passes,
            if self.passes == 1 { "" } else { "es" }
        ));
        out.newline();

        out.section(&format!("Generated into {}", self.out_dir.display()));
        for file in &self.files {
            out.added_item(&file.display().to_string());
        }
    }
}
