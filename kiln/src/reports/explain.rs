//! Explain command report data structures.

use serde::Serialize;

use super::output::{Output, Report};

/// Report describing the resolved session.
#[derive(Debug, Clone, Serialize)]
pub struct ExplainReport {
    /// Session name from the manifest.
    pub session: String,
    /// Optional session description.
    pub description: Option<String>,
    /// Declarations visible to the session.
    pub declarations: Vec<ExplainDeclaration>,
    /// Registered stages, in dispatch order.
    pub stages: Vec<ExplainStage>,
    /// Union of marker kinds the stages support.
    pub supported_markers: Vec<String>,
}

/// One declaration as the session sees it.
#[derive(Debug, Clone, Serialize)]
pub struct ExplainDeclaration {
    pub kind: String,
    pub name: String,
    pub markers: Vec<String>,
}

/// One registered stage.
#[derive(Debug, Clone, Serialize)]
pub struct ExplainStage {
    pub name: String,
    pub markers: Vec<String>,
}

impl Report for ExplainReport {
    fn render(&self, out: &mut dyn Output) {
        out.key_value("Session", &self.session);
        if let Some(description) = &self.description {
            out.key_value("Description", description);
        }
        out.newline();

        out.section(&format!("Declarations ({})", self.declarations.len()));
        for declaration in &self.declarations {
            out.list_item(&format!(
                "{} {} [{}]",
                declaration.kind,
                declaration.name,
                declaration.markers.join(", ")
            ));
        }
        out.newline();

        out.section("Stages (dispatch order)");
        for stage in &self.stages {
            out.list_item(&format!("{} [{}]", stage.name, stage.markers.join(", ")));
        }
        out.newline();

        out.key_value("Supported markers", &self.supported_markers.join(", "));
    }
}
