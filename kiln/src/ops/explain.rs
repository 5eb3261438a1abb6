//! Explain operation - describe the resolved session.

use kiln_engine::Stage;
use kiln_manifest::Schema;
use kiln_stages::{AdapterStage, FactoryStage};

use crate::reports::{ExplainDeclaration, ExplainReport, ExplainStage};

/// Execute the explain operation.
///
/// Describes what a session over this manifest would look like: the
/// declarations and their markers, the registered stages in dispatch
/// order, and the marker union the processor reports to the host.
pub fn explain(schema: &Schema) -> ExplainReport {
    let stages = [
        stage_entry(&AdapterStage::new()),
        stage_entry(&FactoryStage::new()),
    ];

    let supported: Vec<String> = stages
        .iter()
        .flat_map(|stage| stage.markers.iter().cloned())
        .fold(Vec::new(), |mut kinds, kind| {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
            kinds
        });

    ExplainReport {
        session: schema.session.name.clone(),
        description: schema.session.description.clone(),
        declarations: schema
            .declarations
            .iter()
            .map(|entry| ExplainDeclaration {
                kind: entry.kind.label().to_string(),
                name: entry.name.clone(),
                markers: entry.markers.clone(),
            })
            .collect(),
        stages: stages.to_vec(),
        supported_markers: supported,
    }
}

fn stage_entry(stage: &dyn Stage) -> ExplainStage {
    ExplainStage {
        name: stage.name().to_string(),
        markers: stage
            .supported_markers()
            .iter()
            .map(|kind| kind.name().to_string())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explain_lists_stages_in_dispatch_order() {
        let schema = kiln_manifest::parse_str(
            r#"
            [session]
            name = "demo"

            [[declarations]]
            kind = "type"
            name = "Foo"
            markers = ["serializable"]
        "#,
        )
        .unwrap();

        let report = explain(&schema);

        let names: Vec<_> = report.stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["adapters", "factory"]);
        assert_eq!(
            report.supported_markers,
            ["serializable", "serializable-factory"]
        );
    }
}
