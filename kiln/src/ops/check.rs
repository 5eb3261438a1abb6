//! Check operation - dry-run a session without writing files.

use std::path::Path;

use eyre::Result;
use kiln_engine::{Coordinator, MemorySink};
use kiln_manifest::Schema;
use kiln_stages::{AdapterStage, FactoryStage};

use super::{build_model, fire::drive, split_diagnostics};
use crate::reports::CheckReport;

/// Execute the check operation.
///
/// Runs the same session as `fire`, but against an in-memory sink: the
/// manifest is validated, every stage runs, and nothing touches disk.
pub fn check(schema: &Schema, config_path: &Path) -> Result<CheckReport> {
    let coordinator = Coordinator::new(build_model(schema), MemorySink::new())
        .stage(AdapterStage::new())
        .stage(FactoryStage::new());

    let (coordinator, _) = drive(coordinator);

    let (errors, warnings, infos) = split_diagnostics(coordinator.diagnostics());
    Ok(CheckReport {
        config_path: config_path.to_path_buf(),
        session: schema.session.name.clone(),
        declaration_count: schema.declarations.len(),
        markers: schema
            .referenced_markers()
            .iter()
            .map(|kind| kind.name().to_string())
            .collect(),
        units: coordinator
            .sink()
            .units()
            .iter()
            .map(|unit| unit.qualified_name.clone())
            .collect(),
        errors,
        warnings,
        infos,
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_check_previews_units_without_writing() {
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

        let report = check(&schema, Path::new("kiln.toml")).unwrap();

        assert!(report.is_valid());
        assert_eq!(report.units, ["FooAdapter"]);
        assert_eq!(report.declaration_count, 1);
    }
}
