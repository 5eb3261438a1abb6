//! Adapter generation stage.

use indexmap::IndexSet;
use kiln_engine::{Diagnostic, PassBatch, Stage, StageContext, StageOutcome};
use kiln_model::{AdapterDescriptor, Declaration, DeclarationKind, MarkerKind};

use crate::{markers, render};

/// Generates one serialization adapter per `serializable` type declaration.
///
/// The stage owns its cross-pass bookkeeping: a declaration that keeps
/// matching the marker in later passes is handed in again, and must not
/// produce a second unit or a second descriptor. Declarations that were
/// rejected are remembered too, so one bad declaration surfaces one
/// diagnostic rather than one per pass.
#[derive(Debug, Default)]
pub struct AdapterStage {
    emitted: IndexSet<Declaration>,
    rejected: IndexSet<Declaration>,
}

impl AdapterStage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stage for AdapterStage {
    fn name(&self) -> &'static str {
        "adapters"
    }

    fn supported_markers(&self) -> IndexSet<MarkerKind> {
        [markers::serializable()].into_iter().collect()
    }

    fn run(&mut self, batch: &PassBatch, cx: &mut StageContext<'_>) -> StageOutcome {
        let Some(declarations) = batch.declarations(&markers::serializable()) else {
            return StageOutcome::Completed;
        };

        let mut diagnostics = Vec::new();
        for declaration in declarations {
            if self.emitted.contains(declaration) || self.rejected.contains(declaration) {
                continue;
            }
            if declaration.kind() != DeclarationKind::Type {
                // Abandon this declaration; its siblings still process.
                diagnostics.push(
                    Diagnostic::error(
                        self.name(),
                        format!("a serialization adapter requires a type declaration, found {declaration}"),
                    )
                    .at(declaration.clone())
                    .for_marker(markers::serializable()),
                );
                self.rejected.insert(declaration.clone());
                continue;
            }

            let unit = render::adapter_unit(declaration);
            let descriptor = AdapterDescriptor {
                declaration: declaration.clone(),
                adapter_name: unit.qualified_name.clone(),
                unit_name: unit.qualified_name.clone(),
            };
            if let Err(report) = cx.sink.write_unit(unit) {
                diagnostics.push(
                    Diagnostic::error(
                        self.name(),
                        format!("failed to emit adapter: {report:#}"),
                    )
                    .at(declaration.clone())
                    .for_marker(markers::serializable()),
                );
                self.rejected.insert(declaration.clone());
                continue;
            }
            cx.artifacts.append(descriptor);
            self.emitted.insert(declaration.clone());
        }

        if diagnostics.is_empty() {
            StageOutcome::Completed
        } else {
            StageOutcome::CompletedWithDiagnostics(diagnostics)
        }
    }
}
