//! Factory generation stage.

use indexmap::{IndexMap, IndexSet};
use kiln_engine::{Diagnostic, PassBatch, Stage, StageContext, StageOutcome};
use kiln_model::{Declaration, DeclarationKind, MarkerKind};

use crate::{markers, render};

/// Emits a registry factory covering every adapter generated so far.
///
/// This stage aggregates: it reads the descriptor snapshot other stages
/// populated and must therefore run after the adapter stage in registration
/// order. It records the store size at each emission and re-emits a factory
/// unit only when new descriptors have appeared since, replacing the
/// previous contents under the same unit name.
#[derive(Debug, Default)]
pub struct FactoryStage {
    emitted_at: IndexMap<Declaration, usize>,
    rejected: IndexSet<Declaration>,
}

impl FactoryStage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stage for FactoryStage {
    fn name(&self) -> &'static str {
        "factory"
    }

    fn supported_markers(&self) -> IndexSet<MarkerKind> {
        [markers::serializable_factory()].into_iter().collect()
    }

    fn run(&mut self, batch: &PassBatch, cx: &mut StageContext<'_>) -> StageOutcome {
        let Some(declarations) = batch.declarations(&markers::serializable_factory()) else {
            return StageOutcome::Completed;
        };

        let mut diagnostics = Vec::new();
        for declaration in declarations {
            if self.rejected.contains(declaration) {
                continue;
            }
            if declaration.kind() != DeclarationKind::Type {
                diagnostics.push(
                    Diagnostic::error(
                        self.name(),
                        format!("an adapter factory requires a type declaration, found {declaration}"),
                    )
                    .at(declaration.clone())
                    .for_marker(markers::serializable_factory()),
                );
                self.rejected.insert(declaration.clone());
                continue;
            }

            let seen = cx.artifacts.len();
            if self.emitted_at.get(declaration) == Some(&seen) {
                // Nothing new since the last emission for this factory.
                continue;
            }
            let unit = render::factory_unit(declaration, cx.artifacts.snapshot());
            if let Err(report) = cx.sink.write_unit(unit) {
                diagnostics.push(
                    Diagnostic::error(
                        self.name(),
                        format!("failed to emit factory: {report:#}"),
                    )
                    .at(declaration.clone())
                    .for_marker(markers::serializable_factory()),
                );
                continue;
            }
            self.emitted_at.insert(declaration.clone(), seen);
        }

        if diagnostics.is_empty() {
            StageOutcome::Completed
        } else {
            StageOutcome::CompletedWithDiagnostics(diagnostics)
        }
    }
}
