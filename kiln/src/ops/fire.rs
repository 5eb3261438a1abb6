//! Fire operation - run a full generation session, writing units to disk.

use std::path::Path;

use eyre::Result;
use kiln_engine::{CodeSink, Coordinator, DeclarationModel};
use kiln_manifest::Schema;
use kiln_stages::{AdapterStage, FactoryStage};

use super::{build_model, split_diagnostics};
use crate::{reports::FireReport, sink::DirSink};

/// Upper bound on processing passes. A session that is still producing new
/// output at this point is feeding itself and will not converge.
const MAX_PASSES: usize = 16;

/// Execute the fire operation.
///
/// Drives the compiler-round loop over the manifest's declarations:
/// repeated non-final passes until a pass produces nothing new, then the
/// final pass that lets the coordinator verify no work was left pending.
pub fn fire(schema: &Schema, out_dir: &Path) -> Result<FireReport> {
    let coordinator = Coordinator::new(build_model(schema), DirSink::new(out_dir))
        .stage(AdapterStage::new())
        .stage(FactoryStage::new());

    let (coordinator, passes) = drive(coordinator);

    let (errors, warnings, infos) = split_diagnostics(coordinator.diagnostics());
    Ok(FireReport {
        session: schema.session.name.clone(),
        out_dir: out_dir.to_path_buf(),
        passes,
        files: coordinator.sink().written().to_vec(),
        errors,
        warnings,
        infos,
    })
}

/// Run non-final passes to a fixpoint, then the final pass.
pub(crate) fn drive<M, S>(mut coordinator: Coordinator<M, S>) -> (Coordinator<M, S>, usize)
where
    M: DeclarationModel,
    S: CodeSink + SinkProgress,
{
    let mut passes = 0;
    loop {
        let written_before = coordinator.sink().units_written();
        let artifacts_before = coordinator.artifacts().len();

        let summary = coordinator.on_pass(false);
        passes += 1;

        let grew = coordinator.sink().units_written() > written_before
            || coordinator.artifacts().len() > artifacts_before;
        if summary.stages_invoked == 0 || !grew || passes >= MAX_PASSES {
            break;
        }
    }
    coordinator.on_pass(true);
    (coordinator, passes)
}

/// Progress measure the drive loop uses to detect a fixpoint.
pub(crate) trait SinkProgress {
    fn units_written(&self) -> usize;
}

impl SinkProgress for DirSink {
    fn units_written(&self) -> usize {
        self.written().len()
    }
}

impl SinkProgress for kiln_engine::MemorySink {
    fn units_written(&self) -> usize {
        self.len()
    }
}
