//! Pass coordinator.

use indexmap::IndexSet;
use kiln_model::MarkerKind;

use crate::{
    ArtifactStore, CodeSink, DeclarationModel, Diagnostic, MarkerRegistry, PassBatch, Stage,
    StageContext, StageOutcome,
};

/// Diagnostic context for conditions the coordinator itself detects.
const COORDINATOR: &str = "coordinator";

/// What the coordinator reports back to the host after each pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    /// Whether this processor claims the dispatched markers exclusively.
    /// Always `false`: unrelated tooling may observe the same declarations.
    pub claimed: bool,
    /// Number of stages invoked this pass.
    pub stages_invoked: usize,
    /// Number of `(marker, declaration)` pairings seen this pass.
    pub declarations_seen: usize,
}

impl PassSummary {
    fn idle() -> Self {
        Self {
            claimed: false,
            stages_invoked: 0,
            declarations_seen: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Active,
    Final,
}

/// Drives repeated passes over the program's declarations.
///
/// Constructed once per session, then invoked by the host once per
/// compilation round through [`on_pass`]. On every non-final pass the
/// coordinator queries the registry, fetches matching declarations from the
/// model, partitions them into a [`PassBatch`], and routes each partition to
/// the stages that declared interest — in registration order, each with only
/// its relevant subset. On the final pass no new work is started; deferred
/// work must already have completed.
///
/// The whole session is single-threaded and synchronous: stages never run
/// concurrently, and passes never overlap. The shared artifact store and
/// declaration model rely on that strict sequential ordering.
///
/// [`on_pass`]: Coordinator::on_pass
pub struct Coordinator<M, S> {
    model: M,
    sink: S,
    registry: MarkerRegistry,
    stages: Vec<Box<dyn Stage>>,
    artifacts: ArtifactStore,
    diagnostics: Vec<Diagnostic>,
    state: SessionState,
}

impl<M: DeclarationModel, S: CodeSink> Coordinator<M, S> {
    /// Create a coordinator over the host's declaration model and code sink.
    pub fn new(model: M, sink: S) -> Self {
        Self {
            model,
            sink,
            registry: MarkerRegistry::new(),
            stages: Vec::new(),
            artifacts: ArtifactStore::new(),
            diagnostics: Vec::new(),
            state: SessionState::Active,
        }
    }

    /// Register a stage. Registration order is dispatch order, and dispatch
    /// order is what later stages' artifact visibility depends on.
    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.registry.register(stage.supported_markers());
        self.stages.push(Box::new(stage));
        self
    }

    /// The union of marker kinds the registered stages support. The host
    /// queries this once at session start to decide which declarations to
    /// supply.
    pub fn supported_markers(&self) -> &IndexSet<MarkerKind> {
        self.registry.all_kinds()
    }

    /// Run one compilation round.
    pub fn on_pass(&mut self, final_pass: bool) -> PassSummary {
        if self.state == SessionState::Final {
            return PassSummary::idle();
        }
        if final_pass {
            self.state = SessionState::Final;
            for stage in &self.stages {
                if stage.pending_work() {
                    self.diagnostics.push(Diagnostic::error(
                        COORDINATOR,
                        format!(
                            "stage '{}' still reports pending deferred work at the final pass",
                            stage.name()
                        ),
                    ));
                }
            }
            return PassSummary::idle();
        }

        let batch = self.collect_batch();
        if batch.is_empty() {
            return PassSummary::idle();
        }

        let mut stages_invoked = 0;
        for stage in &mut self.stages {
            let sub_batch = batch.restricted_to(&stage.supported_markers());
            if sub_batch.is_empty() {
                continue;
            }
            stages_invoked += 1;
            let mut cx = StageContext {
                artifacts: &mut self.artifacts,
                sink: &mut self.sink,
            };
            match stage.run(&sub_batch, &mut cx) {
                StageOutcome::Completed => {}
                StageOutcome::CompletedWithDiagnostics(diagnostics) => {
                    self.diagnostics.extend(diagnostics);
                }
                // A failing stage is recorded and skipped; its siblings
                // still run this pass.
                StageOutcome::Fatal(report) => {
                    self.diagnostics.push(Diagnostic::error(
                        stage.name(),
                        format!("stage failed: {report:#}"),
                    ));
                }
            }
        }

        PassSummary {
            claimed: false,
            stages_invoked,
            declarations_seen: batch.declaration_count(),
        }
    }

    fn collect_batch(&self) -> PassBatch {
        let mut batch = PassBatch::new();
        for kind in self.registry.all_kinds() {
            batch.insert(kind.clone(), self.model.declarations_annotated_with(kind));
        }
        batch
    }

    /// True once the host has signalled the final pass.
    pub fn is_final(&self) -> bool {
        self.state == SessionState::Final
    }

    /// Artifacts accumulated so far this session.
    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Diagnostics accumulated so far this session.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether any error-severity diagnostic has been recorded. Hosts are
    /// expected to fail the overall compilation when this is true.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    /// The code sink, for host-side inspection after passes.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The declaration model, for hosts that grow it between passes.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use eyre::eyre;
    use kiln_model::{AdapterDescriptor, Declaration, GeneratedUnit};

    use super::*;
    use crate::{InMemoryModel, MemorySink};

    /// Scripted stage that records what it observes on each invocation.
    struct ScriptedStage {
        name: &'static str,
        markers: Vec<MarkerKind>,
        log: Rc<RefCell<Vec<String>>>,
        fail_with: Option<&'static str>,
        pending: bool,
    }

    impl ScriptedStage {
        fn new(name: &'static str, markers: &[&str], log: Rc<RefCell<Vec<String>>>) -> Self {
            Self {
                name,
                markers: markers.iter().map(|m| MarkerKind::new(*m)).collect(),
                log,
                fail_with: None,
                pending: false,
            }
        }

        fn failing(mut self, message: &'static str) -> Self {
            self.fail_with = Some(message);
            self
        }

        fn with_pending_work(mut self) -> Self {
            self.pending = true;
            self
        }
    }

    impl Stage for ScriptedStage {
        fn name(&self) -> &'static str {
            self.name
        }

        fn supported_markers(&self) -> IndexSet<MarkerKind> {
            self.markers.iter().cloned().collect()
        }

        fn run(&mut self, batch: &PassBatch, cx: &mut StageContext<'_>) -> StageOutcome {
            let mut seen: Vec<String> = Vec::new();
            for (kind, declarations) in batch.iter() {
                for declaration in declarations {
                    seen.push(format!("{kind}:{}", declaration.name()));
                }
            }
            seen.sort();
            self.log.borrow_mut().push(format!(
                "{} batch=[{}] artifacts={}",
                self.name,
                seen.join(","),
                cx.artifacts.len()
            ));

            if let Some(message) = self.fail_with {
                return StageOutcome::Fatal(eyre!(message));
            }

            // Produce one artifact per declaration seen, so later stages
            // (and later passes) can observe this invocation.
            for (_, declarations) in batch.iter() {
                for declaration in declarations {
                    cx.artifacts.append(AdapterDescriptor {
                        declaration: declaration.clone(),
                        adapter_name: format!("{}Adapter", declaration.name()),
                        unit_name: format!("{}Adapter", declaration.name()),
                    });
                }
            }
            StageOutcome::Completed
        }

        fn pending_work(&self) -> bool {
            self.pending
        }
    }

    fn serializable() -> MarkerKind {
        MarkerKind::new("serializable")
    }

    fn factory() -> MarkerKind {
        MarkerKind::new("serializable-factory")
    }

    fn model_with(entries: &[(&MarkerKind, &str)]) -> InMemoryModel {
        let mut model = InMemoryModel::new();
        for (kind, name) in entries {
            model.annotate((*kind).clone(), Declaration::for_type(*name));
        }
        model
    }

    #[test]
    fn test_batch_matches_model_exactly() {
        let model = model_with(&[
            (&serializable(), "Foo"),
            (&serializable(), "Bar"),
            (&factory(), "Factory"),
        ]);
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut coordinator = Coordinator::new(model, MemorySink::new()).stage(
            ScriptedStage::new("s1", &["serializable", "serializable-factory"], log.clone()),
        );

        let summary = coordinator.on_pass(false);

        assert_eq!(summary.declarations_seen, 3);
        assert_eq!(
            log.borrow().as_slice(),
            [
                "s1 batch=[serializable-factory:Factory,serializable:Bar,serializable:Foo] artifacts=0"
            ]
        );
    }

    #[test]
    fn test_stage_only_sees_supported_kinds() {
        let model = model_with(&[(&serializable(), "Foo"), (&factory(), "Factory")]);
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut coordinator = Coordinator::new(model, MemorySink::new())
            .stage(ScriptedStage::new("adapters", &["serializable"], log.clone()));

        coordinator.on_pass(false);

        // The factory declaration is in the pass batch but never reaches a
        // stage that didn't declare the kind.
        assert_eq!(
            log.borrow().as_slice(),
            ["adapters batch=[serializable:Foo] artifacts=0"]
        );
    }

    #[test]
    fn test_dispatch_follows_registration_order_every_pass() {
        let model = model_with(&[(&serializable(), "Foo")]);
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut coordinator = Coordinator::new(model, MemorySink::new())
            .stage(ScriptedStage::new("s1", &["serializable"], log.clone()))
            .stage(ScriptedStage::new("s2", &["serializable"], log.clone()));

        coordinator.on_pass(false);
        coordinator.on_pass(false);

        let order: Vec<String> = log
            .borrow()
            .iter()
            .map(|line| line.split_whitespace().next().unwrap().to_string())
            .collect();
        assert_eq!(order, ["s1", "s2", "s1", "s2"]);
    }

    #[test]
    fn test_artifacts_visible_same_pass_and_next_pass() {
        let model = model_with(&[(&serializable(), "Foo"), (&factory(), "Factory")]);
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut coordinator = Coordinator::new(model, MemorySink::new())
            .stage(ScriptedStage::new("s1", &["serializable"], log.clone()))
            .stage(ScriptedStage::new("s2", &["serializable-factory"], log.clone()));

        coordinator.on_pass(false);
        // Same pass: s2 sees the artifact s1 appended moments earlier.
        assert_eq!(
            log.borrow()[1],
            "s2 batch=[serializable-factory:Factory] artifacts=1"
        );

        coordinator.on_pass(false);
        // Next pass: the store was not reset; s1 sees both earlier artifacts.
        assert_eq!(log.borrow()[2], "s1 batch=[serializable:Foo] artifacts=2");
    }

    #[test]
    fn test_final_pass_stops_all_dispatch() {
        let model = model_with(&[(&serializable(), "Foo")]);
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut coordinator = Coordinator::new(model, MemorySink::new())
            .stage(ScriptedStage::new("s1", &["serializable"], log.clone()));

        let summary = coordinator.on_pass(true);
        assert_eq!(summary.stages_invoked, 0);
        assert!(coordinator.is_final());

        // Even a non-final invocation after the final pass is a no-op.
        coordinator.on_pass(false);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_pending_work_at_final_pass_is_an_error_diagnostic() {
        let model = model_with(&[(&serializable(), "Foo")]);
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut coordinator = Coordinator::new(model, MemorySink::new()).stage(
            ScriptedStage::new("s1", &["serializable"], log.clone()).with_pending_work(),
        );

        coordinator.on_pass(false);
        assert!(!coordinator.has_errors());

        coordinator.on_pass(true);
        assert!(coordinator.has_errors());
        let diagnostic = &coordinator.diagnostics()[0];
        assert_eq!(diagnostic.stage, "coordinator");
        assert!(diagnostic.message.contains("s1"));
        assert!(diagnostic.message.contains("pending deferred work"));
    }

    #[test]
    fn test_empty_batch_skips_dispatch() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut coordinator = Coordinator::new(InMemoryModel::new(), MemorySink::new())
            .stage(ScriptedStage::new("s1", &["serializable"], log.clone()));

        let summary = coordinator.on_pass(false);

        assert_eq!(summary.stages_invoked, 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_kind_with_no_matches_causes_no_dispatch_for_it() {
        // `serializable` matches, `serializable-factory` doesn't: the
        // factory-only stage must not be invoked with zero work.
        let model = model_with(&[(&serializable(), "Foo")]);
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut coordinator = Coordinator::new(model, MemorySink::new())
            .stage(ScriptedStage::new("adapters", &["serializable"], log.clone()))
            .stage(ScriptedStage::new("factory", &["serializable-factory"], log.clone()));

        let summary = coordinator.on_pass(false);

        assert_eq!(summary.stages_invoked, 1);
        assert_eq!(log.borrow().len(), 1);
        assert!(log.borrow()[0].starts_with("adapters"));
    }

    #[test]
    fn test_fatal_stage_does_not_block_siblings() {
        let model = model_with(&[(&serializable(), "Foo")]);
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut coordinator = Coordinator::new(model, MemorySink::new())
            .stage(ScriptedStage::new("s1", &["serializable"], log.clone()).failing("broken"))
            .stage(ScriptedStage::new("s2", &["serializable"], log.clone()));

        let summary = coordinator.on_pass(false);

        assert_eq!(summary.stages_invoked, 2);
        assert!(log.borrow()[1].starts_with("s2"));
        assert!(coordinator.has_errors());
        assert_eq!(coordinator.diagnostics()[0].stage, "s1");
        assert!(coordinator.diagnostics()[0].message.contains("broken"));
    }

    #[test]
    fn test_never_claims_markers() {
        let model = model_with(&[(&serializable(), "Foo")]);
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut coordinator = Coordinator::new(model, MemorySink::new())
            .stage(ScriptedStage::new("s1", &["serializable"], log.clone()));

        assert!(!coordinator.on_pass(false).claimed);
        assert!(!coordinator.on_pass(true).claimed);
    }

    #[test]
    fn test_supported_markers_is_union_across_stages() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let coordinator = Coordinator::new(InMemoryModel::new(), MemorySink::new())
            .stage(ScriptedStage::new("s1", &["serializable"], log.clone()))
            .stage(ScriptedStage::new(
                "s2",
                &["serializable", "serializable-factory"],
                log.clone(),
            ));

        let kinds: Vec<_> = coordinator
            .supported_markers()
            .iter()
            .map(|k| k.name())
            .collect();
        assert_eq!(kinds, ["serializable", "serializable-factory"]);
    }

    #[test]
    fn test_declarations_added_between_passes_are_picked_up() {
        let model = model_with(&[(&serializable(), "Foo")]);
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut coordinator = Coordinator::new(model, MemorySink::new())
            .stage(ScriptedStage::new("s1", &["serializable"], log.clone()));

        coordinator.on_pass(false);
        coordinator
            .model_mut()
            .annotate(serializable(), Declaration::for_type("Bar"));
        coordinator.on_pass(false);

        assert_eq!(
            log.borrow()[1],
            "s1 batch=[serializable:Bar,serializable:Foo] artifacts=1"
        );
    }

    /// Stage that writes one unit through the sink, to pin down the
    /// synchronous-emission contract.
    struct EmittingStage;

    impl Stage for EmittingStage {
        fn name(&self) -> &'static str {
            "emitter"
        }

        fn supported_markers(&self) -> IndexSet<MarkerKind> {
            [serializable()].into_iter().collect()
        }

        fn run(&mut self, batch: &PassBatch, cx: &mut StageContext<'_>) -> StageOutcome {
            for (_, declarations) in batch.iter() {
                for declaration in declarations {
                    let unit = GeneratedUnit::new(
                        format!("{}Adapter", declaration.name()),
                        "// generated",
                    );
                    if let Err(report) = cx.sink.write_unit(unit) {
                        return StageOutcome::Fatal(report);
                    }
                }
            }
            StageOutcome::Completed
        }
    }

    #[test]
    fn test_units_reach_the_sink() {
        let model = model_with(&[(&serializable(), "Foo")]);
        let mut coordinator = Coordinator::new(model, MemorySink::new()).stage(EmittingStage);

        coordinator.on_pass(false);

        assert_eq!(coordinator.sink().len(), 1);
        assert!(coordinator.sink().contents_of("FooAdapter").is_some());
    }
}
