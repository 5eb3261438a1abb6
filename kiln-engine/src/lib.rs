//! Pass-based dispatch engine for marker-driven code generation.
//!
//! This crate provides a [`Coordinator`] that drives repeated passes over a
//! program's declarations. Each pass it:
//!
//! - Queries the [`MarkerRegistry`] for every marker kind any stage cares about
//! - Fetches matching declarations from the host [`DeclarationModel`]
//! - Folds them into a [`PassBatch`] (marker kind → set of declarations)
//! - Dispatches each registered [`Stage`], in registration order, with the
//!   sub-batch restricted to the kinds that stage supports
//!
//! Stages share data within and across passes through the append-only
//! [`ArtifactStore`], and emit generated units through a [`CodeSink`].
//! Failures are collected as [`Diagnostic`]s; a failing stage never blocks
//! its siblings.
//!
//! # Example
//!
//! ```ignore
//! use kiln_engine::{Coordinator, InMemoryModel, MemorySink};
//!
//! let mut coordinator = Coordinator::new(model, MemorySink::new())
//!     .stage(AdapterStage::new())
//!     .stage(FactoryStage::new());
//!
//! // Host-driven rounds: non-final passes do the work...
//! coordinator.on_pass(false);
//! // ...the final pass only verifies nothing was left pending.
//! coordinator.on_pass(true);
//!
//! for diag in coordinator.diagnostics() {
//!     eprintln!("{diag}");
//! }
//! ```

mod artifact;
mod batch;
mod coordinator;
mod diagnostic;
mod model;
mod registry;
mod sink;
mod stage;

pub use artifact::ArtifactStore;
pub use batch::PassBatch;
pub use coordinator::{Coordinator, PassSummary};
pub use diagnostic::{Diagnostic, Severity};
pub use model::{DeclarationModel, InMemoryModel};
pub use registry::MarkerRegistry;
pub use sink::{CodeSink, MemorySink};
pub use stage::{Stage, StageContext, StageOutcome};
