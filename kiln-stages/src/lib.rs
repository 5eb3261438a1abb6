//! Built-in generation stages for the kiln code generator.
//!
//! Two stages ship with kiln, and their registration order matters: the
//! adapter stage runs first and records an [`AdapterDescriptor`] per
//! generated adapter, and the factory stage runs second, reading those
//! descriptors to emit a registry factory covering every adapter seen so
//! far in the session.
//!
//! [`AdapterDescriptor`]: kiln_model::AdapterDescriptor

mod adapters;
mod builder;
mod factory;
mod naming;

pub mod markers;
pub mod render;

pub use adapters::AdapterStage;
pub use builder::CodeBuilder;
pub use factory::FactoryStage;
pub use naming::{to_pascal_case, to_snake_case};
