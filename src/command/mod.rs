// src/command/mod.rs

//! Command descriptions.
//!
//! - [`spec`] holds the immutable [`CommandSpec`] handed to the executor.
//! - [`builder`] assembles a spec from a logical [`Operation`], a resolved
//!   invocation form and a namespace.
//! - [`sink`] defines where streamed child output is logged.

pub mod builder;
pub mod sink;
pub mod spec;

pub use builder::Operation;
pub use sink::{LogSink, MemorySink, NullSink, SharedSink, SinkLine, TracingSink, default_sink};
pub use spec::{CommandSpec, CommandSpecBuilder};
