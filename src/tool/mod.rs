// src/tool/mod.rs

//! Tool resolution.
//!
//! - [`form`] describes the concrete ways a tool can be invoked.
//! - [`resolver`] probes candidates once and pins the chosen form for the
//!   lifetime of the resolver.

pub mod form;
pub mod resolver;

pub use form::InvocationForm;
pub use resolver::{
    CommandProbe, ProbeVerdict, ToolProbe, ToolResolver, resolve_form, resolve_with_probe,
};
