// src/tools/mod.rs

//! Thin per-tool glue on top of the execution core.

pub mod compose;
pub mod docker;
pub mod packer;

pub use compose::{Compose, ComposeOptions, compose_candidates, compose_operation};
pub use docker::Docker;
pub use packer::{Packer, PackerOptions, default_packer_policy, packer_operation};
