// src/config/mod.rs

//! Configuration loading and validation for toolrun.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate it into a retry policy and exec settings (`validate.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{
    ConfigFile, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, ExecSection, ExecSettings,
    RawConfigFile, RetrySection,
};
