// src/config/mod.rs

//! Configuration loading and validation for camus.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate value ranges (`validate.rs`).
//! - Merge config values and CLI flags into `Settings` (`settings.rs`).

pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_raw_or_default};
pub use model::{CommandSection, ConfigFile, RawConfigFile, WatchSection};
pub use settings::{apply_overrides, Settings};
