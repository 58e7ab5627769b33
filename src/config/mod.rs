// src/config/mod.rs

//! Configuration loading and validation for the `procout` binary.
//!
//! - `model.rs`: TOML-backed data model (raw and validated).
//! - `loader.rs`: reading a config file from disk.
//! - `validate.rs`: `RawConfigFile` -> `ConfigFile`, duration parsing.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_or_default};
pub use model::{ConfigFile, OutputSection, RawConfigFile, RawRunSection, RunSection};
pub use validate::{parse_duration, parse_timeout};
