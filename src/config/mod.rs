//! Configuration module for omnibar-rs
//!
//! Handles loading settings from YAML files and environment variables. The
//! controller takes a `Settings` reference at construction; there is no
//! global settings instance.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::Path;

/// Load settings from the first existing path, falling back to defaults.
/// Environment overrides apply in every case.
pub fn load_settings(paths: &[&Path]) -> Result<Settings> {
    let mut settings = match paths.iter().find(|p| p.exists()) {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    settings.merge_env();
    Ok(settings)
}
