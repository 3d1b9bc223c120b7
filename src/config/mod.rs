//! Configuration module for todos-rs
//!
//! Settings come from a YAML file, then `TODOS_*` environment variables,
//! then command line flags.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_VAR: &str = "TODOS_SETTINGS_PATH";

/// Default places to look for a settings file, in order
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("todos-rs/settings.yml"));
    }
    paths
}

/// Load settings from `explicit`, `TODOS_SETTINGS_PATH` or the default
/// paths, falling back to defaults. Environment overrides are applied last.
///
/// Returns the file the settings came from, if any. Runs before logging is
/// set up, so it does not log.
pub fn load(explicit: Option<&Path>) -> Result<(Settings, Option<PathBuf>)> {
    let named = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var(SETTINGS_PATH_VAR).ok().map(PathBuf::from));

    // An explicitly named file must exist; default paths are optional
    let source = named.or_else(|| default_paths().into_iter().find(|p| p.exists()));

    let mut settings = match &source {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    settings.merge_env();

    Ok((settings, source))
}
