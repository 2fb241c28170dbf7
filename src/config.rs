//! Layered configuration.
//!
//! Built-in defaults, then the user config
//! (`<config dir>/test-architect/config.toml`), then the project config
//! (`.test-architect.toml` in the project root, or `--config`). Command
//! line flags are applied on top by the caller.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::detectors::framework::TestFramework;
use crate::error::{Error, Result};

pub const PROJECT_FILE: &str = ".test-architect.toml";

/// Which coverage subsections a generated test group contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coverage {
    pub happy_path: bool,
    pub edge_cases: bool,
    pub error_handling: bool,
    pub integration: bool,
}

impl Default for Coverage {
    fn default() -> Self {
        Self {
            happy_path: true,
            edge_cases: true,
            error_handling: true,
            integration: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Skips detection when set.
    pub framework: Option<TestFramework>,
    pub coverage: Coverage,
}

/* ---------- on-disk shape: every key optional ---------- */

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    framework: Option<TestFramework>,
    coverage: Option<FileCoverage>,
}

#[derive(Debug, Default, Deserialize)]
struct FileCoverage {
    happy_path: Option<bool>,
    edge_cases: Option<bool>,
    error_handling: Option<bool>,
    integration: Option<bool>,
}

impl Config {
    /// Load user and project layers. `explicit` replaces the project file
    /// and, unlike discovered files, must exist and parse.
    pub fn load(project_root: &Path, explicit: Option<&Path>) -> Result<Config> {
        let mut cfg = Config::default();

        if let Some(path) = user_config_path() {
            if let Some(layer) = read_discovered(&path) {
                cfg.apply(layer);
            }
        }

        match explicit {
            Some(path) => cfg.apply(read_explicit(path)?),
            None => {
                if let Some(layer) = read_discovered(&project_root.join(PROJECT_FILE)) {
                    cfg.apply(layer);
                }
            }
        }

        debug!(?cfg, "resolved config");
        Ok(cfg)
    }

    fn apply(&mut self, layer: FileConfig) {
        if layer.framework.is_some() {
            self.framework = layer.framework;
        }
        if let Some(c) = layer.coverage {
            let cov = &mut self.coverage;
            cov.happy_path = c.happy_path.unwrap_or(cov.happy_path);
            cov.edge_cases = c.edge_cases.unwrap_or(cov.edge_cases);
            cov.error_handling = c.error_handling.unwrap_or(cov.error_handling);
            cov.integration = c.integration.unwrap_or(cov.integration);
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    let mut dir = dirs::config_dir()?;
    dir.push("test-architect");
    dir.push("config.toml");
    Some(dir)
}

/// Missing files are silent; broken ones are reported and skipped.
fn read_discovered(path: &Path) -> Option<FileConfig> {
    let raw = fs::read_to_string(path).ok()?;
    match toml::from_str(&raw) {
        Ok(layer) => {
            debug!(path = %path.display(), "loaded config");
            Some(layer)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring invalid config");
            None
        }
    }
}

fn read_explicit(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::Usage(format!("cannot read config {}: {e}", path.display())))?;
    toml::from_str(&raw).map_err(|source| Error::Config {
        path: path.to_path_buf(),
        source,
    })
}
