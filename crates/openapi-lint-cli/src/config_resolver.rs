//! Per-target configuration lookup.
//!
//! Every path given to `validate` is matched to its own configuration:
//!
//! 1. `--config` flag, applied to every target
//! 2. `openapi-lint.toml` or `.openapi-lint.toml` in the target's directory
//!    (the parent directory for a file target)
//! 3. `config.toml` in `$OPENAPI_LINT_CONFIG_DIR` or `~/.openapi-lint/`
//! 4. Built-in defaults
//!
//! Lookups and parsed files are cached, so targets sharing a project reuse
//! one [`Config`].

use anyhow::{Context, Result};
use openapi_lint_core::Config;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Where a target's configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConfigSource {
    /// The `--config` flag.
    Explicit(PathBuf),
    /// A config file in the target's project directory.
    Project(PathBuf),
    /// The user-level config file.
    Global(PathBuf),
    /// No file; built-in defaults.
    Default,
}

impl ConfigSource {
    /// Config file backing this source.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }
}

const PROJECT_CONFIG_NAMES: &[&str] = &["openapi-lint.toml", ".openapi-lint.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves and loads the configuration of each validation target.
#[derive(Debug)]
pub struct ConfigResolver {
    explicit: Option<PathBuf>,
    global_dir: Option<PathBuf>,
    sources: HashMap<PathBuf, ConfigSource>,
    configs: HashMap<ConfigSource, Rc<Config>>,
}

impl ConfigResolver {
    /// Creates a resolver honoring `--config` and the user-level config directory.
    #[must_use]
    pub fn new(explicit: Option<&Path>) -> Self {
        Self::with_global_dir(explicit, global_config_dir())
    }

    /// Creates a resolver with a fixed user-level directory.
    #[must_use]
    pub fn with_global_dir(explicit: Option<&Path>, global_dir: Option<PathBuf>) -> Self {
        Self {
            explicit: explicit.map(Path::to_path_buf),
            global_dir,
            sources: HashMap::new(),
            configs: HashMap::new(),
        }
    }

    /// Finds the configuration source for `target`.
    pub fn source_for(&mut self, target: &Path) -> ConfigSource {
        if let Some(p) = &self.explicit {
            return ConfigSource::Explicit(p.clone());
        }
        let dir = project_dir(target);
        if let Some(source) = self.sources.get(&dir) {
            return source.clone();
        }
        let source = self.lookup(&dir);
        self.sources.insert(dir, source.clone());
        source
    }

    /// Loads the configuration for `target`, parsing each file at most once.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolved file cannot be read or parsed.
    pub fn config_for(&mut self, target: &Path) -> Result<(ConfigSource, Rc<Config>)> {
        let source = self.source_for(target);
        if let Some(config) = self.configs.get(&source) {
            return Ok((source, Rc::clone(config)));
        }

        let config = match source.path() {
            None => Config::default(),
            Some(p) => {
                tracing::info!("Using config {} for {}", p.display(), target.display());
                Config::from_file(p)
                    .with_context(|| format!("Failed to load config: {}", p.display()))?
            }
        };
        let config = Rc::new(config);
        self.configs.insert(source.clone(), Rc::clone(&config));
        Ok((source, config))
    }

    fn lookup(&self, dir: &Path) -> ConfigSource {
        let project = PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file());
        if let Some(p) = project {
            tracing::debug!("Found project config: {}", p.display());
            return ConfigSource::Project(p);
        }

        let global = self
            .global_dir
            .as_ref()
            .map(|d| d.join(GLOBAL_CONFIG_NAME))
            .filter(|candidate| candidate.is_file());
        match global {
            Some(p) => {
                tracing::debug!("Found global config: {}", p.display());
                ConfigSource::Global(p)
            }
            None => ConfigSource::Default,
        }
    }
}

/// Directory searched for a project config when validating `target`.
///
/// A file target is looked up next to the file.
#[must_use]
pub fn project_dir(target: &Path) -> PathBuf {
    if target.is_file() {
        target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    } else {
        target.to_path_buf()
    }
}

/// User-level config directory: `$OPENAPI_LINT_CONFIG_DIR`, else `~/.openapi-lint/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("OPENAPI_LINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".openapi-lint"))
}
