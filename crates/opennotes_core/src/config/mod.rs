//! Global (user-scoped) configuration store.
//!
//! # Responsibility
//! - Load and rewrite the registry of known notebook directories.
//! - Expose the optional override notebook path selected ahead of discovery.
//!
//! # Invariants
//! - A missing config file behaves as an empty registry, never an error.
//! - Runtime overrides (CLI flag, environment) are never persisted.
//! - Registration is idempotent: a path already listed is not appended again.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Overrides the global config file location.
pub const CONFIG_PATH_ENV: &str = "OPENNOTES_CONFIG";
/// Declares the override notebook path for this process.
pub const NOTEBOOK_PATH_ENV: &str = "OPENNOTES_NOTEBOOK_PATH";

const APP_DIR_NAME: &str = "opennotes";
const CONFIG_FILE_NAME: &str = "config.json";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    /// No user config directory could be determined for this platform.
    NoConfigDir,
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Serialize(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoConfigDir => write!(
                f,
                "cannot determine a user config directory; set {CONFIG_PATH_ENV}"
            ),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "invalid global config `{}`: {source}", path.display())
            }
            Self::Serialize(err) => write!(f, "failed to serialize global config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoConfigDir => None,
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
        }
    }
}

/// Persisted global config shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    /// Registered notebook directories, in registration order.
    #[serde(default)]
    pub notebooks: Vec<String>,
    /// Notebook selected ahead of context discovery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notebook_path: Option<String>,
}

/// Handle over the global config file.
///
/// Constructed once at process start and shared through
/// [`crate::AppContext`]; interior locking lets registration update the
/// in-memory copy through a shared reference.
#[derive(Debug)]
pub struct ConfigService {
    path: PathBuf,
    store: RwLock<GlobalConfig>,
    notebook_path_override: Option<String>,
}

impl ConfigService {
    /// Wraps an already-loaded config; nothing is read from disk.
    pub fn new(path: impl Into<PathBuf>, store: GlobalConfig) -> Self {
        Self {
            path: path.into(),
            store: RwLock::new(store),
            notebook_path_override: None,
        }
    }

    /// Loads the config at `path`, defaulting to an empty registry when the
    /// file does not exist.
    pub fn load(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let path = path.into();
        let store = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str::<GlobalConfig>(&text).map_err(|source| {
                ConfigError::Parse {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    "event=config_load module=config status=default path={}",
                    path.display()
                );
                GlobalConfig::default()
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        debug!(
            "event=config_load module=config status=ok path={} notebooks={}",
            path.display(),
            store.notebooks.len()
        );
        Ok(Self::new(path, store))
    }

    /// Loads from `OPENNOTES_CONFIG` or `<config dir>/opennotes/config.json`
    /// and applies the `OPENNOTES_NOTEBOOK_PATH` override when set.
    pub fn load_default() -> ConfigResult<Self> {
        let path = default_config_path().ok_or(ConfigError::NoConfigDir)?;
        let env_override = std::env::var(NOTEBOOK_PATH_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty());
        Ok(Self::load(path)?.with_notebook_path_override(env_override))
    }

    /// Sets a process-only override; `None` keeps the stored value.
    pub fn with_notebook_path_override(mut self, notebook_path: Option<String>) -> Self {
        if notebook_path.is_some() {
            self.notebook_path_override = notebook_path;
        }
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a snapshot of the stored config.
    pub fn store(&self) -> GlobalConfig {
        self.store
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Effective override path: runtime override first, then stored value.
    pub fn notebook_path(&self) -> Option<String> {
        self.notebook_path_override
            .clone()
            .or_else(|| self.store().notebook_path)
            .filter(|path| !path.is_empty())
    }

    /// Overwrites the config file and the in-memory copy.
    pub fn write(&self, config: &GlobalConfig) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let text = serde_json::to_string_pretty(config).map_err(ConfigError::Serialize)?;
        std::fs::write(&self.path, text).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;

        *self
            .store
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = config.clone();
        info!(
            "event=config_write module=config status=ok path={} notebooks={}",
            self.path.display(),
            config.notebooks.len()
        );
        Ok(())
    }

    /// Appends `notebook_dir` to the registry and rewrites the file.
    ///
    /// Returns `false` without writing when it is already registered.
    pub fn register_notebook(&self, notebook_dir: &str) -> ConfigResult<bool> {
        let mut config = self.store();
        if config.notebooks.iter().any(|known| known == notebook_dir) {
            debug!(
                "event=notebook_register module=config status=skipped reason=already_registered path={notebook_dir}"
            );
            return Ok(false);
        }
        config.notebooks.push(notebook_dir.to_string());
        self.write(&config)?;
        Ok(true)
    }
}

/// Resolves the global config file location.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(CONFIG_PATH_ENV).filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(explicit));
    }
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}
