use crate::error::{io_error, LibraryError, Result};
use crate::paths;
use serde::{Deserialize, Deserializer, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Persisted user settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// The selected Steam installation. An empty string on disk means unset.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub steam_dir: Option<PathBuf>,
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()).map(PathBuf::from))
}

/// Reads and writes [`Config`] as a JSON file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A store at `<user config dir>/GreenLuma/config.json`.
    pub fn default_location() -> Result<Self> {
        paths::default_config_path().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the config, falling back to the default when the file is
    /// missing or unreadable.
    pub async fn load(&self) -> Config {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No config file yet, a new one will be created");
                return Config::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read config, using defaults");
                return Config::default();
            }
        };

        match serde_json::from_slice::<Config>(&bytes) {
            Ok(config) => {
                debug!(path = %self.path.display(), steam_dir = ?config.steam_dir, "Loaded config");
                config
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Config is malformed, using defaults");
                Config::default()
            }
        }
    }

    /// Writes the config pretty-printed, creating parent directories.
    pub async fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_vec_pretty(config)
            .map_err(|e| LibraryError::Io(format!("failed to serialize config: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("failed to create", parent, e))?;
        }

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| io_error("failed to write", &self.path, e))?;

        debug!(path = %self.path.display(), "Saved config");
        Ok(())
    }
}
