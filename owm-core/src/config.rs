use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Directory holding trigger documents. Bare trigger names given on the
    /// command line are resolved to `<trigger_dir>/<name>.toml`.
    pub trigger_dir: Option<PathBuf>,

    /// Default `tracing` filter, e.g. "info" or "owm_core=debug".
    /// `RUST_LOG` takes precedence when set.
    pub log_level: Option<String>,
}

impl Config {
    /// Load config from the platform config directory, or return an empty
    /// default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("org", "openweathermap", "owm-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_trigger_dir(&mut self, dir: PathBuf) {
        self.trigger_dir = Some(dir);
    }

    pub fn set_log_level(&mut self, level: String) {
        self.log_level = Some(level);
    }

    /// Resolve a trigger argument to a file.
    ///
    /// Existing paths are used as given; anything else is looked up as
    /// `<trigger_dir>/<name>.toml`.
    pub fn resolve_trigger_path(&self, name_or_path: &str) -> Result<PathBuf> {
        let direct = PathBuf::from(name_or_path);
        if direct.is_file() {
            return Ok(direct);
        }

        let dir = self.trigger_dir.as_ref().ok_or_else(|| {
            anyhow!(
                "No trigger file '{name_or_path}' and no trigger directory configured.\n\
                 Hint: run `owm configure --trigger-dir <DIR>` first."
            )
        })?;

        let candidate = dir.join(format!("{name_or_path}.toml"));
        if candidate.is_file() {
            Ok(candidate)
        } else {
            Err(anyhow!(
                "Trigger '{name_or_path}' not found (looked for {})",
                candidate.display()
            ))
        }
    }
}
