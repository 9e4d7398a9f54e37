use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

/// Environment variable that overrides the geocoding access token.
pub const MAPBOX_TOKEN_ENV: &str = "MAPBOX_KEY";
/// Environment variable that overrides the weather API key.
pub const OPENWEATHER_KEY_ENV: &str = "OPENWEATHER_KEY";

/// Top-level configuration stored on disk.
///
/// There are no compiled-in defaults: a credential must come from this file
/// or from the environment, and startup fails with a hint otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Mapbox access token used by the geocoding client.
    pub mapbox_token: Option<String>,

    /// OpenWeatherMap API key used by the weather client.
    pub openweather_key: Option<String>,
}

/// Fully resolved credentials, after applying environment overrides.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub mapbox_token: String,
    pub openweather_key: String,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Default location of the persisted search history.
    pub fn history_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join("historial.json"))
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "clima", "clima")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Resolve both credentials, letting environment variables override the
    /// file. Errors if either is missing everywhere.
    pub fn credentials(&self) -> Result<Credentials> {
        self.credentials_with(
            env::var(MAPBOX_TOKEN_ENV).ok(),
            env::var(OPENWEATHER_KEY_ENV).ok(),
        )
    }

    fn credentials_with(
        &self,
        mapbox_env: Option<String>,
        openweather_env: Option<String>,
    ) -> Result<Credentials> {
        let mapbox_token = mapbox_env
            .or_else(|| self.mapbox_token.clone())
            .ok_or_else(|| {
                anyhow!(
                    "No Mapbox access token configured.\n\
                     Hint: run `clima configure` or set the {MAPBOX_TOKEN_ENV} environment variable."
                )
            })?;

        let openweather_key = openweather_env
            .or_else(|| self.openweather_key.clone())
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeatherMap API key configured.\n\
                     Hint: run `clima configure` or set the {OPENWEATHER_KEY_ENV} environment variable."
                )
            })?;

        Ok(Credentials { mapbox_token, openweather_key })
    }
}
