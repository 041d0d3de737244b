use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Console configuration, layered from defaults, config files and
/// environment. The API token is deliberately absent: it only ever comes
/// from the environment, never from a file that might get committed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
    pub paths: PathsConfig,
}

/// Connection settings for the inventory backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the REST API, e.g. `https://inventory.example.com/api`.
    /// Empty means not configured yet.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Extra attempts for reads that fail transiently.
    pub retry_attempts: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: 10,
            retry_attempts: 3,
        }
    }
}

/// Listing behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Rows fetched per listing page.
    pub page_size: usize,
    /// Seconds before the visible listing counts as stale and refetches.
    pub refresh_secs: u64,
    /// chrono format string for dates in listings.
    pub date_format: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: 25,
            refresh_secs: 60,
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter level: trace, debug, info, warn or error.
    pub level: String,
    /// Log to a file in TUI mode; false sends everything to stderr.
    pub to_file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            to_file: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory for console state (logs live under it).
    pub state: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state: ".assetdesk".to_string(),
        }
    }
}

impl Config {
    /// Path to the project-level config file.
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".assetdesk/config.toml")
    }

    /// Load configuration, later sources overriding earlier ones:
    /// embedded defaults, `.assetdesk/config.toml`, the user config in
    /// `~/.config/assetdesk/`, an explicit `--config` file, and finally
    /// `ASSETDESK_`-prefixed environment variables (`__` nests sections,
    /// e.g. `ASSETDESK_SERVER__BASE_URL`).
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Embedded defaults go in first so the console runs without any file.
        let defaults = serde_json::to_string(&Config::default())
            .context("could not serialize built-in defaults")?;
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(&defaults, config::FileFormat::Json));

        let mut layers = Vec::new();
        let project = Self::project_config_path();
        if project.exists() {
            layers.push(project);
        }
        if let Some(dir) = dirs::config_dir() {
            let user = dir.join("assetdesk").join("config.toml");
            if user.exists() {
                layers.push(user);
            }
        }
        for path in layers {
            builder = builder.add_source(config::File::from(path));
        }
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        let env = config::Environment::with_prefix("ASSETDESK")
            .separator("__")
            .try_parsing(true);
        let merged = builder
            .add_source(env)
            .build()
            .context("could not assemble configuration")?;
        merged.try_deserialize().context("invalid configuration")
    }

    /// Save config to `.assetdesk/config.toml`.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::project_config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("could not create config directory")?;
        }

        let rendered = toml::to_string_pretty(self).context("could not render config as TOML")?;
        std::fs::write(&config_path, rendered).context("could not write config file")?;
        Ok(())
    }

    /// Absolute path to the state directory.
    pub fn state_path(&self) -> PathBuf {
        let configured = PathBuf::from(&self.paths.state);
        if configured.is_absolute() {
            return configured;
        }
        std::env::current_dir().unwrap_or_default().join(configured)
    }

    /// Absolute path to the logs directory.
    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_usable() {
        let config = Config::default();
        assert!(config.server.base_url.is_empty());
        assert_eq!(config.server.timeout_secs, 10);
        assert_eq!(config.server.retry_attempts, 3);
        assert_eq!(config.ui.page_size, 25);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.to_file);
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("override.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nbase_url = \"http://localhost:9000/api\"\ntimeout_secs = 3\n\n[ui]\npage_size = 10"
        )
        .unwrap();

        let config = Config::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.server.base_url, "http://localhost:9000/api");
        assert_eq!(config.server.timeout_secs, 3);
        assert_eq!(config.ui.page_size, 10);
        // Untouched sections keep their defaults
        assert_eq!(config.server.retry_attempts, 3);
        assert_eq!(config.ui.refresh_secs, 60);
    }

    #[test]
    fn test_partial_section_fills_in_defaults() {
        let config: Config = toml::from_str("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.to_file);
        assert_eq!(config.ui.page_size, 25);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.server.base_url = "https://inventory.example.com/api".to_string();
        config.ui.page_size = 50;

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.server.base_url, config.server.base_url);
        assert_eq!(back.ui.page_size, 50);
    }
}
