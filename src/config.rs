//! Configuration System
//!
//! Loads settings from a TOML file with environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_CSV: &str = "WASTE_DASHBOARD_CSV";
pub const ENV_LOG_LEVEL: &str = "WASTE_DASHBOARD_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "WASTE_DASHBOARD_LOG_FORMAT";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub window: WindowConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dataset location
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("2003_2017_waste.csv")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
        }
    }
}

/// Native window size
#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: f32,

    #[serde(default = "default_window_height")]
    pub height: f32,
}

fn default_window_width() -> f32 {
    1280.0
}

fn default_window_height() -> f32 {
    820.0
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

/// Static chart export settings
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_export_width")]
    pub width: u32,

    #[serde(default = "default_export_height")]
    pub height: u32,

    #[serde(default)]
    pub open_after_export: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("exports")
}

fn default_export_width() -> u32 {
    1400
}

fn default_export_height() -> u32 {
    1000
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            width: default_export_width(),
            height: default_export_height(),
            open_after_export: false,
        }
    }
}

impl ExportConfig {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Where a configuration came from, reported once logging is up.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
    /// A file was found but could not be used; defaults were applied.
    Fallback { path: PathBuf, error: String },
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Resolve the configuration: an explicit path, then the default
    /// locations, then built-in defaults. Environment overrides apply last.
    pub fn load_default(explicit: Option<&Path>) -> (Self, ConfigSource) {
        let candidates: Vec<PathBuf> = match explicit {
            Some(path) => vec![path.to_path_buf()],
            None => [
                Some(PathBuf::from("./waste_dashboard.toml")),
                dirs::config_dir().map(|p| p.join("waste_dashboard").join("config.toml")),
            ]
            .into_iter()
            .flatten()
            .filter(|p| p.exists())
            .collect(),
        };

        let (mut config, source) = match candidates.into_iter().next() {
            Some(path) => match Self::load(&path) {
                Ok(config) => (config, ConfigSource::File(path)),
                Err(e) => (
                    Config::default(),
                    ConfigSource::Fallback {
                        path,
                        error: e.to_string(),
                    },
                ),
            },
            None => (Config::default(), ConfigSource::Defaults),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        (config, source)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_CSV) {
            self.data.csv_path = PathBuf::from(path);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Waste Dashboard Configuration
#
# Environment variables override these settings:
# - WASTE_DASHBOARD_CSV
# - WASTE_DASHBOARD_LOG_LEVEL
# - WASTE_DASHBOARD_LOG_FORMAT

[data]
# CSV with year, waste_type, waste_disposed_of_tonne,
# total_waste_recycled_tonne and recycling_rate columns
csv_path = "2003_2017_waste.csv"

[window]
width = 1280.0
height = 820.0

[export]
# Directory used by --export
output_dir = "exports"

# PNG size in pixels
width = 1400
height = 1000

# Open exported PNGs with the system viewer
open_after_export = false

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty or json
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.data.csv_path, PathBuf::from("2003_2017_waste.csv"));
        assert_eq!(config.export.size(), (1400, 1000));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert!(!config.export.open_after_export);
    }

    #[test]
    fn test_generated_default_config_parses_to_defaults() {
        let parsed = Config::parse(&generate_default_config()).unwrap();
        let defaults = Config::default();
        assert_eq!(parsed.data.csv_path, defaults.data.csv_path);
        assert_eq!(parsed.window.width, defaults.window.width);
        assert_eq!(parsed.export.output_dir, defaults.export.output_dir);
        assert_eq!(parsed.export.size(), defaults.export.size());
        assert_eq!(parsed.logging.format, defaults.logging.format);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = Config::parse(
            r#"
            [data]
            csv_path = "/srv/data/waste.csv"

            [export]
            width = 800
            "#,
        )
        .unwrap();

        assert_eq!(config.data.csv_path, PathBuf::from("/srv/data/waste.csv"));
        assert_eq!(config.export.size(), (800, 1000));
        assert_eq!(config.window.height, 820.0);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [(ENV_CSV, "other.csv"), (ENV_LOG_FORMAT, "json")]
            .into_iter()
            .collect();
        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.data.csv_path, PathBuf::from("other.csv"));
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"[export]\nwidth = \"wide\"\n").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_explicit_missing_path_falls_back() {
        let (config, source) = Config::load_default(Some(Path::new("/no/such/config.toml")));
        assert!(matches!(source, ConfigSource::Fallback { .. }));
        assert_eq!(config.export.size(), (1400, 1000));
    }
}
