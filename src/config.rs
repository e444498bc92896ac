/// Service configuration.
///
/// Settings load from a TOML file with sensible defaults for every field,
/// so a missing or minimal config still yields a runnable service. The
/// AccuWeather API key may live in the config file, but the
/// `ACCUWEATHER_API_KEY` environment variable (including a `.env` file)
/// takes precedence - keys belong in the environment, not in committed
/// configs.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

/// Service settings, typically loaded from `ecosentinel.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Directory holding the five dataset CSV files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Region analyzed when no region is specified.
    #[serde(default = "default_region")]
    pub default_region: String,
    /// Horizon for AQI forecasts, in whole hours.
    #[serde(default = "default_forecast_horizon")]
    pub forecast_horizon_hours: u32,
    /// Seed for dataset simulation and the dev-mode weather provider.
    #[serde(default = "default_simulation_seed")]
    pub simulation_seed: u64,
    /// AccuWeather API key; the environment variable wins over this.
    #[serde(default)]
    pub accuweather_api_key: Option<String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/datasets")
}

fn default_region() -> String {
    "Nairobi".to_string()
}

fn default_forecast_horizon() -> u32 {
    24
}

fn default_simulation_seed() -> u64 {
    42
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            data_dir: default_data_dir(),
            default_region: default_region(),
            forecast_horizon_hours: default_forecast_horizon(),
            simulation_seed: default_simulation_seed(),
            accuweather_api_key: None,
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file. A broken config file is operator
    /// error and fails hard; use `Settings::default()` when no config
    /// file is expected.
    pub fn load(path: &std::path::Path) -> Result<Settings, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Resolves the effective API key: environment first (loading `.env`
    /// if present), then the config file. `None` means the service runs
    /// on the simulated weather provider.
    pub fn resolve_api_key(&self) -> Option<String> {
        dotenv::dotenv().ok();
        std::env::var("ACCUWEATHER_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| self.accuweather_api_key.clone())
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise loading the configuration file.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    Io { path: String, message: String },
    Parse { path: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, message } => {
                write!(f, "Cannot read config {}: {}", path, message)
            }
            ConfigError::Parse { path, message } => {
                write!(f, "Cannot parse config {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.data_dir, PathBuf::from("data/datasets"));
        assert_eq!(settings.default_region, "Nairobi");
        assert_eq!(settings.forecast_horizon_hours, 24);
        assert_eq!(settings.simulation_seed, 42);
        assert!(settings.accuweather_api_key.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: Settings = toml::from_str("default_region = \"Mombasa\"").unwrap();
        assert_eq!(settings.default_region, "Mombasa");
        assert_eq!(settings.forecast_horizon_hours, 24);
    }

    #[test]
    fn test_full_toml() {
        let text = r#"
            data_dir = "/var/lib/ecosentinel/datasets"
            default_region = "Kisumu"
            forecast_horizon_hours = 6
            simulation_seed = 7
            accuweather_api_key = "abc123"
        "#;
        let settings: Settings = toml::from_str(text).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("/var/lib/ecosentinel/datasets"));
        assert_eq!(settings.default_region, "Kisumu");
        assert_eq!(settings.forecast_horizon_hours, 6);
        assert_eq!(settings.simulation_seed, 7);
        assert_eq!(settings.accuweather_api_key.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_load_missing_file_is_an_io_error() {
        let err = Settings::load(std::path::Path::new("/nonexistent/ecosentinel.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("ecosentinel_config_test_{}.toml", std::process::id()));
        fs::write(&path, "default_region = [not valid").unwrap();

        let err = Settings::load(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
