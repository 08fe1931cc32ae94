use super::currency::{CurrencyCode, Pair};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.frankfurter.app";

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Initial state of the converter screen.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DefaultsConfig {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    #[serde(default)]
    pub amount: Option<f64>,
}

impl DefaultsConfig {
    pub fn pair(&self) -> Pair {
        Pair::new(self.from, self.to)
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            from: CurrencyCode::USD,
            to: CurrencyCode::PLN,
            amount: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    pub data_path: Option<String>,
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("pl", "kantor", "kantor")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("pl", "kantor", "kantor")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
provider:
  base_url: "http://localhost:8080"
  timeout_secs: 5
defaults:
  from: "eur"
  to: "CHF"
  amount: 250.0
data_path: "/tmp/kantor"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.base_url, "http://localhost:8080");
        assert_eq!(config.provider.timeout_secs, 5);
        assert_eq!(config.defaults.pair().to_string(), "EUR-CHF");
        assert_eq!(config.defaults.amount, Some(250.0));
        assert_eq!(config.data_path().unwrap(), PathBuf::from("/tmp/kantor"));
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("data_path: ~").unwrap();
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.provider.timeout_secs, 30);
        assert_eq!(config.defaults.pair().to_string(), "USD-PLN");
        assert!(config.defaults.amount.is_none());

        let partial: AppConfig =
            serde_yaml::from_str("provider:\n  base_url: \"http://example.com\"\n").unwrap();
        assert_eq!(partial.provider.timeout_secs, 30);
    }

    #[test]
    fn test_invalid_currency_is_rejected() {
        let yaml_str = r#"
defaults:
  from: "DOLLAR"
  to: "PLN"
"#;
        assert!(serde_yaml::from_str::<AppConfig>(yaml_str).is_err());
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/definitely/not/here/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
