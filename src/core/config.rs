use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_CURRENCY: &str = "USD";
pub const DEFAULT_RATE_API_URL: &str = "http://localhost:4000";

fn default_base_currency() -> String {
    DEFAULT_BASE_CURRENCY.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RateApiConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub retry: bool,
}

impl Default for RateApiConfig {
    fn default() -> Self {
        RateApiConfig {
            base_url: DEFAULT_RATE_API_URL.to_string(),
            api_key: None,
            retry: false,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub rate_api: RateApiConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default)]
    pub providers: ProvidersConfig,
    pub data_path: Option<String>,
    pub catalog_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            base_currency: default_base_currency(),
            providers: ProvidersConfig::default(),
            data_path: None,
            catalog_path: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or defaults when no
    /// config file has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fxconv", "fxconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "fxconv", "fxconv")
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
base_currency: "EUR"
providers:
  rate_api:
    base_url: "http://example.com/rates"
    api_key: "secret"
    retry: true
data_path: "/tmp/fxconv"
catalog_path: "/tmp/currencies.json"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.base_currency, "EUR");
        assert_eq!(
            config.providers.rate_api.base_url,
            "http://example.com/rates"
        );
        assert_eq!(config.providers.rate_api.api_key.as_deref(), Some("secret"));
        assert!(config.providers.rate_api.retry);
        assert_eq!(config.data_path.as_deref(), Some("/tmp/fxconv"));
        assert_eq!(config.catalog_path.as_deref(), Some("/tmp/currencies.json"));
        assert_eq!(
            config.default_data_path().unwrap(),
            PathBuf::from("/tmp/fxconv")
        );
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.base_currency, DEFAULT_BASE_CURRENCY);
        assert_eq!(config.providers.rate_api.base_url, DEFAULT_RATE_API_URL);
        assert!(config.providers.rate_api.api_key.is_none());
        assert!(!config.providers.rate_api.retry);
        assert!(config.data_path.is_none());

        let yaml_str = r#"
providers:
  rate_api:
    base_url: "http://example.com"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        assert_eq!(config.base_currency, "USD");
        assert_eq!(config.providers.rate_api.base_url, "http://example.com");
        assert!(!config.providers.rate_api.retry);
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/nonexistent/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
