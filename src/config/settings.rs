use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Overrides `~/.predictor` as the configuration directory.
pub const HOME_ENV: &str = "PREDICTOR_HOME";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub predict_path: String,
    pub health_path: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub use_colors: bool,
    pub pretty_json: bool,
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            predict_path: "/predict".to_string(),
            health_path: "/health".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_colors: true,
            pretty_json: true,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path_static()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let settings: Settings = toml::from_str(&content)
                .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;
            settings
                .validate()
                .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;
            Ok(settings)
        } else {
            // Return default settings if config doesn't exist
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.service.timeout_secs == 0 {
            anyhow::bail!("service.timeout_secs must be at least 1");
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path_static()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content)?;

        Ok(())
    }

    pub fn get_config_path(&self) -> Result<PathBuf> {
        Self::get_config_path_static()
    }

    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(HOME_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;

        Ok(home_dir.join(".predictor"))
    }

    fn get_config_path_static() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings.service.base_url, "http://127.0.0.1:8000");
        assert_eq!(settings.service.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.service.base_url = "http://10.0.0.5:9000".to_string();
        settings.output.use_colors = false;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.service.base_url, "http://10.0.0.5:9000");
        assert!(!loaded.output.use_colors);
        assert_eq!(loaded.service.predict_path, "/predict");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[service]\ntimeout_secs = 5\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.service.timeout_secs, 5);
        assert_eq!(settings.service.health_path, "/health");
        assert!(settings.output.pretty_json);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[service]\ntimeout_secs = 0\n").unwrap();

        let error = Settings::load_from(&path).unwrap_err();
        assert!(error.to_string().starts_with("Invalid configuration"));
        assert!(format!("{error:#}").contains("timeout_secs must be at least 1"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[service\nbase_url = ").unwrap();

        let error = Settings::load_from(&path).unwrap_err();
        assert!(error.to_string().starts_with("Invalid configuration"));
    }
}
