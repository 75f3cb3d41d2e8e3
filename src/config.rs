use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Madara `admin-ajax.php` handler that answers `madara_load_more`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// Skip certificate verification. Only for self-signed legacy hosts.
    #[serde(default)]
    pub accept_invalid_certs: bool,
    #[serde(default = "default_true")]
    pub fail_on_http_error: bool,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_endpoint() -> String {
    "https://manhuaus.com/wp-admin/admin-ajax.php".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    3
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    concat!("madara-scout/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
            accept_invalid_certs: false,
            fail_on_http_error: default_true(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "madara-scout").ok_or(Error::NoConfigDir)
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

pub fn data_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", "madara-scout")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(Error::NoDataDir)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = config_path()?;

        if !path.exists() {
            let config = Config::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self) -> Result<()> {
        let path = config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_verify_certificates() {
        let config = Config::default();
        assert!(!config.http.accept_invalid_certs);
        assert!(config.http.fail_on_http_error);
        assert_eq!(config.http.max_redirects, 3);
        assert_eq!(config.http.timeout(), Duration::from_secs(30));
        assert_eq!(
            config.catalog.endpoint,
            "https://manhuaus.com/wp-admin/admin-ajax.php"
        );
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = Config::from_toml(
            r#"
[catalog]
endpoint = "https://example.org/wp-admin/admin-ajax.php"

[http]
accept_invalid_certs = true
"#,
        )
        .unwrap();

        assert_eq!(
            config.catalog.endpoint,
            "https://example.org/wp-admin/admin-ajax.php"
        );
        assert!(config.http.accept_invalid_certs);
        assert_eq!(config.http.timeout_secs, 30);
        assert!(config.http.user_agent.starts_with("madara-scout/"));
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_round_trips_through_toml() {
        let mut config = Config::default();
        config.http.timeout_secs = 5;
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }
}
