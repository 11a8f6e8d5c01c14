//! Configuration management for casefile.
//!
//! Configuration is loaded with figment from defaults, a TOML config file,
//! and `CASEFILE_`-prefixed environment variables.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::{self, Account, AccountTable};
use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "casefile";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "evidence.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `CASEFILE_`)
/// 2. TOML config file at `~/.config/casefile/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Remote API configuration for the sync client.
    pub remote: RemoteConfig,
    /// Local cache configuration.
    pub cache: CacheConfig,
    /// Video thumbnail capture configuration.
    pub thumbnail: ThumbnailConfig,
    /// Account table configuration.
    pub auth: AuthConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory of static portal assets to serve, if any.
    pub assets_dir: Option<PathBuf>,
    /// Path to the document store database.
    /// Defaults to `~/.local/share/casefile/evidence.db`
    pub database_path: Option<PathBuf>,
}

/// Remote API configuration for the sync client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the evidence API.
    pub url: String,
}

/// Local cache configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory for the snapshot and session cache files.
    /// Defaults to `~/.local/share/casefile/cache`
    pub dir: Option<PathBuf>,
}

/// Video thumbnail capture configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Whether to attempt thumbnail capture at all.
    pub enabled: bool,
    /// Path to the ffmpeg binary.
    pub ffmpeg_path: PathBuf,
    /// Path to the ffprobe binary.
    pub ffprobe_path: PathBuf,
    /// MJPEG quality scale passed to ffmpeg (2 best .. 31 worst).
    pub jpeg_quality: u8,
}

/// Account table configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Configured accounts. When empty the built-in editor/viewer table
    /// is used.
    pub accounts: Vec<Account>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 3000,
            assets_dir: None,
            database_path: None,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:3000".to_string(),
        }
    }
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            jpeg_quality: 7,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("CASEFILE_").split("_"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::ConfigValidation {
                message: "server.port must be greater than 0".to_string(),
            });
        }

        if !self.remote.url.starts_with("http://") && !self.remote.url.starts_with("https://") {
            return Err(Error::ConfigValidation {
                message: format!("remote.url must be an http(s) URL: {}", self.remote.url),
            });
        }

        if !(2..=31).contains(&self.thumbnail.jpeg_quality) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "thumbnail.jpeg_quality must be between 2 and 31, got {}",
                    self.thumbnail.jpeg_quality
                ),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for account in &self.auth.accounts {
            if account.username.is_empty() {
                return Err(Error::ConfigValidation {
                    message: "auth.accounts entries must have a username".to_string(),
                });
            }
            if !seen.insert(account.username.as_str()) {
                return Err(Error::ConfigValidation {
                    message: format!("duplicate account username: {}", account.username),
                });
            }
            if !auth::is_valid_hash(&account.password_hash) {
                return Err(Error::ConfigValidation {
                    message: format!(
                        "account {} has an invalid password_hash; generate one with \
                         `casefile account hash`",
                        account.username
                    ),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.server
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the cache directory, resolving defaults if not set.
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.cache
            .dir
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join("cache"))
    }

    /// Build the account table, falling back to the built-in accounts when
    /// none are configured.
    #[must_use]
    pub fn account_table(&self) -> AccountTable {
        if self.auth.accounts.is_empty() {
            AccountTable::builtin()
        } else {
            AccountTable::new(self.auth.accounts.clone())
        }
    }

    /// The socket address string the server binds.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.bind_addr, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.bind_addr, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert!(config.server.assets_dir.is_none());
        assert_eq!(config.remote.url, "http://127.0.0.1:3000");
        assert!(config.thumbnail.enabled);
        assert!(config.auth.accounts.is_empty());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("server.port"));
    }

    #[test]
    fn test_validate_bad_remote_url() {
        let mut config = Config::default();
        config.remote.url = "ftp://example.com".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("remote.url"));
    }

    #[test]
    fn test_validate_bad_jpeg_quality() {
        let mut config = Config::default();
        config.thumbnail.jpeg_quality = 1;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("jpeg_quality"));
    }

    #[test]
    fn test_validate_duplicate_account() {
        let mut config = Config::default();
        let account = Account::with_password("dupe", "Dupe", true, "pw");
        config.auth.accounts.push(account.clone());
        config.auth.accounts.push(account);

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("duplicate account"));
    }

    #[test]
    fn test_validate_bad_password_hash() {
        let mut config = Config::default();
        config.auth.accounts.push(Account {
            username: "broken".to_string(),
            display_name: "Broken".to_string(),
            can_edit: true,
            password_hash: "plaintext-oops".to_string(),
        });

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("password_hash"));
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        assert!(config
            .database_path()
            .to_string_lossy()
            .contains("evidence.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.server.database_path = Some(PathBuf::from("/custom/evidence.db"));
        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/evidence.db")
        );
    }

    #[test]
    fn test_cache_dir_default() {
        let config = Config::default();
        assert!(config.cache_dir().to_string_lossy().contains("cache"));
    }

    #[test]
    fn test_account_table_builtin_fallback() {
        let config = Config::default();
        let table = config.account_table();
        assert!(table.find("editor").is_some());
    }

    #[test]
    fn test_account_table_from_config() {
        let mut config = Config::default();
        config
            .auth
            .accounts
            .push(Account::with_password("chief", "Chief", true, "pw"));

        let table = config.account_table();
        assert!(table.find("chief").is_some());
        assert!(table.find("editor").is_none());
    }

    #[test]
    fn test_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("casefile"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nport = 8088\n\n[remote]\nurl = \"http://evidence.local\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.remote.url, "http://evidence.local");
        // Untouched sections keep their defaults
        assert!(config.thumbnail.enabled);
    }

    #[test]
    fn test_env_overrides_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                "[server]\nport = 8088\n\n[remote]\nurl = \"http://evidence.local\"\n",
            )?;
            jail.set_env("CASEFILE_SERVER_PORT", "9099");

            let config = Config::load_from(Some(PathBuf::from("config.toml"))).unwrap();
            // Env beats the TOML value; keys without an env override keep
            // the TOML value.
            assert_eq!(config.server.port, 9099);
            assert_eq!(config.remote.url, "http://evidence.local");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("CASEFILE_REMOTE_URL", "http://evidence.example:9000");

            let config = Config::load_from(Some(PathBuf::from("missing.toml"))).unwrap();
            assert_eq!(config.remote.url, "http://evidence.example:9000");
            assert_eq!(config.server.port, 3000);
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("bind_addr"));
        assert!(json.contains("jpeg_quality"));
    }
}
