use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    pub client: ClientConfig,
    pub quote: QuoteConfig,
    #[serde(default)]
    pub recommendations: RecommendationsConfig,
    pub paths: PathsConfig,
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the REST API binds to
    pub bind: String,
    pub port: u16,
}

/// MySQL connection settings. Without a URL the server uses the in-memory store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Products per category page when the request has no `limit`
    pub page_size: u32,
    pub max_page_size: u32,
    /// Maximum number of featured products on the homepage
    pub max_featured: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the catalog REST API used by the terminal frontend
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// Chat service the composed quote is handed off to (e.g. https://wa.me)
    pub chat_base_url: String,
    /// Business number that receives quote requests
    pub phone_number: String,
    /// Spawn the platform URL opener after submitting a quote
    #[serde(default)]
    pub open_browser: bool,
    /// How long a wizard notice stays on screen
    #[serde(default = "default_notice_ttl")]
    pub notice_ttl_ms: u64,
}

fn default_notice_ttl() -> u64 {
    3000 // 3 seconds
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            chat_base_url: "https://wa.me".to_string(),
            phone_number: "5215555555555".to_string(),
            open_browser: false,
            notice_ttl_ms: default_notice_ttl(),
        }
    }
}

/// Capped retry policy for the related-products panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsConfig {
    #[serde(default = "default_recommendation_attempts")]
    pub max_attempts: usize,
    #[serde(default = "default_recommendation_delay")]
    pub delay_ms: u64,
    #[serde(default = "default_recommendation_limit")]
    pub limit: usize,
}

fn default_recommendation_attempts() -> usize {
    3
}

fn default_recommendation_delay() -> u64 {
    1000 // 1 second
}

fn default_recommendation_limit() -> usize {
    4
}

impl Default for RecommendationsConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_recommendation_attempts(),
            delay_ms: default_recommendation_delay(),
            limit: default_recommendation_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for logs and client preferences
    pub state: String,
    /// JSON catalog used to seed the in-memory store
    #[serde(default)]
    pub seed: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to file in TUI mode (false = stderr for debugging)
    #[serde(default = "default_log_to_file")]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_log_to_file(),
        }
    }
}

impl Config {
    /// Project-local config file, looked up in the working directory
    pub fn local_config_path() -> PathBuf {
        PathBuf::from("showroom.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so showroom works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        let local_config = Self::local_config_path();
        if local_config.exists() {
            builder = builder.add_source(config::File::from(local_config));
        }

        // User config in ~/.config/showroom/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("showroom").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables with SHOWROOM_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("SHOWROOM")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Write this config as TOML to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(path, toml_str).context("Failed to write config file")?;

        Ok(())
    }

    /// Get absolute path to state directory
    pub fn state_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.paths.state);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }

    /// Get absolute path to logs directory
    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }

    /// File holding persisted client preferences (view mode)
    pub fn preferences_path(&self) -> PathBuf {
        self.state_path().join("preferences.json")
    }

    pub fn seed_path(&self) -> Option<PathBuf> {
        self.paths.seed.as_ref().map(PathBuf::from)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: "0.0.0.0".to_string(),
                port: 7010,
            },
            database: DatabaseConfig::default(),
            catalog: CatalogConfig {
                page_size: 9,
                max_page_size: 50,
                max_featured: 5,
            },
            client: ClientConfig {
                base_url: "http://localhost:7010".to_string(),
                timeout_secs: 10,
            },
            quote: QuoteConfig::default(),
            recommendations: RecommendationsConfig::default(),
            paths: PathsConfig {
                state: ".showroom".to_string(),
                seed: None,
            },
            ui: UiConfig {
                refresh_rate_ms: 250,
            },
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_page_size() {
        let config = Config::default();
        assert_eq!(config.catalog.page_size, 9);
        assert_eq!(config.catalog.max_featured, 5);
    }

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.quote.chat_base_url, "https://wa.me");
        assert!(parsed.database.url.is_none());
    }

    #[test]
    fn test_missing_optional_sections_use_defaults() {
        let toml_str = r#"
            [server]
            bind = "127.0.0.1"
            port = 9000

            [catalog]
            page_size = 12
            max_page_size = 48
            max_featured = 5

            [client]
            base_url = "http://localhost:9000"
            timeout_secs = 5

            [quote]
            chat_base_url = "https://wa.me"
            phone_number = "5210000000000"

            [paths]
            state = "/tmp/showroom"

            [ui]
            refresh_rate_ms = 100
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.recommendations.max_attempts, 3);
        assert_eq!(config.quote.notice_ttl_ms, 3000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_save_then_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("showroom.toml");

        let mut config = Config::default();
        config.server.port = 9123;
        config.quote.phone_number = "5210000000000".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(loaded.server.port, 9123);
        assert_eq!(loaded.quote.phone_number, "5210000000000");
    }

    #[test]
    fn test_quote_defaults() {
        let quote = QuoteConfig::default();
        assert_eq!(quote.chat_base_url, "https://wa.me");
        assert_eq!(quote.notice_ttl_ms, 3000);
        assert!(!quote.open_browser);
    }

    #[test]
    fn test_state_paths() {
        let mut config = Config::default();
        config.paths.state = "/tmp/showroom-state".to_string();
        assert_eq!(config.logs_path(), PathBuf::from("/tmp/showroom-state/logs"));
        assert_eq!(
            config.preferences_path(),
            PathBuf::from("/tmp/showroom-state/preferences.json")
        );
    }
}
