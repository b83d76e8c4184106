use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub directory: DirectorySettings,
    #[serde(default)]
    pub ranking: RankingSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectorySettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
    #[serde(default = "default_users_collection")]
    pub users_collection: String,
    pub timeout_secs: Option<u64>,
}

fn default_users_collection() -> String { "users".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct RankingSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_ranking_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_ranking_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_ranking_timeout_secs")]
    pub timeout_secs: u64,
}

impl RankingSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// API key, if ranking is enabled and one is configured
    pub fn active_api_key(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_ranking_endpoint(),
            api_key: None,
            model: default_ranking_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_ranking_timeout_secs(),
        }
    }
}

fn default_true() -> bool { true }
fn default_ranking_endpoint() -> String { "https://api.anthropic.com/v1/messages".to_string() }
fn default_ranking_model() -> String { "claude-3-5-haiku-latest".to_string() }
fn default_max_tokens() -> u32 { 512 }
fn default_ranking_timeout_secs() -> u64 { 15 }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Upper bound on the candidate pool fetched per request
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_candidates: default_max_candidates(),
        }
    }
}

fn default_max_candidates() -> usize { 200 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_major_points")]
    pub major: u32,
    #[serde(default = "default_industry_points")]
    pub industry: u32,
    #[serde(default = "default_location_points")]
    pub location: u32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            major: default_major_points(),
            industry: default_industry_points(),
            location: default_location_points(),
        }
    }
}

fn default_major_points() -> u32 { 100 }
fn default_industry_points() -> u32 { 50 }
fn default_location_points() -> u32 { 25 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MENTOR__)
    /// 5. Well-known secret variables (JWT_SECRET, LLM_API_KEY, DIRECTORY_API_KEY)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MENTOR__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("MENTOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_secret_overrides(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("MENTOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_secret_overrides(settings)?.try_deserialize()
    }
}

/// Let conventional secret variables override their settings keys
fn apply_secret_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("JWT_SECRET", "auth.jwt_secret"),
        ("LLM_API_KEY", "ranking.api_key"),
        ("DIRECTORY_API_KEY", "directory.api_key"),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
