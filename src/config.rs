use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use crate::core::retry::FixedDelay;
use crate::models::KeywordWeights;
use crate::services::GenerationParameters;
use crate::services::catalog::DEFAULT_QUERY_LOG_CAPACITY;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub appwrite: Option<AppwriteSettings>,
    #[serde(default)]
    pub collection: CollectionSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub completion: CompletionSettings,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub metrics: MetricsSettings,
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
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    #[serde(default = "default_services_collection")]
    pub services: String,
    #[serde(default = "default_queries_collection")]
    pub chatbot_queries: String,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            services: default_services_collection(),
            chatbot_queries: default_queries_collection(),
        }
    }
}

fn default_services_collection() -> String { "services".to_string() }
fn default_queries_collection() -> String { "chatbot_queries".to_string() }

/// Local catalog source used when no Appwrite backend is configured
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    pub seed_file: Option<String>,
    /// Query log entries kept by the in-memory catalog
    #[serde(default = "default_query_log_capacity")]
    pub query_log_capacity: usize,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            seed_file: None,
            query_log_capacity: default_query_log_capacity(),
        }
    }
}

fn default_query_log_capacity() -> usize { DEFAULT_QUERY_LOG_CAPACITY }

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionSettings {
    #[serde(default = "default_completion_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            endpoint: default_completion_endpoint(),
            api_token: None,
            max_new_tokens: default_max_new_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CompletionSettings {
    pub fn parameters(&self) -> GenerationParameters {
        GenerationParameters {
            max_new_tokens: self.max_new_tokens,
            temperature: self.temperature,
            return_full_text: false,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_completion_endpoint() -> String {
    "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.2".to_string()
}
fn default_max_new_tokens() -> u32 { 150 }
fn default_temperature() -> f64 { 0.7 }
fn default_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl RetrySettings {
    pub fn policy(&self) -> FixedDelay {
        FixedDelay::new(self.max_attempts, Duration::from_millis(self.delay_ms))
    }
}

fn default_max_attempts() -> u32 { 3 }
fn default_delay_ms() -> u64 { 2000 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_composite_weight")]
    pub composite: f64,
    #[serde(default = "default_name_weight")]
    pub name: f64,
    #[serde(default = "default_category_weight")]
    pub category: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            composite: default_composite_weight(),
            name: default_name_weight(),
            category: default_category_weight(),
        }
    }
}

impl From<&WeightsConfig> for KeywordWeights {
    fn from(value: &WeightsConfig) -> Self {
        KeywordWeights {
            composite: value.composite,
            name: value.name,
            category: value.category,
        }
    }
}

fn default_composite_weight() -> f64 { 1.0 }
fn default_name_weight() -> f64 { 2.0 }
fn default_category_weight() -> f64 { 1.5 }

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    #[serde(default = "default_recent_capacity")]
    pub recent_capacity: usize,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            recent_capacity: default_recent_capacity(),
        }
    }
}

fn default_recent_capacity() -> usize { 100 }

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
fn default_log_format() -> String { "json".to_string() }

impl LoggingSettings {
    pub fn is_pretty(&self) -> bool {
        self.format.eq_ignore_ascii_case("pretty")
    }
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with GRAM_SEVA_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., GRAM_SEVA__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("GRAM_SEVA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("GRAM_SEVA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply well-known environment variables on top of the layered config
///
/// `HF_API_TOKEN` (or `HUGGINGFACE_API_KEY`) supplies the completion token;
/// `GRAM_SEVA_APPWRITE_*` supply the Appwrite connection;
/// `LOG_LEVEL` and `LOG_FORMAT` override the `[logging]` section.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let api_token = env::var("HF_API_TOKEN")
        .or_else(|_| env::var("HUGGINGFACE_API_KEY"))
        .ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(token) = api_token {
        builder = builder.set_override("completion.api_token", token)?;
    }

    for (var, key) in [("LOG_LEVEL", "logging.level"), ("LOG_FORMAT", "logging.format")] {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    let appwrite_vars = [
        ("GRAM_SEVA_APPWRITE_ENDPOINT", "appwrite.endpoint"),
        ("GRAM_SEVA_APPWRITE_API_KEY", "appwrite.api_key"),
        ("GRAM_SEVA_APPWRITE_PROJECT_ID", "appwrite.project_id"),
        ("GRAM_SEVA_APPWRITE_DATABASE_ID", "appwrite.database_id"),
    ];
    for (var, key) in appwrite_vars {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.composite, 1.0);
        assert_eq!(weights.name, 2.0);
        assert_eq!(weights.category, 1.5);
        assert_eq!(KeywordWeights::from(&weights), KeywordWeights::default());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_default_retry_policy() {
        let policy = RetrySettings::default().policy();
        assert_eq!(policy, FixedDelay::default());
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }

    #[test]
    fn test_completion_defaults() {
        let completion = CompletionSettings::default();
        assert_eq!(completion.parameters(), GenerationParameters::default());
        assert!(completion.api_token.is_none());
    }

    #[test]
    fn test_partial_sections_from_toml() {
        let completion: CompletionSettings = toml::from_str(
            r#"
            endpoint = "http://localhost:9000/generate"
            temperature = 0.2
            "#,
        )
        .unwrap();
        assert_eq!(completion.endpoint, "http://localhost:9000/generate");
        assert_eq!(completion.temperature, 0.2);
        assert_eq!(completion.max_new_tokens, 150);

        let matching: MatchingSettings = toml::from_str("[weights]\nname = 3.0\n").unwrap();
        assert_eq!(matching.weights.name, 3.0);
        assert_eq!(matching.weights.category, 1.5);
    }

    #[test]
    fn test_catalog_defaults() {
        let catalog = CatalogSettings::default();
        assert!(catalog.seed_file.is_none());
        assert_eq!(catalog.query_log_capacity, DEFAULT_QUERY_LOG_CAPACITY);

        let catalog: CatalogSettings = toml::from_str("seed_file = \"seed.json\"\n").unwrap();
        assert_eq!(catalog.query_log_capacity, DEFAULT_QUERY_LOG_CAPACITY);
    }

    #[test]
    fn test_logging_section_from_file() {
        let path = std::env::temp_dir().join(format!("gram_seva_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"
            [server]
            host = "127.0.0.1"
            port = 9090

            [catalog]
            query_log_capacity = 25

            [logging]
            level = "debug"
            format = "Pretty"
            "#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.logging.level, "debug");
        assert!(settings.logging.is_pretty());
        assert!(!LoggingSettings::default().is_pretty());
        assert_eq!(settings.catalog.query_log_capacity, 25);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("gram_seva_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"
            [server]
            host = "127.0.0.1"
            port = 9090

            [catalog]
            seed_file = "data/services.json"

            [retry]
            max_attempts = 5
            "#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9090);
        assert!(settings.appwrite.is_none());
        assert_eq!(settings.catalog.seed_file.as_deref(), Some("data/services.json"));
        assert_eq!(settings.retry.max_attempts, 5);
        assert_eq!(settings.retry.delay_ms, 2000);
        assert_eq!(settings.collection.services, "services");
        assert_eq!(settings.metrics.recent_capacity, 100);
    }
}
