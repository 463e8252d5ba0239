use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "REDUDE_ENV";
const CONFIG_DIR_ENV: &str = "REDUDE_CONFIG_DIR";
const ENV_PREFIX: &str = "REDUDE";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub google: GoogleSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub api: ApiSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, and environment overlay.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .map(|cwd| cwd.join("config"))
                .with_context(|| "unable to resolve current directory")?,
        };

        Self::load_from(&config_dir, &environment)
    }

    /// Load configuration from an explicit config directory and environment name.
    ///
    /// `{dir}/base.toml` is read first, then `{dir}/{environment}.toml`, then
    /// `REDUDE_*` variables (`__` separates nested keys, e.g.
    /// `REDUDE_SERVER__PORT`). Missing files are skipped.
    pub fn load_from(config_dir: &Path, environment: &str) -> anyhow::Result<Self> {
        let parsed_environment: Environment = environment.parse()?;

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // The selected environment wins over anything a file declares.
        settings.environment = parsed_environment;

        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Prefix every module router is nested under.
    #[serde(default = "ServerSettings::default_api_prefix")]
    pub api_prefix: String,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }

    fn default_api_prefix() -> String {
        "/v1".to_string()
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
            api_prefix: Self::default_api_prefix(),
        }
    }
}

/// Endpoints and credentials for the Google identity and Books APIs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleSettings {
    #[serde(default = "GoogleSettings::default_books_endpoint")]
    pub books_endpoint: String,
    #[serde(default)]
    pub books_api_key: Option<String>,
    #[serde(default = "GoogleSettings::default_tokeninfo_endpoint")]
    pub tokeninfo_endpoint: String,
    /// Expected `aud` claim of ID tokens. Unchecked when absent.
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default = "GoogleSettings::default_timeout_ms")]
    pub timeout_ms: u64,
}

impl GoogleSettings {
    fn default_books_endpoint() -> String {
        "https://www.googleapis.com/books/v1/volumes".to_string()
    }

    fn default_tokeninfo_endpoint() -> String {
        "https://oauth2.googleapis.com/tokeninfo".to_string()
    }

    fn default_timeout_ms() -> u64 {
        5000
    }
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            books_endpoint: Self::default_books_endpoint(),
            books_api_key: None,
            tokeninfo_endpoint: Self::default_tokeninfo_endpoint(),
            client_id: None,
            timeout_ms: Self::default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// Fallback filter directive used when `RUST_LOG` is unset.
    #[serde(default = "TelemetrySettings::default_log_filter")]
    pub log_filter: String,
}

impl TelemetrySettings {
    fn default_log_filter() -> String {
        "info,tower_http=info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            log_filter: Self::default_log_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Behaviour of the public API surface.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    /// Answer failed rating operations with HTTP 200 and a `0` body instead
    /// of 401/403/404 statuses.
    #[serde(default = "ApiSettings::default_sentinel_responses")]
    pub sentinel_responses: bool,
}

impl ApiSettings {
    fn default_sentinel_responses() -> bool {
        true
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            sentinel_responses: Self::default_sentinel_responses(),
        }
    }
}
