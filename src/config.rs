//! # Configuration
//!
//! Layered settings, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. `config/default.toml`, then `config/local.toml` (both optional), or
//!    the single file named by `ROTACERTA_CONFIG`
//! 3. Environment variables `ROTACERTA__<SECTION>__<KEY>`, e.g.
//!    `ROTACERTA__DATABASE__URL` or `ROTACERTA__AUTH__JWT_SECRET`
//!
//! A `.env` file in the working directory is loaded before the environment
//! is read.

use crate::application::services::{AggregationConfig, LocalQuoteConfig};
use crate::application::services::local_quotes::{
    DEFAULT_LOCAL_SERVICE_NAME, DEFAULT_MAX_LOCAL_DISTANCE_KM,
};
use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "ROTACERTA";

/// Environment variable naming an explicit config file.
pub const CONFIG_FILE_ENV: &str = "ROTACERTA_CONFIG";

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// PostgreSQL connection.
    pub database: DatabaseConfig,
    /// Token verification.
    pub auth: AuthConfig,
    /// Carrier-rate provider.
    pub carrier: CarrierConfig,
    /// Distance provider.
    pub distance: DistanceConfig,
    /// Quoting rules.
    pub quotes: QuotesConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database settings. Without a URL the server runs on in-memory stores.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL URL.
    pub url: Option<String>,
    /// Pool size.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

/// Token verification settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 secret shared with the token issuer.
    pub jwt_secret: String,
    /// Required `iss` claim, if any.
    pub issuer: Option<String>,
}

/// Carrier-rate provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CarrierConfig {
    /// Base URL.
    pub api_url: String,
    /// Bearer token.
    pub api_token: String,
    /// `User-Agent` sent on every request.
    pub user_agent: String,
    /// HTTP timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for CarrierConfig {
    fn default() -> Self {
        Self {
            api_url: "https://sandbox.melhorenvio.com.br".to_string(),
            api_token: String::new(),
            user_agent: "RotaCerta (suporte@rotacerta.com.br)".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Distance provider settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DistanceConfig {
    /// Base URL.
    pub api_url: String,
    /// API key.
    pub api_key: String,
    /// HTTP timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for DistanceConfig {
    fn default() -> Self {
        Self {
            api_url: "https://maps.googleapis.com".to_string(),
            api_key: String::new(),
            timeout_ms: 5_000,
        }
    }
}

/// Quoting rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuotesConfig {
    /// Local delivery is not offered beyond this many kilometres.
    pub max_local_delivery_distance_km: Decimal,
    /// Service label on local options.
    pub local_service_name: String,
    /// Bounded wait for the carrier, in milliseconds.
    pub carrier_timeout_ms: u64,
    /// Bounded wait for the whole collection phase, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            max_local_delivery_distance_km: Decimal::from(DEFAULT_MAX_LOCAL_DISTANCE_KM),
            local_service_name: DEFAULT_LOCAL_SERVICE_NAME.to_string(),
            carrier_timeout_ms: 10_000,
            timeout_ms: 10_000,
        }
    }
}

impl QuotesConfig {
    /// Local engine settings.
    #[must_use]
    pub fn local(&self) -> LocalQuoteConfig {
        LocalQuoteConfig::default()
            .with_max_distance_km(self.max_local_delivery_distance_km)
            .with_service_name(self.local_service_name.clone())
    }

    /// Aggregator settings.
    #[must_use]
    pub fn aggregation(&self) -> AggregationConfig {
        AggregationConfig::with_timeout(self.timeout_ms).with_carrier_timeout(self.carrier_timeout_ms)
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,rotacerta_quotes=debug".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from files and the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or the result is
    /// incomplete.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut builder = Config::builder();
        match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) => builder = builder.add_source(File::with_name(&path)),
            Err(_) => {
                builder = builder
                    .add_source(File::with_name("config/default").required(false))
                    .add_source(File::with_name("config/local").required(false));
            }
        }
        let config = builder.add_source(environment()).build()?;
        Self::from_config(config)
    }

    /// Deserializes and validates an assembled [`Config`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on type mismatches or missing required values.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let app: Self = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message("auth.jwt_secret must be set".to_string()));
        }
        if self.quotes.max_local_delivery_distance_km.is_sign_negative() {
            return Err(ConfigError::Message(
                "quotes.max_local_delivery_distance_km must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn env(pairs: &[(&str, &str)]) -> Environment {
        let map = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect::<config::Map<String, String>>();
        environment().source(Some(map))
    }

    fn build(toml: Option<&str>, pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let mut builder = Config::builder();
        if let Some(toml) = toml {
            builder = builder.add_source(File::from_str(toml, FileFormat::Toml));
        }
        AppConfig::from_config(builder.add_source(env(pairs)).build()?)
    }

    #[test]
    fn defaults_apply() {
        let app = build(None, &[("ROTACERTA__AUTH__JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(app.server.address(), "0.0.0.0:8080");
        assert_eq!(app.database.url, None);
        assert_eq!(app.quotes.max_local_delivery_distance_km, Decimal::from(100));
        assert_eq!(app.quotes.local_service_name, "Local Delivery");
        assert_eq!(app.quotes.carrier_timeout_ms, 10_000);
        assert!(!app.logging.json);
    }

    #[test]
    fn file_values_override_defaults() {
        let app = build(
            Some(
                r#"
                [auth]
                jwt_secret = "from-file"

                [quotes]
                max_local_delivery_distance_km = 80
                local_service_name = "Entrega Local"
                "#,
            ),
            &[],
        )
        .unwrap();
        assert_eq!(app.auth.jwt_secret, "from-file");
        assert_eq!(app.quotes.max_local_delivery_distance_km, Decimal::from(80));
        assert_eq!(app.quotes.local().service_name, "Entrega Local");
    }

    #[test]
    fn environment_overrides_file() {
        let app = build(
            Some("[server]\nport = 9000\n[auth]\njwt_secret = \"a\""),
            &[
                ("ROTACERTA__SERVER__PORT", "9100"),
                ("ROTACERTA__DATABASE__URL", "postgres://localhost/rotacerta"),
                ("ROTACERTA__LOGGING__JSON", "true"),
            ],
        )
        .unwrap();
        assert_eq!(app.server.port, 9100);
        assert_eq!(app.database.url.as_deref(), Some("postgres://localhost/rotacerta"));
        assert!(app.logging.json);
    }

    #[test]
    fn missing_secret_rejected() {
        let err = build(None, &[]).unwrap_err();
        assert!(err.to_string().contains("jwt_secret"));
    }

    #[test]
    fn aggregation_settings_follow_quotes_section() {
        let quotes = QuotesConfig {
            carrier_timeout_ms: 2_500,
            timeout_ms: 4_000,
            ..QuotesConfig::default()
        };
        let agg = quotes.aggregation();
        assert_eq!(agg.carrier_timeout_ms, 2_500);
        assert_eq!(agg.timeout_ms, 4_000);
    }
}
