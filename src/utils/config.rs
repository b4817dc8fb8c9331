use dotenv::dotenv;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

const DEFAULT_SECRET_KEY: &str = "default-secret-key";
const DEFAULT_DATABASE: &str = "database.db";
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub secret_key: String,
    pub database: String,
    pub debug: bool,
    pub bind_address: String,
    pub request_timeout: Duration,
}

impl AppConfig {

    pub fn global() -> &'static AppConfig {
        CONFIG.get_or_init(|| {
            dotenv().ok();
            AppConfig::from_env()
        })
    }

    /// Reads the configuration from the process environment, falling back to defaults.
    pub fn from_env() -> AppConfig {
        AppConfig {
            secret_key: env::var("SECRET_KEY")
                .unwrap_or_else(|_| DEFAULT_SECRET_KEY.to_string()),
            database: env::var("DATABASE")
                .unwrap_or_else(|_| DEFAULT_DATABASE.to_string()),
            debug: env::var("DEBUG")
                .map(|value| value.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string()),
            request_timeout: Duration::from_secs(
                env::var("REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|value| value.trim().parse().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
        }
    }

    /// Default `env_logger` filter for this configuration.
    pub fn log_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}
