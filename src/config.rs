use std::env;

/// Base URL of the content API when none is configured (local development).
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Address the web server binds to when `BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// AppConfig
///
/// Immutable configuration loaded once at startup and shared through `AppState`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects the log format and which settings are mandatory.
    pub env: Env,
    // Base URL of the external content API (auth, posts, books, uploads).
    pub api_url: String,
    // Socket address for the HTTP listener.
    pub bind_addr: String,
}

/// Env
///
/// Local development or a production deployment.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Non-panicking configuration for tests and local scaffolding.
    fn default() -> Self {
        Self {
            env: Env::Local,
            api_url: DEFAULT_API_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables (after `.env` has
    /// been applied by the caller).
    ///
    /// # Panics
    /// Panics in production when `API_URL` is not set; only local runs fall
    /// back to [`DEFAULT_API_URL`].
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let api_url = match env {
            Env::Production => {
                env::var("API_URL").expect("FATAL: API_URL must be set in production.")
            }
            Env::Local => env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Self {
            env,
            api_url,
            bind_addr,
        }
    }
}
