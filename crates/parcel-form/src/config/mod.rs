use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::delivery::WeightGate;

pub const DEFAULT_BACKEND_BASE_URL: &str = "https://backend.api.com";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub backend: BackendConfig,
    pub form: FormConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let base_url = BackendConfig::normalize_base_url(
            &env::var("BACKEND_BASE_URL").unwrap_or_else(|_| DEFAULT_BACKEND_BASE_URL.to_string()),
        )?;
        let timeout_ms = env::var("BACKEND_TIMEOUT_MS")
            .unwrap_or_else(|_| "10000".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;

        let weight_gate = match env::var("FORM_WEIGHT_GATE") {
            Ok(raw) => WeightGate::parse(&raw).ok_or(ConfigError::InvalidWeightGate { value: raw })?,
            Err(_) => WeightGate::default(),
        };
        let submit_enabled = match env::var("FORM_SUBMIT_ENABLED") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag {
                name: "FORM_SUBMIT_ENABLED",
                value: raw,
            })?,
            Err(_) => false,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            backend: BackendConfig {
                base_url,
                timeout_ms,
            },
            form: FormConfig {
                weight_gate,
                submit_enabled,
            },
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the delivery catalog lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub timeout_ms: u64,
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Trim whitespace and trailing slashes; only http(s) URLs are accepted.
    pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
        let base_url = raw.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBackendUrl { value: base_url });
        }
        Ok(base_url)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_BASE_URL.to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Behavior switches for the form controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormConfig {
    pub weight_gate: WeightGate,
    /// Send the form to the backend on submit. Off by default.
    pub submit_enabled: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidBackendUrl { value: String },
    InvalidTimeout,
    InvalidWeightGate { value: String },
    InvalidFlag { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidBackendUrl { value } => {
                write!(f, "backend base URL must be an http(s) URL, got '{value}'")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "BACKEND_TIMEOUT_MS must be a whole number of milliseconds")
            }
            ConfigError::InvalidWeightGate { value } => write!(
                f,
                "FORM_WEIGHT_GATE must be 'category' or 'independent', got '{value}'"
            ),
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be a boolean flag, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "BACKEND_BASE_URL",
            "BACKEND_TIMEOUT_MS",
            "FORM_WEIGHT_GATE",
            "FORM_SUBMIT_ENABLED",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.backend.base_url, "https://backend.api.com");
        assert_eq!(config.backend.timeout(), Duration::from_secs(10));
        assert_eq!(config.form.weight_gate, WeightGate::CategoryMatch);
        assert!(!config.form.submit_enabled);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn backend_and_form_overrides_are_applied() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("BACKEND_BASE_URL", "http://localhost:8080/");
        env::set_var("BACKEND_TIMEOUT_MS", "250");
        env::set_var("FORM_WEIGHT_GATE", "independent");
        env::set_var("FORM_SUBMIT_ENABLED", "yes");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.backend.base_url, "http://localhost:8080");
        assert_eq!(config.backend.timeout_ms, 250);
        assert_eq!(config.form.weight_gate, WeightGate::Independent);
        assert!(config.form.submit_enabled);
        reset_env();
    }

    #[test]
    fn rejects_unknown_weight_gate() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FORM_WEIGHT_GATE", "sometimes");
        match AppConfig::load() {
            Err(ConfigError::InvalidWeightGate { value }) => assert_eq!(value, "sometimes"),
            other => panic!("expected weight gate error, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_non_http_backend() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("BACKEND_BASE_URL", "ftp://backend.api.com");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidBackendUrl { .. })
        ));
        reset_env();
    }

    #[test]
    fn base_url_is_normalized() {
        assert_eq!(
            BackendConfig::normalize_base_url(" https://backend.api.com/ ").expect("valid url"),
            "https://backend.api.com"
        );
        assert!(matches!(
            BackendConfig::normalize_base_url("backend.api.com"),
            Err(ConfigError::InvalidBackendUrl { .. })
        ));
    }
}
