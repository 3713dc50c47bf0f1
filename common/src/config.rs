//! Service configuration.
//!
//! Values come from environment variables (a `.env` file is loaded by the
//! binaries before this runs). Nothing about user database connections is
//! configured here: those credentials arrive per request.

use std::time::Duration;

/// Default bind host.
const DEFAULT_HOST: &str = "0.0.0.0";
/// Default bind port.
const DEFAULT_PORT: u16 = 5001;
/// Default upper bound of the user connection pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
/// Default seconds to wait for a pooled connection.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Application configuration shared by all services.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Name reported in logs and response metadata.
    pub service_name: String,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Deployment environment label (`development`, `production`, ...).
    pub environment: String,
    /// Maximum connections in the user database pool.
    pub max_connections: u32,
    /// Seconds to wait when connecting or acquiring a pooled connection.
    pub connect_timeout_secs: u64,
    /// Log output format.
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn load_with_service(service_name: &str) -> Self {
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup<F>(service_name: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Self {
            service_name: service_name.to_string(),
            host: lookup("SERVER_HOST")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_var(&lookup, "SERVER_PORT").unwrap_or(DEFAULT_PORT),
            environment: lookup("APP_ENV")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "development".to_string()),
            max_connections: parse_var::<u32, _>(&lookup, "DB_MAX_CONNECTIONS")
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            connect_timeout_secs: parse_var(&lookup, "DB_CONNECT_TIMEOUT_SECS")
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
            log_format,
        }
    }

    /// Pool acquire / connect timeout.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Address string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup("console-service", |key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.service_name, "console-service");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5001);
        assert_eq!(config.environment, "development");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", "8088"),
            ("APP_ENV", "production"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("DB_CONNECT_TIMEOUT_SECS", "3"),
            ("LOG_FORMAT", "JSON"),
        ]);
        assert_eq!(config.bind_addr(), "127.0.0.1:8088");
        assert_eq!(config.environment, "production");
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.connect_timeout_secs, 3);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("SERVER_PORT", "not-a-port"),
            ("DB_MAX_CONNECTIONS", "0"),
            ("SERVER_HOST", "  "),
        ]);
        assert_eq!(config.port, 5001);
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.host, "0.0.0.0");
    }
}
