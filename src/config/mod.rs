//! Runtime configuration from environment (`.env` honored via dotenvy).

use crate::error::ConfigError;
use std::env;
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://pet_adoption.db";
pub const DEFAULT_LOG_LEVEL: &str = "pet_adoption=info,tower_http=info";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Reads `DATABASE_URL`, `DB_MAX_CONNECTIONS`, `APP_HOST`, `APP_PORT` and `APP_LOG_LEVEL`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port_raw = env::var("APP_PORT").unwrap_or_else(|_| "3000".to_string());
        let port = port_raw
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(port_raw.clone()))?;

        let url = env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let max_raw = env::var("DB_MAX_CONNECTIONS").unwrap_or_else(|_| "5".to_string());
        let max_connections = match max_raw.trim().parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => return Err(ConfigError::InvalidMaxConnections(max_raw)),
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url,
                max_connections,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

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
        let ip: IpAddr = self.host.parse().map_err(|source| ConfigError::InvalidHost {
            value: self.host.clone(),
            source,
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// EnvFilter directive used when `RUST_LOG` is unset.
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_HOST",
            "APP_PORT",
            "DATABASE_URL",
            "DB_MAX_CONNECTIONS",
            "APP_LOG_LEVEL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().unwrap_or_else(|p| p.into_inner());
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.telemetry.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn rejects_bad_port() {
        let _lock = env_guard().lock().unwrap_or_else(|p| p.into_inner());
        reset_env();
        env::set_var("APP_PORT", "eighty");
        let err = AppConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(ref v) if v == "eighty"));
        reset_env();
    }

    #[test]
    fn rejects_zero_max_connections() {
        let _lock = env_guard().lock().unwrap_or_else(|p| p.into_inner());
        reset_env();
        env::set_var("DB_MAX_CONNECTIONS", "0");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidMaxConnections(_))
        ));
        reset_env();
    }

    #[test]
    fn localhost_resolves_to_loopback() {
        let server = ServerConfig {
            host: "localhost".into(),
            port: 8080,
        };
        assert_eq!(
            server.socket_addr().unwrap(),
            SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 8080)
        );
    }

    #[test]
    fn garbage_host_is_an_error() {
        let server = ServerConfig {
            host: "not a host".into(),
            port: 8080,
        };
        assert!(matches!(
            server.socket_addr(),
            Err(ConfigError::InvalidHost { .. })
        ));
    }
}
