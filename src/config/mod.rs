use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Value written to `Access-Control-Allow-Origin` by the bundled collections
    pub allowed_origin: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directives
    pub filter: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        Self::for_environment(environment).with_overrides(|key| env::var(key).ok())
    }

    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
    }

    /// Apply overrides from a key lookup (the process environment in `from_env`)
    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("SERVER_PORT").or_else(|| lookup("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Some(v) = lookup("CORS_ALLOWED_ORIGIN") {
            self.cors.allowed_origin = v.trim().to_string();
        }
        if let Some(v) = lookup("RUST_LOG") {
            self.logging.filter = v;
        }
        self
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("invalid listen address {}:{}: {}", self.server.host, self.server.port, e))
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            cors: CorsConfig {
                allowed_origin: "*".to_string(),
            },
            logging: LoggingConfig {
                filter: "collection_api=debug,tower_http=debug".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            cors: CorsConfig {
                allowed_origin: "https://staging.example.com".to_string(),
            },
            logging: LoggingConfig {
                filter: "collection_api=info,tower_http=info".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            cors: CorsConfig {
                allowed_origin: "https://app.example.com".to_string(),
            },
            logging: LoggingConfig {
                filter: "collection_api=info".to_string(),
            },
        }
    }
}

// Process-wide config, read from the environment on first access
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cors.allowed_origin, "*");
        assert!(config.logging.filter.contains("debug"));
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_ne!(config.cors.allowed_origin, "*");
    }

    #[test]
    fn test_overrides_apply() {
        let config = AppConfig::development().with_overrides(lookup(&[
            ("SERVER_HOST", "0.0.0.0"),
            ("SERVER_PORT", "9090"),
            ("CORS_ALLOWED_ORIGIN", " https://foo.example.com "),
            ("RUST_LOG", "warn"),
        ]));
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.cors.allowed_origin, "https://foo.example.com");
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_port_falls_back_to_port_var() {
        let config = AppConfig::development().with_overrides(lookup(&[("PORT", "3000")]));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_bad_port_keeps_default() {
        let config = AppConfig::development().with_overrides(lookup(&[("SERVER_PORT", "nope")]));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_socket_addr() {
        let addr = AppConfig::development().socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
        assert!(addr.ip().is_loopback());
    }
}
