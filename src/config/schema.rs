//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files and
//! every section falls back to defaults, so an empty file is a valid config.

use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the dispatch server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Path that handler faults are rerouted to (e.g. "/error").
    pub error_handler_path: Option<String>,

    /// Listener configuration (bind address, port, connection gate).
    pub listener: ListenerConfig,

    /// Session continuity settings.
    pub session: SessionConfig,

    /// Static file fallback.
    pub static_files: StaticFilesConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ServerConfig {
    /// The error handler path with leading/trailing `/` trimmed.
    pub fn error_handler_path(&self) -> Option<&str> {
        self.error_handler_path.as_deref().map(|p| p.trim_matches('/'))
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// IP address to bind (e.g., "127.0.0.1").
    pub bind_address: String,

    /// TCP port; 0 picks an ephemeral port.
    pub port: u16,

    /// Permits gating accepts. Absent means unbounded; must not be negative.
    pub max_connections: Option<i64>,
}

impl ListenerConfig {
    /// Resolve the bind address and port into a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.bind_address.trim().parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// The permit count, if a non-negative limit is configured.
    pub fn connection_limit(&self) -> Option<usize> {
        self.max_connections.and_then(|n| usize::try_from(n).ok())
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 9000,
            max_connections: None,
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Idle lifetime of a client session in seconds (default: 20 minutes).
    pub duration_secs: u64,
}

impl SessionConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { duration_secs: 20 * 60 }
    }
}

/// Static file configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory served for unmatched file-shaped GET requests.
    pub root: Option<PathBuf>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.listener.socket_addr().unwrap(), "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.listener.connection_limit(), None);
        assert_eq!(config.session.duration(), Duration::from_secs(1200));
        assert!(config.static_files.root.is_none());
        assert!(config.error_handler_path().is_none());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            error_handler_path = "/error/"

            [listener]
            port = 8080
            max_connections = 4

            [session]
            duration_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1");
        assert_eq!(config.listener.port, 8080);
        assert_eq!(config.listener.connection_limit(), Some(4));
        assert_eq!(config.session.duration(), Duration::from_secs(30));
        assert_eq!(config.error_handler_path(), Some("error"));
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn negative_limit_has_no_permit_count() {
        let listener = ListenerConfig {
            max_connections: Some(-1),
            ..ListenerConfig::default()
        };
        assert_eq!(listener.connection_limit(), None);
    }
}
