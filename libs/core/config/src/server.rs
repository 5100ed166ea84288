use crate::{env_or_default, env_parse, ConfigError, FromEnv};
use std::net::{Ipv4Addr, SocketAddr};

/// Server configuration for HTTP APIs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// Reads HOST (default 0.0.0.0) and PORT (default 8080).
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string()),
            port: env_parse("PORT", 8080)?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: 8080,
        }
    }
}

/// Listener configuration for the gRPC server.
///
/// tonic binds a [`SocketAddr`] directly, so the host has to be an IP literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrpcConfig {
    pub host: String,
    pub port: u16,
}

impl GrpcConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                key: "GRPC_HOST".to_string(),
                details: e.to_string(),
            })
    }
}

impl FromEnv for GrpcConfig {
    /// Reads GRPC_HOST (default 0.0.0.0) and GRPC_PORT (default 50051).
    fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            host: env_or_default("GRPC_HOST", &Ipv4Addr::UNSPECIFIED.to_string()),
            port: env_parse("GRPC_PORT", 50051)?,
        };
        config.socket_addr()?;
        Ok(config)
    }
}

impl Default for GrpcConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: 50051,
        }
    }
}
