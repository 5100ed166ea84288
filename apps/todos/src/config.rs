use axum_helpers::JwtConfig;
use core_config::server::{GrpcConfig, ServerConfig};
use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_optional};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Account created at startup when `ADMIN_USERNAME` and `ADMIN_PASSWORD` are set
#[derive(Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AdminConfig {
    /// Both variables or neither; setting only one is a startup error.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        match (env_optional("ADMIN_USERNAME"), env_optional("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Ok(Some(Self { username, password })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::MissingEnvVar("ADMIN_PASSWORD".to_string())),
            (None, Some(_)) => Err(ConfigError::MissingEnvVar("ADMIN_USERNAME".to_string())),
        }
    }
}

/// Application configuration
/// Composes shared config components from the `core_config`, `database` and `axum-helpers` libraries
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub grpc: GrpcConfig,
    pub database: PostgresConfig,
    pub jwt: JwtConfig,
    pub admin: Option<AdminConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?, // HOST=0.0.0.0, PORT=8080
            grpc: GrpcConfig::from_env()?, // GRPC_HOST=0.0.0.0, GRPC_PORT=50051
            database: PostgresConfig::from_env()?, // Required
            jwt: JwtConfig::from_env()?, // Required
            admin: AdminConfig::from_env()?,
        })
    }
}
