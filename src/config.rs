//! Application configuration loaded from environment variables.

use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::path::PathBuf;

/// HTTP header carrying the bearer token for authenticated routes.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_DATABASE_URL: &str = "sqlite://data/ngo_impact.sqlite?mode=rwc";
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8080;
    pub const DEV_UPLOAD_DIR: &str = "uploads";
    pub const DEV_MAX_UPLOAD_SIZE: usize = 52_428_800; // 50MB per CSV
    pub const DEV_JWT_SECRET: &str = "dev-jwt-secret-do-not-use-in-production";
    pub const DEV_TOKEN_TTL_SECS: u64 = 3600; // 1 hour, matches the login token lifetime
    pub const DEV_ADMIN_USERNAME: &str = "admin";
    pub const DEV_ADMIN_PASSWORD: &str = "admin123";
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Admin login and token signing settings.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Admin username accepted by the login endpoint
    pub admin_username: String,
    /// Admin password accepted by the login endpoint
    pub admin_password: SecretString,
    /// HS256 signing secret for issued tokens
    pub jwt_secret: SecretString,
    /// Token lifetime in seconds
    pub token_ttl_secs: u64,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL (PostgreSQL or SQLite connection string)
    pub database_url: String,
    /// Directory where uploaded CSV files are spooled until imported
    pub upload_dir: PathBuf,
    /// Maximum CSV upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
    /// Login and token settings
    pub auth: AuthSettings,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In development mode (RUST_ENV=development) every variable has a default.
    /// In production mode the server refuses to start while any secret or the
    /// database URL still carries its development default.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `NGO_HOST`: Server host (default: 127.0.0.1)
    /// - `NGO_PORT`: Server port (default: 8080)
    /// - `DATABASE_URL`: sea-orm connection string
    /// - `NGO_UPLOAD_DIR`: Spool directory for uploaded CSV files (default: uploads)
    /// - `NGO_MAX_UPLOAD_SIZE`: Max upload size in bytes (default: 50MB)
    /// - `NGO_JWT_SECRET`: Token signing secret
    /// - `NGO_TOKEN_TTL_SECS`: Token lifetime (default: 3600)
    /// - `ADMIN_USERNAME` / `ADMIN_PASSWORD`: Admin login credentials
    pub fn from_env() -> Result<Self, ConfigError> {
        // Parse environment - required
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("NGO_HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = env::var("NGO_PORT")
            .unwrap_or_else(|_| defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("NGO_PORT must be a valid port number"))?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| defaults::DEV_DATABASE_URL.to_string());

        let upload_dir = PathBuf::from(
            env::var("NGO_UPLOAD_DIR").unwrap_or_else(|_| defaults::DEV_UPLOAD_DIR.to_string()),
        );

        let max_upload_size = env::var("NGO_MAX_UPLOAD_SIZE")
            .unwrap_or_else(|_| defaults::DEV_MAX_UPLOAD_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidValue("NGO_MAX_UPLOAD_SIZE must be a valid number"))?;

        let token_ttl_secs = env::var("NGO_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| defaults::DEV_TOKEN_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue("NGO_TOKEN_TTL_SECS must be a valid number"))?;

        let auth = AuthSettings {
            admin_username: env::var("ADMIN_USERNAME")
                .unwrap_or_else(|_| defaults::DEV_ADMIN_USERNAME.to_string()),
            admin_password: SecretString::from(
                env::var("ADMIN_PASSWORD")
                    .unwrap_or_else(|_| defaults::DEV_ADMIN_PASSWORD.to_string()),
            ),
            jwt_secret: SecretString::from(
                env::var("NGO_JWT_SECRET").unwrap_or_else(|_| defaults::DEV_JWT_SECRET.to_string()),
            ),
            token_ttl_secs,
        };

        let config = Config {
            environment,
            host,
            port,
            database_url,
            upload_dir,
            max_upload_size,
            auth,
        };

        // Validate production configuration
        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url == defaults::DEV_DATABASE_URL {
            errors.push(format!(
                "DATABASE_URL is using development default '{}'. Set a production database URL.",
                defaults::DEV_DATABASE_URL
            ));
        }

        if self.auth.jwt_secret.expose_secret() == defaults::DEV_JWT_SECRET {
            errors.push(
                "NGO_JWT_SECRET is using development default. Set a secure signing secret."
                    .to_string(),
            );
        }

        if self.auth.admin_password.expose_secret() == defaults::DEV_ADMIN_PASSWORD {
            errors.push(
                "ADMIN_PASSWORD is using development default. Set a secure admin password."
                    .to_string(),
            );
        }

        if self.auth.token_ttl_secs == 0 {
            errors.push("NGO_TOKEN_TTL_SECS must be greater than zero.".to_string());
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
