/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Shortest accepted cookie signing secret, in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Cheapest bcrypt cost the hasher accepts
pub const BCRYPT_MIN_COST: u32 = 4;

/// Most expensive bcrypt cost the hasher accepts
pub const BCRYPT_MAX_COST: u32 = 31;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    /// Signing secret for the session cookie
    #[serde(default)]
    pub cookie_secret: String,

    #[serde(default = "default_session_days")]
    pub session_days: u64,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl ServerConfig {
    /// Load configuration from `config.toml` (if present) and environment
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file and environment
    ///
    /// Precedence, lowest first: defaults, the file, `SHELF__*` variables,
    /// then `COOKIE_SECRET`.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = path.map_or_else(|| PathBuf::from("config.toml"), Path::to_path_buf);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        } else if path.is_some() {
            return Err(ServerError::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        // Override with environment variables (e.g. SHELF__SERVER__PORT)
        settings = settings.add_source(
            config::Environment::with_prefix("SHELF")
                .separator("__")
                .try_parsing(true),
        );

        let settings = settings
            .set_override_option("auth.cookie_secret", std::env::var("COOKIE_SECRET").ok())
            .map_err(|e| ServerError::Config(e.to_string()))?;

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.cookie_secret.is_empty() {
            return Err(ServerError::Config(
                "Cookie secret is required (set COOKIE_SECRET)".to_string(),
            ));
        }

        if self.auth.cookie_secret.len() < MIN_SECRET_LEN {
            return Err(ServerError::Config(format!(
                "Cookie secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }

        if self.auth.session_days == 0 {
            return Err(ServerError::Config(
                "Session lifetime must be at least one day".to_string(),
            ));
        }

        if !(BCRYPT_MIN_COST..=BCRYPT_MAX_COST).contains(&self.auth.bcrypt_cost) {
            return Err(ServerError::Config(format!(
                "bcrypt cost must be between {} and {}",
                BCRYPT_MIN_COST, BCRYPT_MAX_COST
            )));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/shelf.db".to_string()
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        cookie_secret: String::new(),
        session_days: default_session_days(),
        bcrypt_cost: default_bcrypt_cost(),
    }
}

fn default_session_days() -> u64 {
    7
}

fn default_bcrypt_cost() -> u32 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
        }
    }
}
