use rocket::figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use crate::error::app_error::AppError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_PATH: &str = "/api";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub api: ApiConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub expenses: ExpensesConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub address: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_path: String,
    pub additional_base_paths: Vec<String>,
    pub enable_swagger: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Memory,
}

/// Where the session identity is kept between runs.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// JSON file used by the `file` backend.
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExpensesConfig {
    /// IANA zone name used to decide which calendar day an expense falls on.
    pub timezone: String,
    pub seed_sample_data: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            address: "127.0.0.1".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_API_BASE_PATH.to_string(),
            additional_base_paths: Vec::new(),
            enable_swagger: true,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3000".to_string()],
            allow_credentials: false,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            path: "expense-desk-session.json".to_string(),
        }
    }
}

impl Default for ExpensesConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            seed_sample_data: true,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources in priority order:
    /// 1. Built-in defaults
    /// 2. Expenses.toml (base configuration file)
    /// 3. Environment variables (prefixed with EXPENSES_, `__` separates sections)
    pub fn load() -> Result<Self, AppError> {
        Ok(Self::layered(Toml::file("Expenses.toml").nested()).extract()?)
    }

    fn layered(file: impl figment::Provider) -> Figment {
        let defaults = toml::to_string(&Config::default()).unwrap_or_default();

        Figment::new()
            .merge(Toml::string(&defaults))
            .merge(file)
            // EXPENSES_STORAGE__PATH -> storage.path; single underscores stay inside keys like json_format
            .merge(Env::prefixed("EXPENSES_").split("__"))
    }

    /// In-memory storage and no swagger mount; used by route tests.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        let mut config = Config::default();
        config.storage.backend = StorageBackend::Memory;
        config.api.enable_swagger = false;
        config
    }
}
