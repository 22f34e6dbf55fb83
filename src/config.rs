use anyhow::{Result, anyhow};
use std::{env, path::PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File,
    Postgres,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            "postgres" => Ok(StorageBackend::Postgres),
            other => Err(anyhow!("Invalid STORAGE_BACKEND: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage_backend: StorageBackend,
    pub data_dir: PathBuf,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_days: i64,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub client_base_url: String,
    pub max_login_attempts: usize,
    pub login_block_minutes: i64,
    pub login_attempts_history: usize,
    pub max_audit_logs: usize,
    pub max_notifications: usize,
    pub storage_cache_seconds: u64,
    pub admin_email: String,
    pub admin_password: Option<String>,
    pub bcrypt_cost: u32,
}

/// One week; larger lockout windows are clamped
pub const MAX_LOGIN_BLOCK_MINUTES: i64 = 7 * 24 * 60;
pub const MAX_JWT_EXPIRATION_DAYS: i64 = 365;

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    /// This is useful for testing where you want to control the environment directly
    pub fn from_env_only() -> Result<Self> {
        Ok(Config {
            storage_backend: var_or("STORAGE_BACKEND", "file").parse()?,
            data_dir: PathBuf::from(var_or("DATA_DIR", "./data")),
            database_url: var_or("DATABASE_URL", "postgres://@localhost:5432/medshift"),
            jwt_secret: var_or(
                "JWT_SECRET",
                "your-super-secret-jwt-key-change-this-in-production-12345",
            ),
            jwt_expiration_days: parsed_or("JWT_EXPIRATION_DAYS", 30).clamp(1, MAX_JWT_EXPIRATION_DAYS),
            host: var_or("HOST", "127.0.0.1"),
            port: parsed_or("PORT", 8080),
            environment: var_or("ENVIRONMENT", "development"),
            client_base_url: var_or("CLIENT_BASE_URL", "http://localhost:3000"),
            max_login_attempts: parsed_or("MAX_LOGIN_ATTEMPTS", 5),
            login_block_minutes: parsed_or("LOGIN_BLOCK_MINUTES", 15).clamp(0, MAX_LOGIN_BLOCK_MINUTES),
            login_attempts_history: parsed_or("LOGIN_ATTEMPTS_HISTORY", 1000),
            max_audit_logs: parsed_or("MAX_AUDIT_LOGS", 1000),
            max_notifications: parsed_or("MAX_NOTIFICATIONS", 100),
            storage_cache_seconds: parsed_or("STORAGE_CACHE_SECONDS", 300),
            admin_email: var_or("ADMIN_EMAIL", "admin@medshift.com"),
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()),
            bcrypt_cost: parsed_or("BCRYPT_COST", bcrypt::DEFAULT_COST),
        })
    }

    /// Fixed configuration backed by the in-memory store
    pub fn test_config() -> Self {
        Config {
            storage_backend: StorageBackend::Memory,
            data_dir: PathBuf::from("./data"),
            database_url: String::new(),
            jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
            jwt_expiration_days: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            client_base_url: "http://localhost:3000".to_string(),
            max_login_attempts: 5,
            login_block_minutes: 15,
            login_attempts_history: 1000,
            max_audit_logs: 1000,
            max_notifications: 100,
            storage_cache_seconds: 0,
            admin_email: "admin@medshift.com".to_string(),
            admin_password: Some("Admin#2024".to_string()),
            // Minimum cost bcrypt accepts; keeps hashing fast in tests
            bcrypt_cost: 4,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
