//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from `.env` and the process environment.
//! It provides thread-safe access and per-field overrides for tests.
//!
//! Secrets (`OPENAI_API_KEY`, `SUPABASE_SERVICE_ROLE_KEY`) are redacted from the
//! `Debug` output so the config can be logged safely.

use std::env;
use std::fmt;
use std::sync::{OnceLock, RwLock};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub host: String,
    pub port: u16,
    pub openai_api_key: String,
    pub llm_model: String,
    pub llm_base_url: String,
    pub supabase_url: String,
    pub supabase_service_role_key: String,
    pub database_path: String,
    pub rubric_path: String,
    pub session_ttl_secs: u64,
}

/// State of the hosted-table credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteTable {
    Configured,
    Unset,
    Partial { missing: &'static str },
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn redact(value: &str) -> &'static str {
    if value.is_empty() { "<unset>" } else { "<redacted>" }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("project_name", &self.project_name)
            .field("log_level", &self.log_level)
            .field("log_file", &self.log_file)
            .field("log_to_stdout", &self.log_to_stdout)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("llm_model", &self.llm_model)
            .field("llm_base_url", &self.llm_base_url)
            .field("supabase_url", &self.supabase_url)
            .field(
                "supabase_service_role_key",
                &redact(&self.supabase_service_role_key),
            )
            .field("database_path", &self.database_path)
            .field("rubric_path", &self.rubric_path)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .finish()
    }
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Missing optional values fall back to defaults. Secrets default to the empty
    /// string; `main` decides which of them are required for the chosen backends.
    /// An unparsable `PORT` falls back to 3000 with a warning.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(port = %raw, "PORT is not a valid u16, using 3000");
                3000
            }),
            Err(_) => 3000,
        };

        let session_ttl_secs = match env::var("SESSION_TTL_SECS") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "SESSION_TTL_SECS is not a number, using 7200");
                7200
            }),
            Err(_) => 7200,
        };

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "answer-grader".into()),
            log_level: env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "api=info,services=info,marker=info,db=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "true".into()) == "true",
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port,
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
            llm_base_url: env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            supabase_url: env::var("SUPABASE_URL").unwrap_or_default(),
            supabase_service_role_key: env::var("SUPABASE_SERVICE_ROLE_KEY").unwrap_or_default(),
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "data/grader.db".into()),
            rubric_path: env::var("RUBRIC_PATH").unwrap_or_default(),
            session_ttl_secs,
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock.write().expect("Failed to acquire AppConfig write lock");
            *guard = AppConfig::from_env();
        }
    }

    /// Whether the hosted table credentials are both present, both absent, or only
    /// one of them set.
    pub fn remote_table(&self) -> RemoteTable {
        let url = !self.supabase_url.trim().is_empty();
        let key = !self.supabase_service_role_key.trim().is_empty();
        match (url, key) {
            (true, true) => RemoteTable::Configured,
            (false, false) => RemoteTable::Unset,
            (true, false) => RemoteTable::Partial {
                missing: "SUPABASE_SERVICE_ROLE_KEY",
            },
            (false, true) => RemoteTable::Partial {
                missing: "SUPABASE_URL",
            },
        }
    }

    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_log_level(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.log_level = value.into());
    }

    pub fn set_host(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.host = value.into());
    }

    pub fn set_port(value: u16) {
        AppConfig::set_field(|cfg| cfg.port = value);
    }

    pub fn set_openai_api_key(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.openai_api_key = value.into());
    }

    pub fn set_llm_model(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.llm_model = value.into());
    }

    pub fn set_llm_base_url(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.llm_base_url = value.into());
    }

    pub fn set_supabase_url(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.supabase_url = value.into());
    }

    pub fn set_supabase_service_role_key(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.supabase_service_role_key = value.into());
    }

    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    pub fn set_rubric_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.rubric_path = value.into());
    }

    pub fn set_session_ttl_secs(value: u64) {
        AppConfig::set_field(|cfg| cfg.session_ttl_secs = value);
    }
}

// --- Free accessors ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn openai_api_key() -> String {
    AppConfig::global().openai_api_key.clone()
}

pub fn llm_model() -> String {
    AppConfig::global().llm_model.clone()
}

pub fn llm_base_url() -> String {
    AppConfig::global().llm_base_url.clone()
}

pub fn supabase_url() -> String {
    AppConfig::global().supabase_url.clone()
}

pub fn supabase_service_role_key() -> String {
    AppConfig::global().supabase_service_role_key.clone()
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn rubric_path() -> String {
    AppConfig::global().rubric_path.clone()
}

pub fn session_ttl_secs() -> u64 {
    AppConfig::global().session_ttl_secs
}
