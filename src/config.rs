use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub cache: CacheConfig,
    pub connectivity: ConnectivityConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Clone, Deserialize)]
pub struct LLMConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub request_timeout_secs: u64,
}

// Keeps the credential out of logs.
impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    File,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectivityConfig {
    /// Forces the offline branch regardless of what the network says
    pub force_offline: bool,
    pub probe_timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    None,
    Token,
}

#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    pub mode: AuthMode,
    pub access_tokens: Vec<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("mode", &self.mode)
            .field("access_tokens", &self.access_tokens.len())
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any variable source
    pub fn from_lookup<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let cache_backend = match var_or("PHISHGUARD_CACHE_BACKEND", "file").to_lowercase().as_str() {
            "file" => CacheBackend::File,
            "memory" => CacheBackend::Memory,
            other => anyhow::bail!("Unsupported PHISHGUARD_CACHE_BACKEND: {}", other),
        };

        let auth_mode = match var_or("AUTH_MODE", "none").to_lowercase().as_str() {
            "none" => AuthMode::None,
            "token" => AuthMode::Token,
            other => anyhow::bail!("Unsupported AUTH_MODE: {}", other),
        };

        let access_tokens = split_list(&var_or("ACCESS_TOKENS", ""));
        if auth_mode == AuthMode::Token && access_tokens.is_empty() {
            anyhow::bail!("AUTH_MODE=token requires at least one entry in ACCESS_TOKENS");
        }

        Ok(Self {
            server: ServerConfig {
                port: var_or("PORT", "3000")
                    .parse()
                    .context("PORT must be a port number")?,
                host: var_or("HOST", "0.0.0.0"),
                cors_allowed_origins: split_list(&var_or(
                    "ALLOWED_ORIGINS",
                    "http://localhost:3000,http://localhost:5173",
                )),
            },
            llm: LLMConfig {
                api_key: var("GEMINI_API_KEY")
                    .or_else(|| var("GOOGLE_API_KEY"))
                    .unwrap_or_default(),
                model: var_or("PHISHGUARD_MODEL", DEFAULT_MODEL),
                api_base: var_or("PHISHGUARD_API_BASE", DEFAULT_API_BASE),
                request_timeout_secs: var_or("REQUEST_TIMEOUT_SECS", "60")
                    .parse()
                    .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            },
            cache: CacheConfig {
                backend: cache_backend,
                dir: var("PHISHGUARD_CACHE_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(default_cache_dir),
            },
            connectivity: ConnectivityConfig {
                force_offline: var_or("PHISHGUARD_OFFLINE", "false")
                    .parse()
                    .context("PHISHGUARD_OFFLINE must be true or false")?,
                probe_timeout_ms: var_or("CONNECTIVITY_TIMEOUT_MS", "1500")
                    .parse()
                    .context("CONNECTIVITY_TIMEOUT_MS must be a whole number of milliseconds")?,
            },
            auth: AuthConfig {
                mode: auth_mode,
                access_tokens,
            },
        })
    }
}

/// XDG data directory, or the working directory as a last resort
pub fn default_cache_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("phishguard")
        .join("cache")
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
