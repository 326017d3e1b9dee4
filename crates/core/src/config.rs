use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_OVERALL_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MYMEMORY_BASE_URL: &str = "https://api.mymemory.translated.net";
pub const DEFAULT_GOOGLE_BASE_URL: &str = "https://translate.googleapis.com";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const ENV_MYMEMORY_BASE_URL: &str = "TRANSLATOR_MYMEMORY_URL";
pub const ENV_GOOGLE_BASE_URL: &str = "TRANSLATOR_GOOGLE_URL";
pub const ENV_OVERALL_TIMEOUT_MS: &str = "TRANSLATOR_TIMEOUT_MS";

/// Connect/read limits for a single provider call plus the ceiling for the
/// whole provider chain.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeoutBudget {
    pub connect_ms: u64,
    pub read_ms: u64,
    pub overall_ms: u64,
}

impl TimeoutBudget {
    pub fn new(connect_ms: u64, read_ms: u64, overall_ms: u64) -> Result<Self, ConfigError> {
        if connect_ms == 0 || read_ms == 0 || overall_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(Self {
            connect_ms,
            read_ms,
            overall_ms,
        })
    }

    pub fn connect(&self) -> Duration {
        Duration::from_millis(self.connect_ms)
    }

    pub fn read(&self) -> Duration {
        Duration::from_millis(self.read_ms)
    }

    pub fn overall(&self) -> Duration {
        Duration::from_millis(self.overall_ms)
    }
}

impl Default for TimeoutBudget {
    fn default() -> Self {
        Self {
            connect_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            read_ms: DEFAULT_READ_TIMEOUT_MS,
            overall_ms: DEFAULT_OVERALL_TIMEOUT_MS,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Endpoints {
    pub mymemory: String,
    pub google: String,
}

impl Endpoints {
    pub fn new(mymemory: &str, google: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            mymemory: parse_base_url(mymemory)?,
            google: parse_base_url(google)?,
        })
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            mymemory: DEFAULT_MYMEMORY_BASE_URL.to_owned(),
            google: DEFAULT_GOOGLE_BASE_URL.to_owned(),
        }
    }
}

fn parse_base_url(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyBaseUrl);
    }
    Url::parse(trimmed)?;
    Ok(trimmed.trim_end_matches('/').to_owned())
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslatorConfig {
    pub timeouts: TimeoutBudget,
    pub endpoints: Endpoints,
    pub user_agent: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            timeouts: TimeoutBudget::default(),
            endpoints: Endpoints::default(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("timeouts must be > 0 ms")]
    ZeroTimeout,
    #[error("provider base url must not be empty")]
    EmptyBaseUrl,
    #[error("invalid provider base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("invalid value for {key}: {value}")]
    InvalidNumber { key: String, value: String },
}

pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
pub struct StdEnv;

impl Env for StdEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: std::collections::BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn resolve_string_with_default(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
    default: &str,
) -> String {
    match cli_value {
        Some(v) => v,
        None => env.var(env_key).unwrap_or_else(|| default.to_owned()),
    }
}

pub fn resolve_millis_with_default(
    cli_value: Option<u64>,
    env_key: &str,
    env: &impl Env,
    default: u64,
) -> Result<u64, ConfigError> {
    if let Some(v) = cli_value {
        return Ok(v);
    }
    match env.var(env_key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber {
                key: env_key.to_owned(),
                value: raw,
            }),
        None => Ok(default),
    }
}
