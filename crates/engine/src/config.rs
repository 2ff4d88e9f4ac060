// crates/engine/src/config.rs

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_INVENTORY_PATH: &str = "data/inventory.json";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-001";
const DEFAULT_LMSTUDIO_URL: &str = "http://localhost:1234/v1/chat/completions";
const DEFAULT_NTRS_BASE_URL: &str = "https://ntrs.nasa.gov";

#[derive(Debug, Clone)]
pub struct OnlineConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Hit the remote model once at startup before trusting it.
    pub probe: bool,
}

#[derive(Debug, Clone)]
pub struct OfflineConfig {
    pub url: String,
    pub model: Option<String>,
    pub temperature: f32,
    /// -1 lets the server generate until the model stops.
    pub max_tokens: i32,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub bind_addr: SocketAddr,
    pub inventory_path: PathBuf,
    pub online: OnlineConfig,
    pub offline: OfflineConfig,
    pub inference_timeout: Duration,
    pub lookup_timeout: Duration,
    pub ntrs_base_url: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5001)),
            inventory_path: PathBuf::from(DEFAULT_INVENTORY_PATH),
            online: OnlineConfig {
                api_key: None,
                base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
                model: DEFAULT_GEMINI_MODEL.to_string(),
                probe: true,
            },
            offline: OfflineConfig {
                url: DEFAULT_LMSTUDIO_URL.to_string(),
                model: None,
                temperature: 0.7,
                max_tokens: -1,
            },
            inference_timeout: Duration::from_secs(10),
            lookup_timeout: Duration::from_secs(15),
            ntrs_base_url: DEFAULT_NTRS_BASE_URL.to_string(),
        }
    }
}

impl EngineConfig {
    /// Build from the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = parse_or(&var, "ARCHIVE_BIND_ADDR", defaults.bind_addr)?;
        let probe = parse_or(&var, "ARCHIVE_ONLINE_PROBE", defaults.online.probe)?;
        let temperature = parse_or(&var, "LMSTUDIO_TEMPERATURE", defaults.offline.temperature)?;
        let max_tokens = parse_or(&var, "LMSTUDIO_MAX_TOKENS", defaults.offline.max_tokens)?;
        let inference_timeout = timeout_or(&var, "ARCHIVE_INFERENCE_TIMEOUT_SECS", defaults.inference_timeout)?;
        let lookup_timeout = timeout_or(&var, "ARCHIVE_LOOKUP_TIMEOUT_SECS", defaults.lookup_timeout)?;

        Ok(Self {
            bind_addr,
            inventory_path: var("ARCHIVE_INVENTORY_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.inventory_path),
            online: OnlineConfig {
                api_key: var("GEMINI_API_KEY"),
                base_url: var("GEMINI_BASE_URL").unwrap_or(defaults.online.base_url),
                model: var("GEMINI_MODEL").unwrap_or(defaults.online.model),
                probe,
            },
            offline: OfflineConfig {
                url: var("LMSTUDIO_URL").unwrap_or(defaults.offline.url),
                model: var("LMSTUDIO_MODEL"),
                temperature,
                max_tokens,
            },
            inference_timeout,
            lookup_timeout,
            ntrs_base_url: var("NTRS_BASE_URL").unwrap_or(defaults.ntrs_base_url),
        })
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: '{}'", key, raw)),
        None => Ok(default),
    }
}

/// Whole seconds; zero would make every outbound call fail immediately.
fn timeout_or(var: &impl Fn(&str) -> Option<String>, key: &str, default: Duration) -> Result<Duration> {
    let secs: u64 = parse_or(var, key, default.as_secs())?;
    if secs == 0 {
        bail!("Invalid value for {}: timeout must be at least 1 second", key);
    }
    Ok(Duration::from_secs(secs))
}
