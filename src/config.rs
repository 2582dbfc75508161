use std::env;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Process-wide settings, read once at startup and shared read-only
/// between requests.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// `None` when `OPENAI_API_KEY` is unset or empty.
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub upstream_timeout: Duration,
    /// Largest inbound body accepted before answering 413.
    pub max_body_bytes: usize,
    pub host: String,
    pub port: u16,
}

impl RelayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY").filter(|key| !key.is_empty());

        // Only an unset variable falls back; an empty model name is passed through.
        let model = lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let api_base = lookup("OPENAI_API_BASE")
            .filter(|base| !base.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let timeout_secs = lookup("UPSTREAM_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);

        let max_body_bytes = lookup("MAX_BODY_BYTES")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_BODY_BYTES);

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = lookup("PORT")
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            api_key,
            model,
            api_base,
            upstream_timeout: Duration::from_secs(timeout_secs),
            max_body_bytes,
            host,
            port,
        }
    }

    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'))
    }
}
