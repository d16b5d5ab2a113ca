//! LLM configuration parsed from environment variables.

use super::types::LlmError;

pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_HTTP_REFERER: &str = "http://localhost:3000";
pub const DEFAULT_LLM_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_LLM_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for LlmTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_LLM_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_LLM_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    /// Name of the env var the key was read from. Kept for log messages.
    pub api_key_var: String,
    /// Bearer token. `None` when the named variable is unset; the provider
    /// then rejects the call and the pipeline falls back.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub http_referer: String,
    pub timeouts: LlmTimeouts,
}

impl LlmConfig {
    /// Build typed LLM config from environment variables.
    ///
    /// All optional:
    /// - `LLM_API_KEY_ENV`: names the env var holding the key (default `OPENROUTER_API_KEY`)
    /// - `LLM_MODEL`: default `mistralai/mistral-7b-instruct`
    /// - `LLM_BASE_URL`: default `https://openrouter.ai/api/v1`
    /// - `LLM_HTTP_REFERER`: default `http://localhost:3000`
    /// - `LLM_REQUEST_TIMEOUT_SECS`: default 120
    /// - `LLM_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigParse`] if the base URL is not http(s).
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key_var = env_non_empty("LLM_API_KEY_ENV").unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string());
        let api_key = env_non_empty(&api_key_var);
        let model = env_non_empty("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = parse_base_url(env_non_empty("LLM_BASE_URL").as_deref())?;
        let http_referer = env_non_empty("LLM_HTTP_REFERER").unwrap_or_else(|| DEFAULT_HTTP_REFERER.to_string());
        let timeouts = LlmTimeouts {
            request_secs: env_parse_u64("LLM_REQUEST_TIMEOUT_SECS", DEFAULT_LLM_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("LLM_CONNECT_TIMEOUT_SECS", DEFAULT_LLM_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { api_key_var, api_key, model, base_url, http_referer, timeouts })
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_base_url(raw: Option<&str>) -> Result<String, LlmError> {
    let url = raw.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(LlmError::ConfigParse(format!("LLM_BASE_URL must be http(s): {url}")));
    }
    Ok(url.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
