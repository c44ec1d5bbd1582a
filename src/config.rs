use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:2124/api";
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime settings, read from the environment (and `.env` if present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// WMS backend base URL, including the `/api` prefix.
    pub api_url: String,
    pub bind_addr: String,
    pub request_timeout: Duration,
    /// Load the sample documents at startup.
    pub seed_demo: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            bind_addr: DEFAULT_BIND.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            seed_demo: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Bad values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("WMS_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_url);

        let bind_addr = lookup("APPROVALS_BIND")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.bind_addr);

        let request_timeout = match lookup("WMS_REQUEST_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    log::warn!(
                        "Invalid WMS_REQUEST_TIMEOUT_SECS '{raw}', using {DEFAULT_TIMEOUT_SECS}s"
                    );
                    defaults.request_timeout
                }
            },
            None => defaults.request_timeout,
        };

        let seed_demo = match lookup("APPROVALS_SEED_DEMO") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    log::warn!("Invalid APPROVALS_SEED_DEMO '{raw}', using true");
                    defaults.seed_demo
                }
            },
            None => defaults.seed_demo,
        };

        Self {
            api_url,
            bind_addr,
            request_timeout,
            seed_demo,
        }
    }
}
