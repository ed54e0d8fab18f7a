use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::env;

/// Runtime configuration for the client, sourced from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the SIGAC REST API, without a trailing slash.
    pub api_base_url: String,
    /// Lifetime of a persisted token pair, in days.
    pub token_ttl_days: u64,
    /// Upper bound on a single refresh-token call, in seconds.
    pub refresh_timeout_secs: u64,
}

/// Ten years; anything above this is a misconfiguration, and
/// `chrono::Duration::days` would panic far before `u64::MAX` anyway.
const MAX_TOKEN_TTL_DAYS: u64 = 3650;

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_base_url =
            env::var("SIGAC_API_URL").unwrap_or_else(|_| "http://localhost:3333".to_string());
        if api_base_url.trim().is_empty() {
            return Err(anyhow!("SIGAC_API_URL must not be empty"));
        }

        let token_ttl_days: u64 = env::var("SIGAC_TOKEN_TTL_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);
        if token_ttl_days == 0 || token_ttl_days > MAX_TOKEN_TTL_DAYS {
            return Err(anyhow!(
                "SIGAC_TOKEN_TTL_DAYS must be between 1 and {}",
                MAX_TOKEN_TTL_DAYS
            ));
        }

        let refresh_timeout_secs = env::var("SIGAC_REFRESH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        Ok(Config {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            token_ttl_days,
            refresh_timeout_secs,
        })
    }

    /// Configuration pointed at `base_url` with default lifetimes.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Config {
            api_base_url: base_url.trim_end_matches('/').to_string(),
            token_ttl_days: 30,
            refresh_timeout_secs: 10,
        }
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.token_ttl_days as i64)
    }

    pub fn refresh_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.refresh_timeout_secs)
    }
}
