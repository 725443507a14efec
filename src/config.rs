use std::{net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result};
use chrono::TimeDelta;

/// Runtime configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub demo_user: String,
    pub demo_password: String,
    pub session_ttl: TimeDelta,
    pub static_dir: PathBuf,
    /// Adds `Secure` to the session cookie. Only useful behind TLS.
    pub cookie_secure: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            demo_user: "demo".to_string(),
            demo_password: "password123".to_string(),
            session_ttl: TimeDelta::hours(12),
            static_dir: PathBuf::from("static"),
            cookie_secure: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Blank values fall back to defaults; malformed ones are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| {
            lookup(k)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let mut cfg = Self::default();

        if let Some(v) = get("BIND_ADDR") {
            cfg.bind = v.parse().context("BIND_ADDR must be host:port")?;
        }
        if let Some(v) = get("DEMO_USER") {
            cfg.demo_user = v;
        }
        if let Some(v) = get("DEMO_PASSWORD") {
            cfg.demo_password = v;
        }
        if let Some(v) = get("SESSION_TTL_SECS") {
            let secs: i64 = v.parse().context("SESSION_TTL_SECS must be an integer")?;
            anyhow::ensure!(secs > 0, "SESSION_TTL_SECS must be positive");
            cfg.session_ttl = TimeDelta::try_seconds(secs).context("SESSION_TTL_SECS out of range")?;
        }
        if let Some(v) = get("STATIC_DIR") {
            cfg.static_dir = PathBuf::from(v);
        }
        if let Some(v) = get("COOKIE_SECURE") {
            cfg.cookie_secure = matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        Ok(cfg)
    }
}
