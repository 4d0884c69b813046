use std::env;
use std::str::FromStr;

use anyhow::Context;

/// Messages returned per page by channel and DM message listings.
pub const PAGE_SIZE: usize = 50;

/// Notifications retained (and returned) per user.
pub const NOTIFICATION_CAP: usize = 20;

/// Runtime configuration, read from `STREAMS_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub session_ttl_days: i64,
    /// Base URL the server is reachable at; profile image URLs hang off it.
    pub public_url: String,
    pub hash_memory_kib: u32,
    pub hash_iterations: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            jwt_secret: "dev-secret-change-me".into(),
            session_ttl_days: 30,
            public_url: "http://localhost:8080/".into(),
            hash_memory_kib: argon2::Params::DEFAULT_M_COST,
            hash_iterations: argon2::Params::DEFAULT_T_COST,
        }
    }
}

impl Config {
    /// Build from the process environment, falling back to defaults for
    /// anything unset.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            host: env::var("STREAMS_HOST").unwrap_or(defaults.host),
            port: parse_var("STREAMS_PORT", defaults.port)?,
            jwt_secret: env::var("STREAMS_JWT_SECRET").unwrap_or(defaults.jwt_secret),
            session_ttl_days: parse_var("STREAMS_SESSION_TTL_DAYS", defaults.session_ttl_days)?,
            public_url: env::var("STREAMS_PUBLIC_URL").unwrap_or(defaults.public_url),
            hash_memory_kib: parse_var("STREAMS_HASH_MEMORY_KIB", defaults.hash_memory_kib)?,
            hash_iterations: parse_var("STREAMS_HASH_ITERATIONS", defaults.hash_iterations)?,
        })
    }

    pub fn default_profile_img_url(&self) -> String {
        format!("{}/static/default.jpg", self.public_url.trim_end_matches('/'))
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}
