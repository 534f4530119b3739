use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context};

use crate::retry::RetryPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub retry: RetryPolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .context("DATABASE_URL must be set to a Postgres instance")?;
        let defaults = RetryPolicy::default();

        Ok(Self {
            database_url,
            max_connections: parse_or(&lookup, "PORTAL_MAX_CONNECTIONS", 5)?,
            retry: RetryPolicy {
                attempts: parse_or(&lookup, "PORTAL_RETRY_ATTEMPTS", defaults.attempts)?,
                backoff: Duration::from_millis(parse_or(
                    &lookup,
                    "PORTAL_RETRY_BACKOFF_MS",
                    defaults.backoff.as_millis() as u64,
                )?),
                timeout: Duration::from_millis(parse_or(
                    &lookup,
                    "PORTAL_STORE_TIMEOUT_MS",
                    defaults.timeout.as_millis() as u64,
                )?),
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow!("{key} must be a non-negative integer, got '{raw}'")),
        None => Ok(default),
    }
}
