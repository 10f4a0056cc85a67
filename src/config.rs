// src/config.rs
use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{Context, bail};

pub const DEFAULT_CHUNK_SIZE: usize = 12;
pub const DEFAULT_CHUNK_DELAY: Duration = Duration::from_millis(20);
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone, Debug)]
pub struct RelayConfig {
    /// Upstream base URL. `None` is allowed at startup; each request fails
    /// with a configuration error until it is set.
    pub backend_url: Option<String>,
    pub bind_addr: SocketAddr,
    /// Characters per synthesized frame.
    pub chunk_size: usize,
    /// Pause after each synthesized frame.
    pub chunk_delay: Duration,
    pub max_body_bytes: usize,
    pub upstream_timeout: Option<Duration>,
    pub static_dir: Option<PathBuf>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_delay: DEFAULT_CHUNK_DELAY,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            upstream_timeout: None,
            static_dir: None,
        }
    }
}

impl RelayConfig {
    pub fn with_backend_url(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: Some(backend_url.into()),
            ..Self::default()
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't have to touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self {
            backend_url: var("BACKEND_URL"),
            static_dir: var("RELAY_STATIC_DIR").map(PathBuf::from),
            ..Self::default()
        };

        if let Some(addr) = var("RELAY_BIND_ADDR") {
            config.bind_addr = parse("RELAY_BIND_ADDR", &addr)?;
        }
        if let Some(size) = var("RELAY_CHUNK_SIZE") {
            config.chunk_size = parse("RELAY_CHUNK_SIZE", &size)?;
            if config.chunk_size == 0 {
                bail!("RELAY_CHUNK_SIZE must be greater than zero");
            }
        }
        if let Some(ms) = var("RELAY_CHUNK_DELAY_MS") {
            config.chunk_delay = Duration::from_millis(parse("RELAY_CHUNK_DELAY_MS", &ms)?);
        }
        if let Some(bytes) = var("RELAY_MAX_BODY_BYTES") {
            config.max_body_bytes = parse("RELAY_MAX_BODY_BYTES", &bytes)?;
        }
        if let Some(secs) = var("RELAY_UPSTREAM_TIMEOUT_SECS") {
            config.upstream_timeout = Some(Duration::from_secs(parse(
                "RELAY_UPSTREAM_TIMEOUT_SECS",
                &secs,
            )?));
        }

        Ok(config)
    }

    /// `{BACKEND_URL}/chat`, with a single trailing slash on the base removed.
    pub fn chat_endpoint(&self) -> Option<String> {
        self.backend_url.as_deref().map(|base| {
            let base = base.strip_suffix('/').unwrap_or(base);
            format!("{base}/chat")
        })
    }
}

fn parse<T>(key: &str, raw: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("invalid value for {key}: {raw:?}"))
}
