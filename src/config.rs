use std::{fmt::Display, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use crate::{
    error::{AppErr, AppResult},
    hub::DEFAULT_SEND_TIMEOUT,
    store::DEFAULT_HISTORY_LIMIT,
};

const PREFIX: &str = "AI_ROOMS_";

/// Runtime settings, read from `AI_ROOMS_*` environment variables.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr:     SocketAddr,
    pub history_limit: usize,
    pub send_timeout:  Duration,
    pub body_limit:    usize,
    pub static_dir:    Option<PathBuf>,
    pub embed_queue:   usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr:     SocketAddr::from(([0, 0, 0, 0], 3000)),
            history_limit: DEFAULT_HISTORY_LIMIT,
            send_timeout:  DEFAULT_SEND_TIMEOUT,
            body_limit:    1024 * 1024,
            static_dir:    None,
            embed_queue:   256,
        }
    }
}

impl Settings {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `lookup` gets the full variable name, e.g. `AI_ROOMS_BIND`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let d = Self::default();
        let s = Self {
            bind_addr:     parse(&lookup, "BIND")?.unwrap_or(d.bind_addr),
            history_limit: parse(&lookup, "HISTORY_LIMIT")?.unwrap_or(d.history_limit),
            send_timeout:  parse(&lookup, "SEND_TIMEOUT_MS")?
                .map(Duration::from_millis)
                .unwrap_or(d.send_timeout),
            body_limit:    parse(&lookup, "BODY_LIMIT")?.unwrap_or(d.body_limit),
            static_dir:    lookup(&format!("{PREFIX}STATIC_DIR"))
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            embed_queue:   parse(&lookup, "EMBED_QUEUE")?.unwrap_or(d.embed_queue),
        };

        if s.history_limit == 0 {
            return Err(AppErr::Config(format!("{PREFIX}HISTORY_LIMIT must be at least 1")));
        }
        if s.send_timeout.is_zero() {
            return Err(AppErr::Config(format!("{PREFIX}SEND_TIMEOUT_MS must be at least 1")));
        }
        Ok(s)
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> AppResult<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    let name = format!("{PREFIX}{key}");
    match lookup(&name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| AppErr::Config(format!("{name}={raw:?}: {e}"))),
    }
}
