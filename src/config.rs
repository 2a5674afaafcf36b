use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::remote::{DEFAULT_TABLE, PostgrestConfig};

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub enum Backend {
    Supabase(PostgrestConfig),
    Memory,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub backend: Backend,
    pub bind: SocketAddr,
}

impl Config {
    pub fn new_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source; `new_from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("STUDY_LOG_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            name: "STUDY_LOG_BIND",
            value: bind_raw.clone(),
        })?;

        let backend = match lookup("STUDY_LOG_BACKEND").as_deref() {
            None | Some("supabase") => Backend::Supabase(postgrest_config(&lookup)?),
            Some("memory") => Backend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "STUDY_LOG_BACKEND",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self { backend, bind })
    }
}

fn postgrest_config<F>(lookup: &F) -> Result<PostgrestConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let url = lookup("SUPABASE_URL")
        .or_else(|| lookup("VITE_SUPABASE_URL"))
        .ok_or(ConfigError::Missing("SUPABASE_URL"))?;
    let api_key = lookup("SUPABASE_ANON_KEY")
        .or_else(|| lookup("VITE_SUPABASE_ANON_KEY"))
        .ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;
    let table = lookup("STUDY_LOG_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string());

    let timeout = match lookup("STUDY_LOG_REQUEST_TIMEOUT_SECS") {
        None => None,
        Some(raw) => match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
            _ => {
                return Err(ConfigError::Invalid {
                    name: "STUDY_LOG_REQUEST_TIMEOUT_SECS",
                    value: raw,
                });
            }
        },
    };

    Ok(PostgrestConfig {
        url,
        api_key,
        table,
        timeout,
    })
}
