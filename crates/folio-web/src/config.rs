//! Server configuration
//!
//! Read from environment variables (a `.env` file is loaded first by `main`):
//!
//! | Variable | Default |
//! |---|---|
//! | `FOLIO_BIND_ADDR` | `127.0.0.1:8000` |
//! | `FOLIO_DATA_DIR` | `<crate>/data` |
//! | `FOLIO_TEMPLATE_DIR` | `<crate>/templates` |
//! | `FOLIO_STATIC_DIR` | `<crate>/static` |
//! | `FOLIO_SESSION_LIFETIME_SECS` | `86400` |
//! | `FOLIO_SESSION_SWEEP_SECS` | `300` |
//! | `FOLIO_COOKIE_SECURE` | `false` |
//! | `FOLIO_TEMPLATE_RELOAD` | `false` |

use std::fmt::Display;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_SESSION_LIFETIME_SECS: u64 = 24 * 60 * 60;
const DEFAULT_SESSION_SWEEP_SECS: u64 = 5 * 60;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Root of the `{language}/{bundle}.toml` tree
    pub data_dir: PathBuf,
    pub template_dir: PathBuf,
    pub static_dir: PathBuf,
    pub session_lifetime: Duration,
    pub session_sweep_interval: Duration,
    /// Mark the session cookie `Secure` (only sent over HTTPS)
    pub cookie_secure: bool,
    /// Re-read templates from disk on every render
    pub template_reload: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::with_asset_root(Path::new(env!("CARGO_MANIFEST_DIR")))
    }
}

impl ServerConfig {
    /// Defaults with `data/`, `templates/` and `static/` under `root`.
    pub fn with_asset_root(root: &Path) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            data_dir: root.join("data"),
            template_dir: root.join("templates"),
            static_dir: root.join("static"),
            session_lifetime: Duration::from_secs(DEFAULT_SESSION_LIFETIME_SECS),
            session_sweep_interval: Duration::from_secs(DEFAULT_SESSION_SWEEP_SECS),
            cookie_secure: false,
            template_reload: false,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; unset variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            bind_addr: parse_var(&lookup, "FOLIO_BIND_ADDR", defaults.bind_addr)?,
            data_dir: lookup("FOLIO_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            template_dir: lookup("FOLIO_TEMPLATE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.template_dir),
            static_dir: lookup("FOLIO_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            session_lifetime: parse_secs(
                &lookup,
                "FOLIO_SESSION_LIFETIME_SECS",
                DEFAULT_SESSION_LIFETIME_SECS,
            )?,
            session_sweep_interval: parse_secs(
                &lookup,
                "FOLIO_SESSION_SWEEP_SECS",
                DEFAULT_SESSION_SWEEP_SECS,
            )?,
            cookie_secure: parse_flag(&lookup, "FOLIO_COOKIE_SECURE", defaults.cookie_secure)?,
            template_reload: parse_flag(
                &lookup,
                "FOLIO_TEMPLATE_RELOAD",
                defaults.template_reload,
            )?,
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(value) = lookup(var) else {
        return Ok(default);
    };
    let parsed: Result<T, T::Err> = value.trim().parse();
    parsed.map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
        value,
    })
}

fn parse_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: u64,
) -> Result<Duration, ConfigError> {
    let secs: u64 = parse_var(lookup, var, default)?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            var,
            value: "0".to_string(),
            reason: "must be at least one second".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

fn parse_flag(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(value) = lookup(var) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value,
            reason: "expected true or false".to_string(),
        }),
    }
}
