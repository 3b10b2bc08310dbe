//! Configuration for the qoswatch dashboard.
//!
//! TOML profiles layered with environment overrides, and translation to
//! `qoswatch_core::DashboardConfig`. The TUI applies its CLI flags on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use qoswatch_core::{DashboardConfig, TlsMode};

/// Prefix for environment overrides. Nested keys use `__`, e.g.
/// `QOSWATCH_DEFAULTS__POLL_INTERVAL_MS=500`.
pub const ENV_PREFIX: &str = "QOSWATCH_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Per-fetch timeout. Unset means "same as the poll interval".
    pub timeout_ms: Option<u64>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            timeout_ms: None,
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    1000
}

/// A named backend profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Controller base URL (e.g., "http://127.0.0.1:8080").
    pub controller: String,

    /// Initially selected switch.
    pub switch: Option<String>,

    /// Initially selected port.
    pub port: Option<String>,

    /// Override the default poll interval.
    pub poll_interval_ms: Option<u64>,

    /// Override the default fetch timeout.
    pub timeout_ms: Option<u64>,

    /// PEM bundle to trust for an `https` controller.
    pub ca_cert: Option<PathBuf>,

    /// Skip certificate verification. Wins over `ca_cert`.
    pub insecure: Option<bool>,
}

/// TLS mode for a profile.
pub fn profile_tls(profile: &Profile) -> TlsMode {
    if profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    }
}

impl Config {
    /// Look up `name`, or the default profile when `name` is `None`.
    pub fn profile<'a>(&'a self, name: Option<&'a str>) -> Result<(&'a str, &'a Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get(name)
            .map(|profile| (name, profile))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }

    /// Resolve a profile straight to a `DashboardConfig`.
    pub fn dashboard_config(&self, name: Option<&str>) -> Result<DashboardConfig, ConfigError> {
        let (name, profile) = self.profile(name)?;
        profile_to_dashboard_config(profile, name, &self.defaults)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "qoswatch", "qoswatch").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("qoswatch");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load the full Config from the platform file + environment.
///
/// A missing file is not an error; defaults and environment still apply.
pub fn load_config() -> Result<Config, ConfigError> {
    Ok(figment_for(&config_path()).extract()?)
}

/// Load the Config from an explicit file + environment. The file must exist.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    std::fs::metadata(path)?;
    Ok(figment_for(path).extract()?)
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `DashboardConfig` from a profile and the global defaults.
pub fn profile_to_dashboard_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<DashboardConfig, ConfigError> {
    let base_url = parse_controller_url(&profile.controller).map_err(|reason| {
        ConfigError::Validation {
            field: format!("profiles.{profile_name}.controller"),
            reason,
        }
    })?;

    let poll_ms = profile.poll_interval_ms.unwrap_or(defaults.poll_interval_ms);
    let timeout_ms = profile.timeout_ms.or(defaults.timeout_ms);
    let poll_interval = positive_millis("poll_interval_ms", poll_ms)?;
    let fetch_timeout = timeout_ms
        .map(|ms| positive_millis("timeout_ms", ms))
        .transpose()?;

    let mut config = DashboardConfig::new(base_url);
    config.poll_interval = poll_interval;
    config.fetch_timeout = fetch_timeout;
    config.switch_id = profile.switch.clone();
    config.port_id = profile.port.clone();
    config.tls = profile_tls(profile);
    Ok(config)
}

/// Parse and check a backend URL. Only `http` and `https` are accepted.
pub fn parse_controller_url(raw: &str) -> Result<url::Url, String> {
    let url: url::Url = raw
        .trim()
        .parse()
        .map_err(|e| format!("invalid URL '{raw}': {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{other}' in '{raw}'")),
    }
}

/// Milliseconds to a non-zero `Duration`.
pub fn positive_millis(field: &str, ms: u64) -> Result<Duration, ConfigError> {
    if ms == 0 {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(Duration::from_millis(ms))
}
