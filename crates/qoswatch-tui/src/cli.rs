//! Command-line flags and their merge with the config file.
//!
//! Priority: CLI flags > named (or default) profile > built-in defaults.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use qoswatch_config::{Config, ConfigError, parse_controller_url, positive_millis};
use qoswatch_core::{DashboardConfig, TlsMode};

/// Terminal dashboard for real-time QoS-over-LLDP port metrics.
#[derive(Parser, Debug, Default)]
#[command(name = "qoswatch", version, about)]
pub struct Cli {
    /// Backend base URL (e.g., http://127.0.0.1:8080)
    #[arg(short = 'u', long, env = "QOSWATCH_URL")]
    pub url: Option<String>,

    /// Switch id to select at startup
    #[arg(short = 's', long)]
    pub switch: Option<String>,

    /// Port id to select at startup
    #[arg(short = 'p', long)]
    pub port: Option<String>,

    /// Config profile to use
    #[arg(short = 'P', long, env = "QOSWATCH_PROFILE")]
    pub profile: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Poll interval in milliseconds
    #[arg(short = 'i', long)]
    pub interval_ms: Option<u64>,

    /// Per-fetch timeout in milliseconds (defaults to the poll interval)
    #[arg(short = 't', long)]
    pub timeout_ms: Option<u64>,

    /// Trust this PEM CA bundle for an https backend
    #[arg(long, env = "QOSWATCH_CA_CERT")]
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS certificate verification (self-signed controllers)
    #[arg(short = 'k', long)]
    pub insecure: bool,

    /// Log file path (defaults to /tmp/qoswatch.log)
    #[arg(long, default_value = "/tmp/qoswatch.log")]
    pub log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Load the config file named by `--config`, or the platform one.
    ///
    /// An explicit file must load; a broken platform file is skipped so
    /// flags alone can still start the dashboard.
    pub fn load_file_config(&self) -> Result<Option<Config>> {
        match &self.config {
            Some(path) => qoswatch_config::load_config_from(path)
                .map(Some)
                .wrap_err_with(|| format!("loading {}", path.display())),
            None => Ok(qoswatch_config::load_config().ok()),
        }
    }

    /// Merge flags over the profile from `file`.
    pub fn dashboard_config(&self, file: Option<&Config>) -> Result<DashboardConfig> {
        let from_profile = match (file, &self.profile) {
            (Some(file), Some(_)) => Some(file.dashboard_config(self.profile.as_deref())?),
            (None, Some(name)) => return Err(eyre!("profile '{name}' requested but no config file was loaded")),
            // The default profile is optional when a URL is given.
            (Some(file), None) if self.url.is_some() => file.dashboard_config(None).ok(),
            // No default profile in the file falls through to the URL check.
            (Some(file), None) => match file.dashboard_config(None) {
                Ok(config) => Some(config),
                Err(ConfigError::UnknownProfile { .. }) => None,
                Err(e) => return Err(e.into()),
            },
            (None, None) => None,
        };

        let mut config = match (&self.url, from_profile) {
            (Some(url), profile) => {
                let base_url = parse_controller_url(url).map_err(|reason| eyre!(reason))?;
                let mut config = profile.unwrap_or_else(|| DashboardConfig::new(base_url.clone()));
                config.base_url = base_url;
                config
            }
            (None, Some(profile)) => profile,
            (None, None) => {
                return Err(eyre!(
                    "no backend URL: pass --url, set QOSWATCH_URL, or add a profile to {}",
                    qoswatch_config::config_path().display()
                ));
            }
        };

        if let Some(switch) = &self.switch {
            config.switch_id = Some(switch.clone());
        }
        if let Some(port) = &self.port {
            config.port_id = Some(port.clone());
        }
        if let Some(ms) = self.interval_ms {
            config.poll_interval = positive_millis("interval-ms", ms)?;
        }
        if let Some(ms) = self.timeout_ms {
            config.fetch_timeout = Some(positive_millis("timeout-ms", ms)?);
        }
        if self.insecure {
            config.tls = TlsMode::DangerAcceptInvalid;
        } else if let Some(path) = &self.ca_cert {
            config.tls = TlsMode::CustomCa(path.clone());
        }
        Ok(config)
    }
}
