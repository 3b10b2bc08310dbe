//! `qoswatch` - terminal dashboard for QoS-over-LLDP port metrics.
//!
//! Pick a switch and port; the trend, proportion and history panels then
//! refresh on a fixed interval, on selection change, and when the pointer
//! enters a panel. Logs go to a file (default `/tmp/qoswatch.log`) so they
//! never corrupt the terminal UI.

mod action;
mod app;
mod cli;
mod component;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use qoswatch_core::DashboardController;

use crate::app::App;
use crate::cli::Cli;

/// File-based tracing. Hold the returned guard until exit so buffered
/// lines are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "qoswatch={log_level},qoswatch_core={log_level},qoswatch_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("qoswatch.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks BEFORE entering the terminal
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let file_config = cli.load_file_config()?;
    let config = cli.dashboard_config(file_config.as_ref())?;

    info!(
        url = %config.base_url,
        switch = config.switch_id.as_deref().unwrap_or("(unset)"),
        port = config.port_id.as_deref().unwrap_or("(unset)"),
        interval_ms = config.poll_interval.as_millis(),
        "starting qoswatch"
    );

    let controller = DashboardController::new(config)?;
    App::new(controller).run().await
}
