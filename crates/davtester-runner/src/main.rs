use std::process::ExitCode;
use std::time::Duration;

use davtester_core::config::load_config;
use davtester_core::constants::CONFIG_FILE_NAME;
use davtester_runner::manager::Manager;
use davtester_runner::observer::Notifier;
use davtester_runner::transport::ReqwestTransport;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().with_target(true).with_line_number(true))
        .init();

    tracing::info!("Starting DAV conformance run");

    let config = load_config()?;

    tracing::debug!(config = ?config, file = CONFIG_FILE_NAME, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping info");
    }

    let notifier = Notifier::from_kinds(&config.run.observers, config.run.json_output.as_deref())?;
    let transport = ReqwestTransport::new(REQUEST_TIMEOUT)?;

    let mut manager = Manager::load(&config.run, transport, notifier)?;
    let summary = manager.run_all().await;

    tracing::info!(
        ok = summary.totals.ok,
        failed = summary.totals.failed,
        error = summary.totals.error,
        ignored = summary.totals.ignored,
        "Totals"
    );
    if let Some(abort) = &summary.abort {
        tracing::warn!(?abort, "Run ended early");
    }

    Ok(if summary.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
