//! Tracing subscriber bootstrap.

use anyhow::Context;
use redude_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::{fmt, EnvFilter};

/// Build the filter: `RUST_LOG` when set, otherwise the configured directive.
pub fn env_filter(settings: &TelemetrySettings) -> anyhow::Result<EnvFilter> {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    filter_from(from_env.as_deref(), settings)
}

/// An unparsable `directive` falls back to the configured one.
fn filter_from(
    directive: Option<&str>,
    settings: &TelemetrySettings,
) -> anyhow::Result<EnvFilter> {
    if let Some(filter) = directive.and_then(|value| EnvFilter::try_new(value).ok()) {
        return Ok(filter);
    }
    EnvFilter::try_new(&settings.log_filter)
        .with_context(|| format!("invalid log filter '{}'", settings.log_filter))
}

/// Install the global tracing subscriber.
///
/// A subscriber installed earlier (tests, embedding binaries) is kept.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = env_filter(settings)?;

    let installed = match settings.log_format {
        LogFormat::Pretty => fmt().with_env_filter(filter).with_target(true).try_init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .try_init(),
    };

    if installed.is_ok() {
        tracing::info!(
            target: "redude-telemetry",
            format = ?settings.log_format,
            "tracing initialized"
        );
    }

    Ok(())
}
