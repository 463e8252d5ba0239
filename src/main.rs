use anyhow::Context;
use redude_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load redude settings")?;
    redude_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        host = %settings.server.host,
        port = settings.server.port,
        "redude-app bootstrap starting"
    );

    redude_app::run(settings).await
}
