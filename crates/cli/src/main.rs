use anyhow::Context;
use clap::{Parser, Subcommand};
use redude_kernel::settings::Settings;

/// `redude` command arguments.
#[derive(Debug, Parser)]
#[command(name = "redude", about = "Book search and rating service", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API until interrupted.
    Serve {
        /// Override the configured listen port.
        #[arg(long, value_name = "port")]
        port: Option<u16>,
    },
    /// Print the resolved settings as JSON.
    Settings,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load().context("failed to load redude settings")?;

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            redude_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "redude serve starting");
            redude_app::run(settings).await
        }
        Command::Settings => {
            if settings.google.books_api_key.is_some() {
                settings.google.books_api_key = Some("<redacted>".to_string());
            }
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
    }
}
