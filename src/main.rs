//! RECAPP - Main Entry Point
//!
//! Serves the prediction API by default; subcommands run the same pipeline
//! against a local CSV file.

use clap::Parser;
use recapp::cli::{cmd_info, cmd_predict, cmd_serve, cmd_summary, Cli, Commands};
use recapp::pipeline::PipelineConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recapp=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port, host, media_dir, pipeline }) => {
            cmd_serve(host, port, media_dir, pipeline.to_config()).await?;
        }
        Some(Commands::Predict { data, fields, name, json, pipeline }) => {
            cmd_predict(&data, fields, name, json, pipeline.to_config())?;
        }
        Some(Commands::Summary { data }) => {
            cmd_summary(&data)?;
        }
        Some(Commands::Info { data }) => {
            cmd_info(&data)?;
        }
        None => {
            cmd_serve(None, None, None, PipelineConfig::default()).await?;
        }
    }

    Ok(())
}
