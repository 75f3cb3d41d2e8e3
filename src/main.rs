use clap::Parser as _;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use madara_scout::config::{self, Config};
use madara_scout::error::{Error, Result};
use madara_scout::{app, cli::Cli};

fn setup_logging() -> Result<()> {
    let data_dir = config::data_dir()?;
    std::fs::create_dir_all(&data_dir)?;

    let file_appender = tracing_appender::rolling::daily(&data_dir, "madara-scout.log");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("madara_scout=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(file_appender).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to a file so stdout stays clean for piping JSON
    if let Err(e) = setup_logging() {
        eprintln!("Warning: Could not set up logging: {}", e);
    }

    let cli = Cli::parse();
    let config = Config::load()?;
    info!(endpoint = %config.catalog.endpoint, "Loaded config");

    match app::run(cli, config).await {
        Ok(output) => {
            print!("{output}");
            Ok(())
        }
        Err(Error::NoItemsFound) => {
            info!("Search returned no items");
            println!("No matching items.");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            Err(e)
        }
    }
}
