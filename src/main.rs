use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use brightfeed::cli::{commands, Cli, Commands};
use brightfeed::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("brightfeed=info")))
        .init();

    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_config_path()?,
    };
    let mut config = Config::load_from(&config_path)?;

    match cli.command {
        Commands::Run {
            interval,
            feed_url,
            no_initial_check,
        } => {
            commands::apply_overrides(&mut config, interval, feed_url, no_initial_check)?;
            commands::run(&config).await?;
        }
        Commands::Check { feed_url } => {
            commands::apply_overrides(&mut config, None, feed_url, false)?;
            commands::check(&config).await?;
        }
        Commands::Config => {
            commands::show_config(&config_path, &config)?;
        }
    }

    Ok(())
}
