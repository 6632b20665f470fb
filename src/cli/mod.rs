pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "brightfeed")]
#[command(about = "Announces the newest article of a news feed", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/brightfeed/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the feed until interrupted
    Run {
        /// Poll interval (e.g., "30s", "5m", "1h")
        #[arg(short, long)]
        interval: Option<String>,

        /// Feed URL, overriding the config file
        #[arg(long)]
        feed_url: Option<String>,

        /// Skip the check at startup
        #[arg(long)]
        no_initial_check: bool,
    },
    /// Check the feed once and print what would be announced
    Check {
        /// Feed URL, overriding the config file
        #[arg(long)]
        feed_url: Option<String>,
    },
    /// Show the config file location and effective settings
    Config,
}
