use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bitecast", version, about = "Ice-fishing bite forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score the next 24 hours and print the result
    Forecast {
        /// Read raw 3-hour samples from a JSON file instead of OpenWeatherMap
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the forecast as JSON
        #[arg(long)]
        json: bool,

        /// Species ids to score (repeatable); defaults to the configured list
        #[arg(short, long)]
        species: Vec<String>,

        /// Forecast start as RFC 3339; defaults to the current hour
        #[arg(long)]
        start: Option<DateTime<Utc>>,
    },
    /// List the known species
    Species,
    /// Re-run interactive setup
    Init,
    /// Validate config and test connections
    Check,
}
