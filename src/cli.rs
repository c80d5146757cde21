//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "geoloc",
    version,
    about = "Geolocation utility using the OpenWeather Geocoding API"
)]
pub struct Cli {
    /// Locations to resolve: "City, State" (e.g. "Madison, WI") or a ZIP code
    /// (e.g. 90210). Without any, locations are read from stdin.
    pub locations: Vec<String>,

    /// Config file (default: <config dir>/geoloc/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Cache file, overriding `cache_path` from the config
    #[arg(long, value_name = "PATH")]
    pub cache: Option<PathBuf>,

    /// Read newline-separated locations from stdin instead of prompting
    #[arg(long)]
    pub batch: bool,

    /// Log to stderr instead of the configured log file
    #[arg(long)]
    pub log_stderr: bool,
}
