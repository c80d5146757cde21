use anyhow::Result;
use clap::Parser;
use geoloc_core::{logging, AppError, Config};
use geoloc_geocode::Resolver;
use std::io::IsTerminal;
use std::process::ExitCode;

mod cli;
mod frontend;

use cli::Cli;
use frontend::InputSource;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            let err = AppError::from_anyhow(e);
            tracing::error!("{}", err);
            eprintln!("Error: {}", err);
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let (mut config, validation) = Config::load_validated(cli.config.as_deref())?;
    if let Some(cache) = cli.cache {
        config.cache_path = cache;
    }
    if cli.log_stderr {
        config.logging.file = None;
    }

    let target = logging::init(&config.logging)?;
    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }
    tracing::info!("geoloc started (logging to {})", target);

    let resolver = Resolver::new(&config)?;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    let locations = match frontend::choose_source(cli.locations, cli.batch, stdin.is_terminal()) {
        InputSource::Arguments(locations) => locations,
        InputSource::Batch => frontend::read_batch(stdin.lock())?,
        InputSource::Interactive => frontend::prompt_locations(stdin.lock(), &mut stdout)?,
    };

    if locations.is_empty() {
        println!("No locations provided. Exiting.");
        return Ok(ExitCode::FAILURE);
    }

    frontend::run_locations(&resolver, &locations, &mut stdout).await?;
    Ok(ExitCode::SUCCESS)
}
