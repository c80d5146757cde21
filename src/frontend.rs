//! Presentation adapters over a single [`Geolocate`] implementation.
//!
//! Locations come from the command line, an interactive prompt, or a block
//! of newline-separated text; all of them are resolved and rendered the
//! same way.

use geoloc_geocode::{GeoLocation, Geolocate};
use std::io::{self, BufRead, Write};

/// Word that ends the interactive prompt (case-insensitive)
const DONE: &str = "done";

#[derive(Debug, PartialEq, Eq)]
pub enum InputSource {
    Arguments(Vec<String>),
    Batch,
    Interactive,
}

/// Positional arguments win; otherwise read stdin in batch mode when asked
/// to or when stdin is not a terminal, and prompt otherwise.
pub fn choose_source(locations: Vec<String>, batch: bool, stdin_is_terminal: bool) -> InputSource {
    if !locations.is_empty() {
        InputSource::Arguments(locations)
    } else if batch || !stdin_is_terminal {
        InputSource::Batch
    } else {
        InputSource::Interactive
    }
}

/// Every non-blank line is a location.
pub fn read_batch<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut locations = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            locations.push(line.to_string());
        }
    }
    Ok(locations)
}

/// Prompt for one location per line until "done", an empty line, or EOF.
pub fn prompt_locations<R: BufRead, W: Write>(mut reader: R, out: &mut W) -> io::Result<Vec<String>> {
    writeln!(out, "Enter location inputs one at a time (type '{}' to finish):", DONE)?;
    writeln!(out, "  For city/state, use the format: 'City, State' (e.g., Madison, WI)")?;
    writeln!(out, "  For ZIP code, enter the ZIP (e.g., 90210)")?;
    writeln!(out, "  Do not use any special characters")?;

    let mut locations = Vec::new();
    loop {
        write!(out, "Enter location: ")?;
        out.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }

        let input = line.trim_end_matches(['\r', '\n']);
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(DONE) {
            break;
        }
        locations.push(input.to_string());
    }

    Ok(locations)
}

pub fn render(location: &str, result: Option<&GeoLocation>) -> String {
    match result {
        Some(found) => format!(
            "Result: {}\nLatitude: {}\nLongitude: {}",
            found.display_name(),
            found.lat,
            found.lon
        ),
        None => format!("No data available for: {}", location),
    }
}

/// Resolve each location in turn and write the results. Returns how many resolved.
pub async fn run_locations<G: Geolocate, W: Write>(
    resolver: &G,
    locations: &[String],
    out: &mut W,
) -> io::Result<usize> {
    let mut resolved = 0;

    for location in locations {
        writeln!(out, "\nProcessing: {}", location)?;

        let result = resolver.geolocate(location).await;
        let output = render(location, result.as_ref());
        writeln!(out, "{}", output)?;

        match result {
            Some(_) => {
                resolved += 1;
                tracing::debug!("Output for {}:\n{}", location, output);
            }
            None => tracing::warn!("{}", output),
        }
    }

    tracing::info!("Resolved {} of {} locations", resolved, locations.len());
    Ok(resolved)
}
