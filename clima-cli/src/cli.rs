use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use clima_core::{
    Config, GeocodingClient, PlaceCandidate, SearchHistory, WeatherClient, WeatherSnapshot,
};

use crate::prompt::{self, MenuChoice};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "clima", version, about = "Interactive city search and weather lookup")]
pub struct Cli {
    /// Override the search history file location.
    #[arg(long, value_name = "FILE")]
    pub history_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store API credentials for the geocoding and weather services.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            None => run_menu(self.history_file).await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    config.mapbox_token = Some(prompt::read_secret("Mapbox access token:")?);
    config.openweather_key = Some(prompt::read_secret("OpenWeatherMap API key:")?);
    config.save()?;

    println!("Credentials saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn run_menu(history_file: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    // Missing credentials abort here, before any prompt is shown.
    let credentials = config.credentials()?;

    let geocoder = GeocodingClient::new(credentials.mapbox_token);
    let weather = WeatherClient::new(credentials.openweather_key);

    let history_path = match history_file {
        Some(path) => path,
        None => Config::history_file_path()?,
    };
    tracing::debug!("loading search history from {}", history_path.display());
    let mut history = SearchHistory::open(history_path);

    loop {
        match prompt::main_menu()? {
            MenuChoice::Search => search_flow(&geocoder, &weather, &mut history).await?,
            MenuChoice::History => {
                show_history(&history);
                prompt::pause()?;
            }
            MenuChoice::Exit => break,
        }
    }

    Ok(())
}

async fn search_flow(
    geocoder: &GeocodingClient,
    weather: &WeatherClient,
    history: &mut SearchHistory,
) -> Result<()> {
    let term = prompt::read_required("City:")?;
    let candidates = geocoder.resolve(&term).await;

    let Some(place) = prompt::pick_place(&candidates)? else {
        // Cancelled: straight back to the menu, nothing recorded.
        return Ok(());
    };

    history.add(&place.name);
    let snapshot = weather.resolve(place.latitude, place.longitude).await;

    println!("{}", report(place, snapshot.as_ref()));
    prompt::pause()?;
    Ok(())
}

fn show_history(history: &SearchHistory) {
    if history.is_empty() {
        println!("\nNo searches recorded yet.");
        return;
    }

    println!();
    for (i, place) in history.capitalized().iter().enumerate() {
        println!("{}. {place}", i + 1);
    }
}

/// Render the combined place + weather report. A missing snapshot renders as
/// an explicit "unavailable" line instead of failing the interaction.
fn report(place: &PlaceCandidate, weather: Option<&WeatherSnapshot>) -> String {
    let mut lines = vec![
        String::new(),
        "City information".to_string(),
        String::new(),
        format!("City: {}", place.name),
        format!("Lat: {}", place.latitude),
        format!("Lng: {}", place.longitude),
    ];

    match weather {
        Some(snapshot) => {
            lines.push(format!("Temperature: {}", snapshot.temp));
            lines.push(format!("Min: {}", snapshot.temp_min));
            lines.push(format!("Max: {}", snapshot.temp_max));
            lines.push(format!("Conditions: {}", snapshot.description));
        }
        None => lines.push("Weather: unavailable".to_string()),
    }

    lines.join("\n")
}
