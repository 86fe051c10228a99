use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{Password, Text};
use tracing::debug;
use weather_core::{
    Config, FileStore, KeyValueStore, LastSearch, UiState, WeatherPresenter, fetcher_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a city or coordinates")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and default country.
    Configure,

    /// Show current weather. With no location, repeats the last search.
    Show(ShowArgs),

    /// Print the remembered last search.
    Last,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// City name.
    #[arg(conflicts_with_all = ["lat", "lon"], value_parser = non_blank)]
    pub city: Option<String>,

    /// State code, e.g. "TX".
    #[arg(long, requires = "city")]
    pub state: Option<String>,

    /// Country code; defaults to the configured country.
    #[arg(long, requires = "city")]
    pub country: Option<String>,

    /// Latitude in decimal degrees.
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees.
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// API key override for this run.
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        debug!(command = ?self.command, "dispatching command");
        match self.command {
            Command::Configure => configure(),
            Command::Show(args) => show(args).await,
            Command::Last => {
                let store = open_store()?;
                match LastSearch::load(store.as_ref()) {
                    Some(last) => println!("{}", render::last_search(&last)),
                    None => println!("No previous search."),
                }
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let already_configured = config.is_configured();
    let prompt = if already_configured {
        "OpenWeather API key (leave empty to keep the current one):"
    } else {
        "OpenWeather API key:"
    };

    let api_key = Password::new(prompt)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    let api_key = api_key.trim();
    if api_key.is_empty() && !already_configured {
        bail!("API key must not be empty");
    }

    let country = Text::new("Default country code:")
        .with_default(&config.default_country)
        .prompt()
        .context("Failed to read default country")?;

    if !api_key.is_empty() {
        config.set_api_key(api_key.to_string());
    }
    config.default_country = country.trim().to_string();
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(args: ShowArgs) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(key) = args.api_key {
        config.set_api_key(key);
    }

    let fetcher = fetcher_from_config(&config)?;
    let presenter = WeatherPresenter::new(fetcher, open_store()?);

    let task = match (args.city, args.lat.zip(args.lon)) {
        (Some(city), _) => {
            let country = args.country.unwrap_or_else(|| config.default_country.clone());
            presenter.search_by_name(&city, args.state.as_deref(), &country)
        }
        (None, Some((lat, lon))) => presenter.search_by_location(lat, lon),
        (None, None) => match presenter.restore_last_search(&config.default_country) {
            Some(task) => task,
            None => bail!("No location given and no previous search to repeat"),
        },
    };

    if !args.json && presenter.state().is_some_and(|s| s.is_loading()) {
        eprintln!("Loading...");
    }
    task.await.context("Weather task panicked")?;

    match presenter.state() {
        Some(UiState::Success(display)) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&display)?);
            } else {
                println!("{}", render::weather(&display));
            }
            Ok(())
        }
        Some(UiState::Error(message)) => bail!(message),
        Some(UiState::Loading) | None => bail!("Weather lookup did not complete"),
    }
}

fn non_blank(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err("city name must not be empty".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

fn open_store() -> anyhow::Result<Arc<dyn KeyValueStore>> {
    Ok(Arc::new(FileStore::open(Config::state_file_path()?)?))
}
