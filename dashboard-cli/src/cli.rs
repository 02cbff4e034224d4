use anyhow::Context;
use clap::{Parser, Subcommand};
use dashboard_core::{
    Applied, Config, Dashboard, FileStore, HistoryStore, KeyValueStore, OpenWeatherClient,
    WeatherApi, client_from_config,
};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use std::{fmt, fs, path::PathBuf};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather and a 5-day forecast for a city.
    Search {
        /// City name.
        city: String,

        /// Also write the rendered dashboard page to this file.
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// List recent searches, most recent first.
    History,

    /// Interactive dashboard: search, or pick a recent city.
    Dashboard {
        /// Rewrite the rendered dashboard page to this file after every search.
        #[arg(long)]
        html: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::History => {
                let history = history_store(&config)?;
                output::print_history(&history.load());
                Ok(())
            }
            Command::Search { city, html } => {
                let mut dash = open_dashboard(&config)?;
                let applied = dash.submit(&city).await;
                report(&dash, applied.as_ref(), html.as_ref())?;
                Ok(())
            }
            Command::Dashboard { html } => {
                let dash = open_dashboard(&config)?;
                interactive(dash, html).await
            }
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    let key = Config::validate_api_key(&key).context("The key entered is not usable")?;
    config.set_api_key(&key);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn history_store(config: &Config) -> anyhow::Result<HistoryStore<FileStore>> {
    let dir = config.history_dir()?;
    tracing::debug!(dir = %dir.display(), "using history directory");
    Ok(HistoryStore::new(FileStore::new(dir)))
}

/// Fails before any request when the API key is missing.
fn open_dashboard(config: &Config) -> anyhow::Result<Dashboard<OpenWeatherClient, FileStore>> {
    let client = client_from_config(config)?;
    Ok(Dashboard::new(client, history_store(config)?))
}

fn report<A: WeatherApi, S: KeyValueStore>(
    dash: &Dashboard<A, S>,
    applied: Option<&Applied>,
    html: Option<&PathBuf>,
) -> anyhow::Result<()> {
    if applied.is_some() {
        output::print_view(dash.view());
    }

    if let Some(path) = html {
        fs::write(path, dash.view().to_page().into_string())
            .with_context(|| format!("Failed to write dashboard page: {}", path.display()))?;
    }

    Ok(())
}

enum Choice {
    Search,
    Recent(String),
    Quit,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Search => f.write_str("Search a city…"),
            Choice::Recent(city) => write!(f, "  {city}"),
            Choice::Quit => f.write_str("Quit"),
        }
    }
}

async fn interactive<A: WeatherApi, S: KeyValueStore>(
    mut dash: Dashboard<A, S>,
    html: Option<PathBuf>,
) -> anyhow::Result<()> {
    if let Some(city) = dash.startup_city() {
        let applied = dash.select_history(&city).await;
        report(&dash, Some(&applied), html.as_ref())?;
    }

    loop {
        let mut choices = vec![Choice::Search];
        choices.extend(dash.view().history.cities.iter().cloned().map(Choice::Recent));
        choices.push(Choice::Quit);

        let applied = match Select::new("What next?", choices).prompt()? {
            Choice::Search => {
                let input = Text::new("City:").prompt()?;
                dash.submit(&input).await
            }
            Choice::Recent(city) => Some(dash.select_history(&city).await),
            Choice::Quit => return Ok(()),
        };

        report(&dash, applied.as_ref(), html.as_ref())?;
    }
}
