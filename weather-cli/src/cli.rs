use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use disaster_weather_core::{
    Alert, Config, SearchCriteria, SearchMode, SearchState, WeatherClient, WeatherError,
    WeatherPanel, WeatherResult,
};
use inquire::{Password, PasswordDisplayMode, Select};
use serde::Serialize;
use tracing::debug;

use crate::display;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "dweather", version, about = "Weather lookup with disaster alerts")]
pub struct Cli {
    /// Log more to stderr (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and default search mode.
    Configure,

    /// Show current weather, forecast and disaster alerts.
    Show {
        /// City name or station id (domestic), or city, airport code or
        /// "lat,long" (global).
        query: String,

        /// Search mode; defaults to the configured one.
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Print the result and alerts as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the domestic weather stations.
    Stations {
        /// Only stations whose name or id contains this text.
        #[arg(long)]
        filter: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Domestic,
    Global,
}

impl From<ModeArg> for SearchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Domestic => SearchMode::Domestic,
            ModeArg::Global => SearchMode::Global,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    result: &'a WeatherResult,
    alerts: Vec<Alert>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { query, mode, json } => {
                let config = Config::load()?;
                let mode = mode.map(SearchMode::from).unwrap_or(config.default_mode);
                let client = Arc::new(WeatherClient::from_config(config)?);
                show(client, mode, query, json).await
            }
            Command::Stations { filter } => {
                let client = WeatherClient::from_config(Config::load()?)?;
                match client.stations().await {
                    Ok(dir) => {
                        print!("{}", display::render_stations(&dir, filter.as_deref()));
                        Ok(ExitCode::SUCCESS)
                    }
                    Err(err) => Ok(report_failure("Failed to fetch stations", &err)),
                }
            }
        }
    }
}

fn configure() -> anyhow::Result<ExitCode> {
    let mut config = Config::load_file()?;

    let api_key = Password::new("Weather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());

    let mode = Select::new("Default search mode:", SearchMode::all().to_vec())
        .prompt()
        .context("Failed to read default search mode")?;
    config.set_default_mode(mode);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(ExitCode::SUCCESS)
}

async fn show(
    client: Arc<WeatherClient>,
    mode: SearchMode,
    query: String,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let criteria = match mode {
        SearchMode::Domestic => SearchCriteria::domestic(resolve_station(&client, query).await),
        SearchMode::Global => SearchCriteria::global(query),
    };

    let panel = WeatherPanel::new(client);
    panel.submit(criteria).await;

    match panel.state() {
        SearchState::Success(result) => {
            let alerts = disaster_weather_core::derive_alerts(&result);
            if json {
                let report = JsonReport { result: &result, alerts };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", display::render_result(&result, &alerts));
            }
            Ok(ExitCode::SUCCESS)
        }
        SearchState::Failed { error, .. } => {
            Ok(report_failure("Failed to fetch weather data", &error))
        }
        SearchState::Idle | SearchState::Loading { .. } => Ok(ExitCode::FAILURE),
    }
}

/// Numeric queries are treated as station ids when the directory knows them.
async fn resolve_station(client: &WeatherClient, query: String) -> String {
    let trimmed = query.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return query;
    }

    match client.stations().await {
        Ok(dir) => dir.resolve_city(trimmed).to_string(),
        Err(err) => {
            debug!(%err, "station lookup failed, using query as city name");
            query
        }
    }
}

fn report_failure(context: &str, err: &WeatherError) -> ExitCode {
    match err {
        WeatherError::Configuration { .. } | WeatherError::Validation { .. } => {
            eprintln!("{err}");
        }
        _ => eprintln!("{context}: {err}"),
    }
    if err.is_retryable() {
        eprintln!("You can retry the same command.");
    }
    ExitCode::FAILURE
}
