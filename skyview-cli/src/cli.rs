use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use inquire::{Password, PasswordDisplayMode, Text};
use std::{path::PathBuf, process::ExitCode, sync::Arc};

use skyview_core::{Config, FileStore, SessionState, Units, WeatherApp, WeatherError};

use crate::view::TerminalView;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyview", version, about = "Current weather and a 7-day forecast")]
pub struct Cli {
    /// Config file; defaults to the platform config directory.
    #[arg(long, global = true, env = "SKYVIEW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Unit system, overriding the config file.
    #[arg(long, global = true, value_enum)]
    pub units: Option<UnitsArg>,

    /// More log output (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Without a subcommand, starts an interactive session.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UnitsArg {
    Imperial,
    Metric,
}

impl From<UnitsArg> for Units {
    fn from(value: UnitsArg) -> Self {
        match value {
            UnitsArg::Imperial => Units::Imperial,
            UnitsArg::Metric => Units::Metric,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Enter and save your OpenWeatherMap API key.
    Configure {
        /// Key to store; prompts when absent.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Show weather for a city.
    Show {
        /// City name; defaults to the last searched city.
        city: Option<String>,
    },

    /// Show weather for your current location.
    Here {
        /// Latitude to use instead of looking the position up.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude to use instead of looking the position up.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };
        let mut config = Config::load_from(&path)?;
        tracing::debug!(path = %path.display(), "configuration loaded");

        if let Some(units) = self.units {
            config.api.units = units.into();
        }
        if let Some(Command::Here { lat: Some(lat), lon: Some(lon) }) = &self.command {
            config.geolocation.enabled = true;
            config.geolocation.latitude = Some(*lat);
            config.geolocation.longitude = Some(*lon);
        }

        let store = Arc::new(FileStore::new(&path));
        let mut app = WeatherApp::from_config(&config, store, Box::new(TerminalView::default()))
            .context("Failed to set up the weather client")?;

        match self.command {
            Some(Command::Configure { api_key }) => {
                match api_key {
                    Some(raw) => app.submit_credential(&raw)?,
                    None => prompt_credential(&mut app)?,
                }
                println!("API key saved to {}", path.display());
                Ok(ExitCode::SUCCESS)
            }
            Some(Command::Show { city }) => {
                ensure_credential(&mut app)?;
                let city = match city.or_else(|| app.state().city_input.clone()) {
                    Some(city) => city,
                    None => Text::new("City:").prompt().context("Failed to read city name")?,
                };
                Ok(exit_code(app.search_by_city(&city).await.is_ok()))
            }
            Some(Command::Here { .. }) => {
                ensure_credential(&mut app)?;
                Ok(exit_code(app.search_by_location().await.is_ok()))
            }
            None => {
                ensure_credential(&mut app)?;
                interactive(&mut app).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Load the stored key, or ask for one until a valid key is given.
fn ensure_credential(app: &mut WeatherApp) -> anyhow::Result<()> {
    if app.start() == SessionState::AwaitingCredential {
        prompt_credential(app)?;
    }
    Ok(())
}

fn prompt_credential(app: &mut WeatherApp) -> anyhow::Result<()> {
    loop {
        let raw = Password::new("OpenWeatherMap API key:")
            .without_confirmation()
            .with_display_mode(PasswordDisplayMode::Masked)
            .with_help_message("Get a free key at https://openweathermap.org/api")
            .prompt()
            .context("Failed to read API key")?;

        match app.submit_credential(&raw) {
            Ok(()) => return Ok(()),
            // Already shown by the view; ask again.
            Err(WeatherError::Validation(_)) => continue,
            Err(err) => return Err(err.into()),
        }
    }
}

async fn interactive(app: &mut WeatherApp) -> anyhow::Result<()> {
    let _ = app.resume_last_city().await;

    loop {
        let mut prompt = Text::new("City:")
            .with_help_message("'here' for your location, empty line to quit");
        let placeholder = app.state().city_input.clone();
        if let Some(last) = placeholder.as_deref() {
            prompt = prompt.with_placeholder(last);
        }

        let input = prompt.prompt().context("Failed to read city name")?;
        let input = input.trim();

        // Outcomes, errors included, are rendered by the view.
        match input {
            "" => return Ok(()),
            "here" => {
                let _ = app.search_by_location().await;
            }
            city => {
                let _ = app.search_by_city(city).await;
            }
        }
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
