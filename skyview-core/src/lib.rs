//! Core library for the `skyview` weather client.
//!
//! This crate defines:
//! - Configuration and durable preferences (API key, last searched city)
//! - Credential bootstrap and the retrieval pipeline against OpenWeatherMap
//! - Daily forecast aggregation and display formatting
//! - A toolkit-independent view state machine
//!
//! It is used by `skyview-cli`, but any front end implementing [`View`] can drive it.

pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod forecast;
pub mod geo;
pub mod model;
pub mod provider;
pub mod session;
pub mod storage;
pub mod ui;

pub use app::WeatherApp;
pub use config::{ApiSettings, Config, GeolocationSettings};
pub use error::{GeolocationError, WeatherError};
pub use model::{
    Coordinates, Credential, CurrentConditions, ForecastEntry, ForecastRecord, LocationQuery,
    RawWeather, Theme, Units, WeatherReport,
};
pub use provider::{OpenWeatherClient, RequestUrls, WeatherProvider};
pub use session::{CredentialManager, SessionState};
pub use storage::{FileStore, MemoryStore, PreferenceKey, PreferenceStore};
pub use ui::{Activity, Screen, View, ViewState};
