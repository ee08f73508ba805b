use async_trait::async_trait;
use reqwest::Url;
use std::fmt::Debug;

use crate::{
    error::WeatherError,
    model::{Credential, LocationQuery, RawWeather},
};

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// The pair of endpoints hit for one retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrls {
    pub current: Url,
    pub forecast: Url,
}

/// Source of current conditions plus interval forecast for one location.
///
/// Implementations fetch both halves and either return both or fail as a whole.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn retrieve(
        &self,
        credential: &Credential,
        query: &LocationQuery,
    ) -> Result<RawWeather, WeatherError>;
}
