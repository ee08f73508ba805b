use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WeatherError;

/// Minimum length of a plausible OpenWeatherMap key.
pub const MIN_CREDENTIAL_LEN: usize = 20;

/// A validated API key. Only [`Credential::parse`] builds one.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn parse(raw: &str) -> Result<Self, WeatherError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(WeatherError::Validation("Please enter a valid API key".to_string()));
        }

        if trimmed.chars().count() < MIN_CREDENTIAL_LEN {
            return Err(WeatherError::Validation(
                "API key appears to be too short. Please check and try again.".to_string(),
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<{} chars>)", self.0.len())
    }
}

/// Latitude/longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Where to fetch weather for.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates(Coordinates),
}

impl LocationQuery {
    /// Location selector as query pairs, e.g. `q=Paris` or `lat=..&lon=..`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::City(name) => vec![("q", name.clone())],
            LocationQuery::Coordinates(c) => {
                vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())]
            }
        }
    }
}

/// Unit system requested from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Imperial,
    Metric,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Imperial => "imperial",
            Units::Metric => "metric",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Imperial => "°F",
            Units::Metric => "°C",
        }
    }

    /// Multiplier from the API's native wind unit to the displayed one.
    /// Metric answers in m/s and is shown in km/h; imperial answers in mph.
    pub fn wind_factor(&self) -> f64 {
        match self {
            Units::Imperial => 1.0,
            Units::Metric => 3.6,
        }
    }

    pub fn wind_label(&self) -> &'static str {
        match self {
            Units::Imperial => "mph",
            Units::Metric => "km/h",
        }
    }
}

/// Snapshot of the current weather, in API native units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub country: String,
    /// Primary condition keyword, e.g. "Clear" or "Rain".
    pub condition: String,
    pub description: String,
    pub icon: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
}

/// One interval record of the forecast endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub timestamp: DateTime<Utc>,
    pub temp_min: f64,
    pub temp_max: f64,
    pub description: String,
    pub icon: String,
}

/// One calendar day of the aggregated forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub date: NaiveDate,
    pub label: String,
    pub max_temp: f64,
    pub min_temp: f64,
    pub icon: String,
    pub description: String,
}

/// Raw result of a joint retrieval, before aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawWeather {
    pub current: CurrentConditions,
    pub records: Vec<ForecastRecord>,
}

/// Background indicator keyed to the current condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Neutral,
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Snow,
    Thunderstorm,
    Mist,
    Fog,
    Haze,
}

impl Theme {
    pub fn from_condition(keyword: &str) -> Self {
        match keyword.trim().to_lowercase().as_str() {
            "clear" => Theme::Clear,
            "clouds" => Theme::Clouds,
            "rain" => Theme::Rain,
            "drizzle" => Theme::Drizzle,
            "snow" => Theme::Snow,
            "thunderstorm" => Theme::Thunderstorm,
            "mist" => Theme::Mist,
            "fog" => Theme::Fog,
            "haze" | "smoke" | "dust" | "sand" => Theme::Haze,
            _ => Theme::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Neutral => "neutral",
            Theme::Clear => "clear",
            Theme::Clouds => "clouds",
            Theme::Rain => "rain",
            Theme::Drizzle => "drizzle",
            Theme::Snow => "snow",
            Theme::Thunderstorm => "thunderstorm",
            Theme::Mist => "mist",
            Theme::Fog => "fog",
            Theme::Haze => "haze",
        }
    }
}

/// Current conditions and forecast from one successful retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastEntry>,
    pub theme: Theme,
    pub units: Units,
    pub fetched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_rejects_empty_and_blank() {
        for raw in ["", "   ", "\t\n"] {
            let err = Credential::parse(raw).unwrap_err();
            assert_eq!(err.user_message(), "Please enter a valid API key");
        }
    }

    #[test]
    fn credential_rejects_short_keys() {
        let err = Credential::parse("0123456789abcdefghi").unwrap_err();
        assert!(err.user_message().contains("too short"));
    }

    #[test]
    fn credential_accepts_twenty_chars_and_trims() {
        let cred = Credential::parse("  0123456789abcdefghij  ").expect("20 chars is valid");
        assert_eq!(cred.expose(), "0123456789abcdefghij");
    }

    #[test]
    fn credential_debug_is_redacted() {
        let cred = Credential::parse("0123456789abcdefghijSECRET").unwrap();
        let dbg = format!("{cred:?}");
        assert!(!dbg.contains("SECRET"));
        assert!(dbg.contains("26 chars"));
    }

    #[test]
    fn query_pairs_for_city_and_coordinates() {
        let city = LocationQuery::City("Paris".into());
        assert_eq!(city.query_pairs(), vec![("q", "Paris".to_string())]);

        let coords = LocationQuery::Coordinates(Coordinates { lat: 48.85, lon: 2.35 });
        assert_eq!(
            coords.query_pairs(),
            vec![("lat", "48.85".to_string()), ("lon", "2.35".to_string())]
        );
    }

    #[test]
    fn theme_from_condition_keyword() {
        assert_eq!(Theme::from_condition("Clear"), Theme::Clear);
        assert_eq!(Theme::from_condition("RAIN"), Theme::Rain);
        assert_eq!(Theme::from_condition("Smoke"), Theme::Haze);
        assert_eq!(Theme::from_condition("Tornado"), Theme::Neutral);
    }

    #[test]
    fn units_serde_lowercase() {
        let units: Units = serde_json::from_str("\"metric\"").unwrap();
        assert_eq!(units, Units::Metric);
        assert_eq!(Units::default().as_str(), "imperial");
    }
}
