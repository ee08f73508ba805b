use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::{
    config::ApiSettings,
    error::WeatherError,
    model::{CurrentConditions, Credential, ForecastRecord, LocationQuery, RawWeather, Units},
};

use super::{RequestUrls, WeatherProvider};

/// Client for the OpenWeatherMap 2.5 `/weather` and `/forecast` endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    units: Units,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, WeatherError> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| WeatherError::Unknown(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            units: settings.units,
            http,
        })
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// Both request URLs for `query`, sharing the credential and unit parameters.
    pub fn build_urls(
        &self,
        credential: &Credential,
        query: &LocationQuery,
    ) -> Result<RequestUrls, WeatherError> {
        let mut params = query.query_pairs();
        params.push(("appid", credential.expose().to_string()));
        params.push(("units", self.units.as_str().to_string()));

        let build = |endpoint: &str| {
            Url::parse_with_params(&format!("{}/{endpoint}", self.base_url), &params)
                .map_err(|e| WeatherError::Unknown(format!("Invalid weather API URL: {e}")))
        };

        Ok(RequestUrls { current: build("weather")?, forecast: build("forecast")? })
    }

    /// GET `url` and return the body of a successful response.
    async fn fetch(&self, label: &'static str, url: Url) -> Result<String, WeatherError> {
        debug!(endpoint = label, url = %redacted(&url), "requesting");

        let res = self.http.get(url).send().await.map_err(WeatherError::from)?;

        let status = res.status();
        let body = res.text().await.map_err(WeatherError::from)?;

        if !status.is_success() {
            warn!(endpoint = label, %status, body = %truncate_body(&body), "weather API error");
            return Err(classify_status(label, status, &body));
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self, credential))]
    async fn retrieve(
        &self,
        credential: &Credential,
        query: &LocationQuery,
    ) -> Result<RawWeather, WeatherError> {
        let urls = self.build_urls(credential, query)?;

        // Wait for both outcomes so each failing body gets logged.
        let (current, forecast) =
            tokio::join!(self.fetch("current", urls.current), self.fetch("forecast", urls.forecast));

        let current_body = current?;
        let forecast_body = forecast?;

        let current: OwCurrentResponse = serde_json::from_str(&current_body).map_err(|e| {
            WeatherError::Unknown(format!("Failed to parse OpenWeather current JSON: {e}"))
        })?;
        let forecast: OwForecastResponse = serde_json::from_str(&forecast_body).map_err(|e| {
            WeatherError::Unknown(format!("Failed to parse OpenWeather forecast JSON: {e}"))
        })?;

        Ok(RawWeather { current: current.into(), records: forecast.into_records() })
    }
}

fn classify_status(label: &str, status: StatusCode, body: &str) -> WeatherError {
    let detail = format!("{label} request failed with status {status}: {}", truncate_body(body));
    match status {
        StatusCode::UNAUTHORIZED => WeatherError::Unauthorized(detail),
        StatusCode::NOT_FOUND => WeatherError::NotFound(detail),
        _ => WeatherError::Unknown(detail),
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwWeather {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    #[serde(default)]
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl From<OwCurrentResponse> for CurrentConditions {
    fn from(parsed: OwCurrentResponse) -> Self {
        let weather = parsed.weather.into_iter().next().unwrap_or_default();

        CurrentConditions {
            location_name: parsed.name,
            country: parsed.sys.country,
            condition: weather.main,
            description: weather.description,
            icon: weather.icon,
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

impl OwForecastResponse {
    fn into_records(self) -> Vec<ForecastRecord> {
        self.list
            .into_iter()
            .filter_map(|entry| {
                let Some(timestamp) = DateTime::<Utc>::from_timestamp(entry.dt, 0) else {
                    warn!(dt = entry.dt, "skipping forecast record with invalid timestamp");
                    return None;
                };
                let weather = entry.weather.into_iter().next().unwrap_or_default();

                Some(ForecastRecord {
                    timestamp,
                    temp_min: entry.main.temp_min,
                    temp_max: entry.main.temp_max,
                    description: weather.description,
                    icon: weather.icon,
                })
            })
            .collect()
    }
}

/// `url` with the `appid` value masked, for logs.
fn redacted(url: &Url) -> String {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "appid" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();

    let mut masked = url.clone();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinates;

    const KEY: &str = "0123456789abcdefghijklmno";

    fn client(units: Units) -> OpenWeatherClient {
        let settings = ApiSettings {
            base_url: "https://api.example.test/data/2.5/".into(),
            units,
            timeout_secs: None,
        };
        OpenWeatherClient::new(&settings).expect("client builds")
    }

    fn pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
    }

    #[test]
    fn city_urls_share_parameters() {
        let cred = Credential::parse(KEY).unwrap();
        let urls = client(Units::Imperial)
            .build_urls(&cred, &LocationQuery::City("São Paulo".into()))
            .unwrap();

        assert_eq!(urls.current.path(), "/data/2.5/weather");
        assert_eq!(urls.forecast.path(), "/data/2.5/forecast");

        let expected = vec![
            ("q".to_string(), "São Paulo".to_string()),
            ("appid".to_string(), KEY.to_string()),
            ("units".to_string(), "imperial".to_string()),
        ];
        assert_eq!(pairs(&urls.current), expected);
        assert_eq!(pairs(&urls.forecast), expected);
    }

    #[test]
    fn coordinate_urls_use_lat_lon() {
        let cred = Credential::parse(KEY).unwrap();
        let query = LocationQuery::Coordinates(Coordinates { lat: 51.5, lon: -0.12 });
        let urls = client(Units::Metric).build_urls(&cred, &query).unwrap();

        let got = pairs(&urls.current);
        assert!(got.contains(&("lat".into(), "51.5".into())));
        assert!(got.contains(&("lon".into(), "-0.12".into())));
        assert!(got.contains(&("units".into(), "metric".into())));
        assert!(!got.iter().any(|(k, _)| k == "q"));
    }

    #[test]
    fn redacted_masks_only_the_key() {
        let cred = Credential::parse(KEY).unwrap();
        let urls =
            client(Units::Imperial).build_urls(&cred, &LocationQuery::City("Paris".into())).unwrap();

        let masked = redacted(&urls.current);
        assert!(!masked.contains(KEY));
        assert!(masked.contains("q=Paris"));
    }

    #[test]
    fn status_classification() {
        assert!(matches!(
            classify_status("current", StatusCode::UNAUTHORIZED, "{}"),
            WeatherError::Unauthorized(_)
        ));
        assert!(matches!(
            classify_status("forecast", StatusCode::NOT_FOUND, "{}"),
            WeatherError::NotFound(_)
        ));
        assert!(matches!(
            classify_status("current", StatusCode::INTERNAL_SERVER_ERROR, "{}"),
            WeatherError::Unknown(_)
        ));
    }

    #[test]
    fn current_response_maps_first_weather_entry() {
        let parsed: OwCurrentResponse = serde_json::from_value(serde_json::json!({
            "name": "Paris",
            "sys": { "country": "FR" },
            "main": { "temp": 71.6, "feels_like": 70.2, "humidity": 40 },
            "weather": [
                { "main": "Clear", "description": "clear sky", "icon": "01d" },
                { "main": "Mist", "description": "mist", "icon": "50d" }
            ],
            "wind": { "speed": 4.1 }
        }))
        .unwrap();

        let current = CurrentConditions::from(parsed);
        assert_eq!(current.location_name, "Paris");
        assert_eq!(current.country, "FR");
        assert_eq!(current.condition, "Clear");
        assert_eq!(current.icon, "01d");
        assert_eq!(current.humidity_pct, 40);
    }

    #[test]
    fn forecast_response_keeps_valid_records() {
        let parsed: OwForecastResponse = serde_json::from_value(serde_json::json!({
            "list": [
                { "dt": 1_792_400_400, "main": { "temp_min": 50.0, "temp_max": 55.0 },
                  "weather": [{ "main": "Rain", "description": "light rain", "icon": "10d" }] },
                { "dt": 1_792_411_200, "main": { "temp_min": 48.0, "temp_max": 52.0 },
                  "weather": [] }
            ]
        }))
        .unwrap();

        let records = parsed.into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].description, "light rain");
        assert_eq!(records[1].description, "");
        assert_eq!(records[0].timestamp.timestamp(), 1_792_400_400);
    }

    #[test]
    fn truncate_long_body() {
        let body = "x".repeat(250);
        let t = truncate_body(&body);
        assert_eq!(t.len(), 203);
        assert!(t.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }
}
