//! Where "use my location" gets its coordinates from.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};
use tracing::{debug, warn};

use crate::{config::GeolocationSettings, error::GeolocationError, model::Coordinates};

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("skyview/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    /// A single position reading.
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Always answers with the same coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator {
    position: Coordinates,
}

impl FixedGeolocator {
    pub fn new(position: Coordinates) -> Self {
        Self { position }
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.position)
    }
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Approximate position from an IP lookup service such as ip-api.com.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    endpoint: String,
    http: Client,
}

impl IpGeolocator {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, GeolocationError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GeolocationError::Unavailable(e.to_string()))?;

        Ok(Self { endpoint: endpoint.into(), http })
    }
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        let response = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| GeolocationError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(GeolocationError::PermissionDenied);
            }
            status if !status.is_success() => {
                return Err(GeolocationError::Unavailable(format!("HTTP {status}")));
            }
            _ => {}
        }

        let body: IpLookupResponse = response
            .json()
            .await
            .map_err(|e| GeolocationError::Unavailable(format!("bad lookup response: {e}")))?;

        if body.status.as_deref().is_some_and(|s| s != "success") {
            let reason = body.message.unwrap_or_else(|| "lookup failed".to_string());
            return Err(GeolocationError::Unavailable(reason));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => {
                debug!(lat, lon, "resolved position from IP lookup");
                Ok(Coordinates { lat, lon })
            }
            _ => Err(GeolocationError::Unavailable("lookup returned no coordinates".to_string())),
        }
    }
}

/// Build the geolocator described by `settings`; `None` when disabled.
pub fn geolocator_from_settings(settings: &GeolocationSettings) -> Option<Box<dyn Geolocator>> {
    if !settings.enabled {
        return None;
    }

    if let Some(position) = settings.fixed_position() {
        return Some(Box::new(FixedGeolocator::new(position)));
    }

    match IpGeolocator::new(settings.endpoint.clone()) {
        Ok(locator) => Some(Box::new(locator)),
        Err(err) => {
            warn!(%err, "geolocation disabled");
            None
        }
    }
}
