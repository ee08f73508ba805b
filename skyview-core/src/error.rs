use thiserror::Error;

/// Why a geolocation lookup did not produce coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location service unavailable: {0}")]
    Unavailable(String),
}

/// Every failure the client can surface to the user.
///
/// `Display` keeps the diagnostic detail for logs; [`WeatherError::user_message`]
/// is what the view shows.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Bad input rejected before any network call (credential format, empty city).
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("no API key has been configured")]
    CredentialMissing,

    #[error("geolocation is not supported")]
    GeolocationUnsupported,

    #[error("geolocation failed: {0}")]
    Geolocation(#[from] GeolocationError),

    /// The provider rejected the credential (HTTP 401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The provider does not know the location (HTTP 404).
    #[error("location not found: {0}")]
    NotFound(String),

    /// The request never got a response: DNS, refused connection, timeout.
    #[error("network failure: {0}")]
    Network(String),

    #[error("unexpected failure: {0}")]
    Unknown(String),

    #[error("preference storage failed: {0}")]
    Storage(String),
}

impl WeatherError {
    /// Message suitable for the error display.
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::Validation(msg) => msg.clone(),
            WeatherError::CredentialMissing => {
                "API key not found. Please run `skyview configure` and enter your API key."
                    .to_string()
            }
            WeatherError::GeolocationUnsupported => {
                "Geolocation is not supported by this client configuration.".to_string()
            }
            WeatherError::Geolocation(_) => {
                "Unable to access your location. Please search for a city instead.".to_string()
            }
            WeatherError::Unauthorized(_) => {
                "Invalid API key. Please check your key and try again.".to_string()
            }
            WeatherError::NotFound(_) => "City not found. Please try again.".to_string(),
            WeatherError::Network(_) => {
                "Network error. Please check your connection and try again.".to_string()
            }
            WeatherError::Unknown(_) => {
                "Unable to fetch weather data. Please try again.".to_string()
            }
            WeatherError::Storage(_) => "Unable to save your settings. Please try again.".to_string(),
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            return WeatherError::Network(err.to_string());
        }

        match err.status() {
            Some(reqwest::StatusCode::UNAUTHORIZED) => WeatherError::Unauthorized(err.to_string()),
            Some(reqwest::StatusCode::NOT_FOUND) => WeatherError::NotFound(err.to_string()),
            _ => WeatherError::Unknown(err.to_string()),
        }
    }
}
