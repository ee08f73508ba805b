//! Application context: the credential manager and the retrieval pipeline
//! driving one [`View`].

use chrono::{Local, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::{GeolocationError, WeatherError},
    forecast::aggregate_daily,
    geo::{Geolocator, geolocator_from_settings},
    model::{Credential, LocationQuery, RawWeather, Theme, Units, WeatherReport},
    provider::{OpenWeatherClient, WeatherProvider},
    session::{CredentialManager, SessionState},
    storage::{PreferenceKey, PreferenceStore},
    ui::{View, ViewState},
};

pub struct WeatherApp {
    store: Arc<dyn PreferenceStore>,
    provider: Box<dyn WeatherProvider>,
    geolocator: Option<Box<dyn Geolocator>>,
    session: CredentialManager,
    units: Units,
    view: Box<dyn View>,
    state: ViewState,
}

impl std::fmt::Debug for WeatherApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApp")
            .field("provider", &self.provider)
            .field("geolocator", &self.geolocator)
            .field("session", &self.session.state())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl WeatherApp {
    pub fn new(
        store: Arc<dyn PreferenceStore>,
        provider: Box<dyn WeatherProvider>,
        view: Box<dyn View>,
    ) -> Self {
        Self {
            session: CredentialManager::new(store.clone()),
            store,
            provider,
            geolocator: None,
            units: Units::default(),
            view,
            state: ViewState::default(),
        }
    }

    /// OpenWeatherMap client and geolocator as described by `config`.
    pub fn from_config(
        config: &Config,
        store: Arc<dyn PreferenceStore>,
        view: Box<dyn View>,
    ) -> Result<Self, WeatherError> {
        let provider = OpenWeatherClient::new(&config.api)?;
        let units = provider.units();

        Ok(Self::new(store, Box::new(provider), view)
            .with_units(units)
            .with_geolocator(geolocator_from_settings(&config.geolocation)))
    }

    pub fn with_geolocator(mut self, geolocator: Option<Box<dyn Geolocator>>) -> Self {
        self.geolocator = geolocator;
        self
    }

    /// Must match the unit system the provider requests.
    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// Startup: load the credential and prefill the last searched city.
    pub fn start(&mut self) -> SessionState {
        let session = self.session.load_credential();
        if session == SessionState::Ready {
            self.state.ready();
        }
        self.state.city_input = self.last_city();
        self.render();
        session
    }

    /// Search the prefilled city again, if there is one and a credential exists.
    pub async fn resume_last_city(&mut self) -> Option<Result<WeatherReport, WeatherError>> {
        if self.session.state() != SessionState::Ready {
            return None;
        }
        let city = self.state.city_input.clone()?;

        info!(%city, "searching last city");
        Some(self.search_by_city(&city).await)
    }

    pub fn submit_credential(&mut self, raw: &str) -> Result<(), WeatherError> {
        match self.session.submit_credential(raw) {
            Ok(()) => {
                self.state.ready();
                self.render();
                Ok(())
            }
            Err(err) => {
                info!(error = %err, "credential rejected");
                if self.session.state() == SessionState::AwaitingCredential {
                    self.state.credential_rejected(err.user_message());
                } else {
                    self.state.show_error(err.user_message());
                }
                self.render();
                Err(err)
            }
        }
    }

    /// Look up `city`; on success it becomes the remembered last city.
    pub async fn search_by_city(&mut self, city: &str) -> Result<WeatherReport, WeatherError> {
        let credential = self.require_credential()?;

        let city = city.trim();
        if city.is_empty() {
            return Err(self.fail(WeatherError::Validation("Please enter a city name".to_string())));
        }

        self.state.city_input = Some(city.to_string());
        self.state.loading();
        self.render();

        let report = self.run(&credential, LocationQuery::City(city.to_string())).await?;

        if let Err(err) = self.store.set(PreferenceKey::LastCity, city) {
            warn!(error = %err, key = PreferenceKey::LastCity.as_str(), "failed to remember city");
        }

        Ok(report)
    }

    /// Look up weather at the geolocator's position. Nothing is persisted.
    pub async fn search_by_location(&mut self) -> Result<WeatherReport, WeatherError> {
        let credential = self.require_credential()?;

        if self.geolocator.is_none() {
            return Err(self.fail(WeatherError::GeolocationUnsupported));
        }

        self.state.loading();
        self.render();

        let lookup = match self.geolocator.as_deref() {
            Some(geolocator) => geolocator.current_position().await,
            None => Err(GeolocationError::Unavailable("geolocation disabled".to_string())),
        };
        let position = match lookup {
            Ok(position) => position,
            Err(err) => return Err(self.fail(err.into())),
        };

        debug!(lat = position.lat, lon = position.lon, "searching by coordinates");
        self.run(&credential, LocationQuery::Coordinates(position)).await
    }

    async fn run(
        &mut self,
        credential: &Credential,
        query: LocationQuery,
    ) -> Result<WeatherReport, WeatherError> {
        let fetched = self.provider.retrieve(credential, &query).await;
        match fetched {
            Ok(raw) => {
                let report = self.build_report(raw);
                self.state.show_report(report.clone());
                self.render();
                Ok(report)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn build_report(&self, raw: RawWeather) -> WeatherReport {
        let now = Local::now();
        let forecast = aggregate_daily(&raw.records, now.date_naive(), &Local);

        WeatherReport {
            theme: Theme::from_condition(&raw.current.condition),
            current: raw.current,
            forecast,
            units: self.units,
            fetched_at: now.with_timezone(&Utc),
        }
    }

    fn require_credential(&mut self) -> Result<Credential, WeatherError> {
        if let Some(credential) = self.session.credential().cloned() {
            return Ok(credential);
        }
        Err(self.fail(WeatherError::CredentialMissing))
    }

    fn last_city(&self) -> Option<String> {
        match self.store.get(PreferenceKey::LastCity) {
            Ok(city) => city.filter(|c| !c.trim().is_empty()),
            Err(err) => {
                warn!(error = %err, key = PreferenceKey::LastCity.as_str(), "failed to read last city");
                None
            }
        }
    }

    /// Show the user-facing message, keep the detail in the log.
    fn fail(&mut self, err: WeatherError) -> WeatherError {
        info!(error = %err, "operation failed");
        self.state.show_error(err.user_message());
        self.render();
        err
    }

    fn render(&mut self) {
        self.view.render(&self.state);
    }
}
