//! What the user currently sees, independent of how it is drawn.

use crate::model::{Theme, WeatherReport};

#[derive(Debug, Clone, PartialEq)]
pub enum Activity {
    Idle,
    Loading,
    ShowingResult(Box<WeatherReport>),
    ShowingError(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Credential entry, with the last validation message if any.
    AwaitingCredential { error: Option<String> },
    Ready(Activity),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub screen: Screen,
    /// Prefill for the city entry control.
    pub city_input: Option<String>,
    pub theme: Theme,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            screen: Screen::AwaitingCredential { error: None },
            city_input: None,
            theme: Theme::Neutral,
        }
    }
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self.screen, Screen::Ready(Activity::Loading))
    }

    pub fn error(&self) -> Option<&str> {
        match &self.screen {
            Screen::AwaitingCredential { error } => error.as_deref(),
            Screen::Ready(Activity::ShowingError(msg)) => Some(msg),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        match &self.screen {
            Screen::Ready(Activity::ShowingResult(report)) => Some(report),
            _ => None,
        }
    }

    pub(crate) fn credential_rejected(&mut self, message: String) {
        self.screen = Screen::AwaitingCredential { error: Some(message) };
    }

    pub(crate) fn ready(&mut self) {
        self.screen = Screen::Ready(Activity::Idle);
    }

    /// A new operation starts: stale errors and results are dropped.
    pub(crate) fn loading(&mut self) {
        self.screen = Screen::Ready(Activity::Loading);
    }

    pub(crate) fn show_report(&mut self, report: WeatherReport) {
        self.theme = report.theme;
        self.screen = Screen::Ready(Activity::ShowingResult(Box::new(report)));
    }

    /// Errors before a credential exists stay on the credential screen.
    pub(crate) fn show_error(&mut self, message: String) {
        self.screen = match self.screen {
            Screen::AwaitingCredential { .. } => Screen::AwaitingCredential { error: Some(message) },
            Screen::Ready(_) => Screen::Ready(Activity::ShowingError(message)),
        };
    }
}

/// Receives every state transition.
pub trait View: Send {
    fn render(&mut self, state: &ViewState);
}
