//! Credential bootstrap: load the persisted key or wait for the user to supply one.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    error::WeatherError,
    model::Credential,
    storage::{PreferenceKey, PreferenceStore},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingCredential,
    Ready,
}

/// Owns the API credential. Once `Ready`, it stays `Ready`.
#[derive(Debug)]
pub struct CredentialManager {
    store: Arc<dyn PreferenceStore>,
    credential: Option<Credential>,
}

impl CredentialManager {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store, credential: None }
    }

    pub fn state(&self) -> SessionState {
        if self.credential.is_some() { SessionState::Ready } else { SessionState::AwaitingCredential }
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Read the persisted key, if any. A stored value that no longer validates
    /// counts as absent; a storage failure is logged and also counts as absent.
    pub fn load_credential(&mut self) -> SessionState {
        match self.store.get(PreferenceKey::ApiKey) {
            Ok(Some(raw)) => match Credential::parse(&raw) {
                Ok(credential) => {
                    debug!(?credential, "loaded persisted credential");
                    self.credential = Some(credential);
                }
                Err(err) => warn!(%err, "ignoring persisted credential"),
            },
            Ok(None) => debug!("no persisted credential"),
            Err(err) => warn!(error = %err, key = PreferenceKey::ApiKey.as_str(), "failed to read preference store"),
        }

        self.state()
    }

    /// Validate and persist a user-supplied key. On error nothing changes.
    pub fn submit_credential(&mut self, raw: &str) -> Result<(), WeatherError> {
        let credential = Credential::parse(raw)?;

        self.store
            .set(PreferenceKey::ApiKey, credential.expose())
            .map_err(|e| WeatherError::Storage(format!("{e:#}")))?;

        info!(?credential, "credential saved");
        self.credential = Some(credential);
        Ok(())
    }
}
