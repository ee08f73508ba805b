use anyhow::Result;
use std::{
    collections::HashMap,
    fmt::Debug,
    path::PathBuf,
    sync::Mutex,
};

use crate::config::Config;

/// The two values that survive between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    ApiKey,
    LastCity,
}

impl PreferenceKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::ApiKey => "api_key",
            PreferenceKey::LastCity => "last_city",
        }
    }
}

/// Durable string storage; last writer wins.
pub trait PreferenceStore: Send + Sync + Debug {
    fn get(&self, key: PreferenceKey) -> Result<Option<String>>;
    fn set(&self, key: PreferenceKey, value: &str) -> Result<()>;
}

/// Keeps preferences in the TOML config file, next to the other settings.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: PreferenceKey) -> Result<Option<String>> {
        let cfg = Config::load_from(&self.path)?;
        Ok(match key {
            PreferenceKey::ApiKey => cfg.api_key,
            PreferenceKey::LastCity => cfg.last_city,
        })
    }

    fn set(&self, key: PreferenceKey, value: &str) -> Result<()> {
        let mut cfg = Config::load_from(&self.path)?;
        match key {
            PreferenceKey::ApiKey => cfg.api_key = Some(value.to_string()),
            PreferenceKey::LastCity => cfg.last_city = Some(value.to_string()),
        }
        cfg.save_to(&self.path)
    }
}

/// Process-local store; nothing is written to disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<PreferenceKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: PreferenceKey, value: &str) -> Self {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key, value.to_string());
        }
        self
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: PreferenceKey) -> Result<Option<String>> {
        let values = self.values.lock().map_err(|_| anyhow::anyhow!("preference store poisoned"))?;
        Ok(values.get(&key).cloned())
    }

    fn set(&self, key: PreferenceKey, value: &str) -> Result<()> {
        let mut values =
            self.values.lock().map_err(|_| anyhow::anyhow!("preference store poisoned"))?;
        values.insert(key, value.to_string());
        Ok(())
    }
}
