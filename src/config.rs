use crate::errors::ConfigError;
use crate::quotes::Quote;
use serde::Deserialize;
use std::{collections::BTreeMap, env, fs, path::PathBuf, time::Duration};

const DEFAULT_CONFIG_PATH: &str = "fin_dash.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub port: u16,
    pub data_path: PathBuf,
    pub bridge_timeout_secs: u64,
    /// `[quotes.TICKER]` tables.
    pub quotes: BTreeMap<String, Quote>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 8080,
            data_path: PathBuf::from("data/ledger.json"),
            bridge_timeout_secs: 30,
            quotes: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn bridge_timeout(&self) -> Duration {
        Duration::from_secs(self.bridge_timeout_secs)
    }

    fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Overlays `PORT`, `APP_DATA_PATH` and `BRIDGE_TIMEOUT_SECS`.
    fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(value) = lookup("PORT") {
            self.port = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                key: "PORT",
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup("APP_DATA_PATH") {
            self.data_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("BRIDGE_TIMEOUT_SECS") {
            self.bridge_timeout_secs = value
                .trim()
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidEnv {
                    key: "BRIDGE_TIMEOUT_SECS",
                    value: value.clone(),
                })?;
        }
        Ok(self)
    }
}

/// Reads the optional TOML file named by `FIN_DASH_CONFIG`, then applies
/// environment overrides.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let path = env::var("FIN_DASH_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let settings = match fs::read_to_string(&path) {
        Ok(raw) => Settings::from_toml(&raw)?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Settings::default(),
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    settings.apply_env(|key| env::var(key).ok())
}
