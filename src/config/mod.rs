//! Configuration system (layered: code > env > settings file > defaults).

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Result, TripError};

/// Service key for the OpenAI chat model.
pub const OPENAI: &str = "openai";
/// Service key for the OpenWeatherMap API.
pub const OPENWEATHER: &str = "openweather";
/// Service key for the Amadeus self-service APIs.
pub const AMADEUS: &str = "amadeus";
/// Service key for the DuckDuckGo Instant Answer API.
pub const DUCKDUCKGO: &str = "duckduckgo";

const AMADEUS_SECRET: &str = "amadeus-secret";

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_ITERATIONS: usize = 15;
pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

const SETTINGS_FILE_NAME: &str = "tripmate.toml";

/// Values read from `tripmate.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_iterations: Option<usize>,
    pub currency: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl Settings {
    /// Parse a settings file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw).map_err(|e| {
            TripError::Configuration(format!("Invalid settings file {}: {e}", path.display()))
        })
    }

    pub fn from_toml(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// `<platform config dir>/tripmate/tripmate.toml`, when a home directory exists.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "tripmate")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE_NAME))
    }
}

/// Layered configuration for tripmate.
///
/// Credentials and base URLs are keyed by service ([`OPENAI`], [`OPENWEATHER`],
/// [`AMADEUS`], [`DUCKDUCKGO`]). Base URLs are only set to override the public
/// endpoints, which is how tests point tools at a mock server.
#[derive(Clone, Default)]
pub struct TripConfig {
    api_keys: HashMap<String, String>,
    base_urls: HashMap<String, String>,
    settings: Settings,
}

impl fmt::Debug for TripConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut services: Vec<&str> = self.api_keys.keys().map(String::as_str).collect();
        services.sort_unstable();
        f.debug_struct("TripConfig")
            .field("credentials_for", &services)
            .field("base_urls", &self.base_urls)
            .field("settings", &self.settings)
            .finish()
    }
}

impl TripConfig {
    /// Create an empty config with built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `.env`, the default settings file (if any) and environment variables.
    ///
    /// A malformed default settings file is logged and ignored.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let settings = match Settings::default_path().filter(|p| p.exists()) {
            Some(path) => Settings::from_file(&path).unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring settings file");
                Settings::default()
            }),
            None => Settings::default(),
        };
        Self::new().with_settings(settings).apply_env()
    }

    /// Like [`from_env`](Self::from_env) but with an explicit settings file,
    /// whose absence or parse failure is an error.
    pub fn load(settings_path: Option<&Path>) -> Result<Self> {
        match settings_path {
            Some(path) => {
                let _ = dotenvy::dotenv();
                let settings = Settings::from_file(path)?;
                debug!(path = %path.display(), "Loaded settings file");
                Ok(Self::new().with_settings(settings).apply_env())
            }
            None => Ok(Self::from_env()),
        }
    }

    fn apply_env(mut self) -> Self {
        let key_mappings = [
            ("OPENAI_API_KEY", OPENAI),
            ("OPENWEATHER_API_KEY", OPENWEATHER),
            ("AMADEUS_CLIENT_ID", AMADEUS),
            ("AMADEUS_CLIENT_SECRET", AMADEUS_SECRET),
        ];
        for (env_var, service) in key_mappings {
            if let Some(value) = non_empty_env(env_var) {
                self.set_api_key(service, value);
            }
        }

        let url_mappings = [
            ("OPENAI_BASE_URL", OPENAI),
            ("OPENWEATHER_BASE_URL", OPENWEATHER),
            ("AMADEUS_BASE_URL", AMADEUS),
            ("DUCKDUCKGO_BASE_URL", DUCKDUCKGO),
        ];
        for (env_var, service) in url_mappings {
            if let Some(value) = non_empty_env(env_var) {
                self.set_base_url(service, value);
            }
        }

        if let Some(model) = non_empty_env("TRIPMATE_MODEL") {
            self.settings.model = Some(model);
        }
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_api_key(&mut self, service: &str, key: impl Into<String>) {
        self.api_keys.insert(service.to_string(), key.into());
    }

    pub fn get_api_key(&self, service: &str) -> Option<&str> {
        self.api_keys.get(service).map(String::as_str)
    }

    /// Store both halves of the Amadeus client-credentials pair.
    pub fn set_amadeus_credentials(
        &mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) {
        self.set_api_key(AMADEUS, client_id);
        self.set_api_key(AMADEUS_SECRET, client_secret);
    }

    /// `(client_id, client_secret)` when both are configured.
    pub fn amadeus_credentials(&self) -> Option<(&str, &str)> {
        Some((self.get_api_key(AMADEUS)?, self.get_api_key(AMADEUS_SECRET)?))
    }

    pub fn set_base_url(&mut self, service: &str, url: impl Into<String>) {
        let url = url.into();
        self.base_urls
            .insert(service.to_string(), url.trim_end_matches('/').to_string());
    }

    pub fn get_base_url(&self, service: &str) -> Option<&str> {
        self.base_urls.get(service).map(String::as_str)
    }

    pub fn has_credentials(&self, service: &str) -> bool {
        match service {
            AMADEUS => self.amadeus_credentials().is_some(),
            other => self.get_api_key(other).is_some(),
        }
    }

    pub fn model(&self) -> &str {
        self.settings.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.settings.model = Some(model.into());
    }

    pub fn temperature(&self) -> f64 {
        self.settings.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn set_temperature(&mut self, temperature: f64) {
        self.settings.temperature = Some(temperature);
    }

    pub fn max_iterations(&self) -> usize {
        self.settings
            .max_iterations
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_ITERATIONS)
    }

    pub fn currency(&self) -> &str {
        self.settings.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    /// Per-request timeout for the travel back-ends.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.settings
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_documented_values() {
        let config = TripConfig::new();

        assert_eq!(config.model(), "gpt-3.5-turbo");
        assert!((config.temperature() - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.currency(), "USD");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.max_iterations(), DEFAULT_MAX_ITERATIONS);
    }

    #[test]
    fn amadeus_requires_both_halves() {
        let mut config = TripConfig::new();
        config.set_api_key(AMADEUS, "id-only");
        assert!(!config.has_credentials(AMADEUS));

        config.set_amadeus_credentials("id", "secret");
        assert_eq!(config.amadeus_credentials(), Some(("id", "secret")));
        assert!(config.has_credentials(AMADEUS));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let mut config = TripConfig::new();
        config.set_base_url(OPENWEATHER, "http://127.0.0.1:9000/");
        assert_eq!(config.get_base_url(OPENWEATHER), Some("http://127.0.0.1:9000"));
    }

    #[test]
    fn settings_file_overrides_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "model = \"gpt-4o-mini\"\ntemperature = 0.2\ncurrency = \"EUR\"\nmax_iterations = 4"
        )
        .unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        let config = TripConfig::new().with_settings(settings);

        assert_eq!(config.model(), "gpt-4o-mini");
        assert_eq!(config.currency(), "EUR");
        assert_eq!(config.max_iterations(), 4);
    }

    #[test]
    fn unknown_settings_keys_are_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "modle = \"typo\"").unwrap();

        let err = Settings::from_file(file.path()).unwrap_err();
        assert!(matches!(err, TripError::Configuration(msg) if msg.contains("Invalid settings file")));
    }

    #[test]
    fn zero_iterations_falls_back_to_default() {
        let config = TripConfig::new().with_settings(Settings {
            max_iterations: Some(0),
            ..Settings::default()
        });
        assert_eq!(config.max_iterations(), DEFAULT_MAX_ITERATIONS);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let mut config = TripConfig::new();
        config.set_api_key(OPENAI, "sk-very-secret");
        let rendered = format!("{config:?}");
        assert!(rendered.contains("openai"));
        assert!(!rendered.contains("sk-very-secret"));
    }
}
