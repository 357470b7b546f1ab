//! `get_weather_forecast` tool backed by OpenWeatherMap.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::{debug, info};

use super::dates::{parse_date, DATE_FORMAT};
use super::json_text;
use crate::error::TripError;
use crate::provider::http::shared_client;
use crate::tools::{AgentTool, AgentToolParameters, Tool, ToolExecutionContext};

pub const TOOL_NAME: &str = "get_weather_forecast";
pub const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org";

const DESCRIPTION: &str = "Get the weather forecast for a city using OpenWeatherMap. \
Only today and the next few days are available.";

const GEOCODE_PATH: &str = "/geo/1.0/direct";
const FORECAST_PATH: &str = "/data/2.5/forecast";
const FORECAST_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Forecast lookup: geocode the city, fetch the 5-day forecast, pick the
/// entry nearest the requested date.
#[derive(Debug, Clone)]
pub struct WeatherService {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    today: Option<NaiveDate>,
}

impl WeatherService {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: shared_client().clone(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            timeout: Duration::from_secs(crate::config::DEFAULT_REQUEST_TIMEOUT_SECS),
            today: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Pin "today" instead of reading the local clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Describe the forecast for `city` on `date` (or the next slot when no
    /// date is given). Transport failures are errors; everything else is a
    /// message for the model.
    pub async fn forecast(&self, city: &str, date: Option<&str>) -> Result<String, TripError> {
        let city = city.trim();
        if city.is_empty() {
            return Ok("Please provide a valid city name as a string.".to_string());
        }
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(
                "OpenWeatherMap API key is missing. Please set OPENWEATHER_API_KEY.".to_string(),
            );
        };

        let target = match date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => match parse_date(raw) {
                Ok(day) => Some(day),
                Err(_) => return Ok("Invalid date format. Please use YYYY-MM-DD.".to_string()),
            },
            None => None,
        };
        let today = self.today();
        if target.is_some_and(|day| day < today) {
            return Ok(format!(
                "Sorry, I can only provide weather forecasts for today or future dates. \
                 Please enter a valid date (today or later). For example, try: {}.",
                today.format(DATE_FORMAT)
            ));
        }

        let Some((lat, lon)) = self.geocode(city, api_key).await? else {
            return Ok(format!("Could not find coordinates for {city}."));
        };
        debug!(%city, lat, lon, "Geocoded city");

        let resp = self
            .client
            .get(format!("{}{FORECAST_PATH}", self.base_url))
            .timeout(self.timeout)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", api_key.to_string()),
                ("units", "imperial".to_string()),
            ])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Ok(format!("API error: {} - {body}", status.as_u16()));
        }
        let forecast: ForecastResponse = resp.json().await?;

        let Some(entry) = pick_entry(&forecast.list, target) else {
            return Ok(format!("No forecast data available for {city}."));
        };
        info!(%city, slot = %entry.dt_txt, "Forecast selected");

        let description = entry
            .weather
            .first()
            .map(|w| w.description.as_str())
            .unwrap_or_default();
        Ok(format!(
            "Weather forecast for {city} on {}: {}°F, {description}.",
            entry.dt_txt,
            json_text(entry.main.temp.as_ref()),
        ))
    }

    async fn geocode(&self, city: &str, api_key: &str) -> Result<Option<(f64, f64)>, TripError> {
        let resp = self
            .client
            .get(format!("{}{GEOCODE_PATH}", self.base_url))
            .timeout(self.timeout)
            .query(&[("q", city), ("limit", "1"), ("appid", api_key)])
            .send()
            .await?;
        if !resp.status().is_success() {
            debug!(%city, status = %resp.status(), "Geocoding failed");
            return Ok(None);
        }
        let places: Vec<GeoPlace> = resp.json().await?;
        Ok(places
            .into_iter()
            .next()
            .and_then(|p| Some((p.lat?, p.lon?))))
    }
}

/// The entry closest to midnight of `target`, or the first entry.
fn pick_entry(entries: &[ForecastEntry], target: Option<NaiveDate>) -> Option<&ForecastEntry> {
    let Some(midnight) = target.and_then(|d| d.and_hms_opt(0, 0, 0)) else {
        return entries.first();
    };
    entries
        .iter()
        .filter_map(|entry| {
            NaiveDateTime::parse_from_str(&entry.dt_txt, FORECAST_TIME_FORMAT)
                .ok()
                .map(|at| ((at - midnight).num_seconds().abs(), entry))
        })
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, entry)| entry)
        .or_else(|| entries.first())
}

#[derive(Debug, Deserialize)]
struct GeoPlace {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt_txt: String,
    #[serde(default)]
    main: ForecastMain,
    #[serde(default)]
    weather: Vec<WeatherCondition>,
}

#[derive(Debug, Default, Deserialize)]
struct ForecastMain {
    temp: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    #[serde(default)]
    description: String,
}

/// The `get_weather_forecast` tool backed by `service`.
pub fn weather_tool(service: Arc<WeatherService>) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        TOOL_NAME,
        DESCRIPTION,
        AgentToolParameters::object()
            .string("city", "City name (e.g. 'Paris', 'Tokyo', 'New York')", true)
            .string(
                "date",
                "Date in YYYY-MM-DD format (optional; only today and upcoming days)",
                false,
            )
            .build(),
        move |args, _ctx: ToolExecutionContext| {
            let service = Arc::clone(&service);
            async move {
                let city = args.get_str_opt("city").unwrap_or_default();
                let text = service.forecast(city, args.get_str_opt("date")).await?;
                Ok(serde_json::Value::String(text))
            }
        },
    ))
}
