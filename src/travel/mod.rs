//! Travel tools exposed to the model and the clients behind them.

pub mod amadeus;
pub mod catalog;
pub mod dates;
pub mod flights;
pub mod hotels;
pub mod recommendations;
pub mod weather;

use std::sync::Arc;

use crate::config::{self, TripConfig};
use crate::tools::ToolSet;

pub use amadeus::{AmadeusClient, FlightQuery};
pub use flights::FlightSearch;
pub use hotels::HotelSearch;
pub use recommendations::RecommendationService;
pub use weather::WeatherService;

/// Build the four travel tools from `config`.
///
/// Missing credentials do not prevent registration; the affected tools
/// explain the problem to the model when called. Hotels and flights share
/// one Amadeus client so its token is fetched once.
pub fn travel_tools(config: &TripConfig) -> ToolSet {
    let timeout = config.request_timeout();

    let amadeus = config.amadeus_credentials().map(|(id, secret)| {
        let mut client = AmadeusClient::new(id, secret).with_timeout(timeout);
        if let Some(url) = config.get_base_url(config::AMADEUS) {
            client = client.with_base_url(url);
        }
        Arc::new(client)
    });

    let openweather_key = config.get_api_key(config::OPENWEATHER).map(str::to_string);
    let mut weather = WeatherService::new(openweather_key).with_timeout(timeout);
    if let Some(url) = config.get_base_url(config::OPENWEATHER) {
        weather = weather.with_base_url(url);
    }

    let mut recommendations = RecommendationService::new().with_timeout(timeout);
    if let Some(url) = config.get_base_url(config::DUCKDUCKGO) {
        recommendations = recommendations.with_base_url(url);
    }

    ToolSet::new()
        .with(hotels::hotel_search_tool(Arc::new(HotelSearch::new(amadeus.clone()))))
        .with(weather::weather_tool(Arc::new(weather)))
        .with(recommendations::recommendations_tool(Arc::new(recommendations)))
        .with(flights::flight_search_tool(Arc::new(FlightSearch::new(
            amadeus,
            config.currency(),
        ))))
}

/// Display a loosely-typed JSON scalar the way the API sent it. Missing or
/// null values render empty.
pub(crate) fn json_text(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
