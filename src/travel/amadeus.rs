//! Amadeus self-service API client: OAuth2 client credentials, city lookup,
//! hotel reference data and flight offers.

use std::sync::Mutex;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::error::TripError;
use crate::provider::http::shared_client;

pub const DEFAULT_BASE_URL: &str = "https://test.api.amadeus.com";

const TOKEN_PATH: &str = "/v1/security/oauth2/token";
const LOCATIONS_PATH: &str = "/v1/reference-data/locations";
const HOTELS_BY_CITY_PATH: &str = "/v1/reference-data/locations/hotels/by-city";
const FLIGHT_OFFERS_PATH: &str = "/v2/shopping/flight-offers";

const TOKEN_EXPIRY_MARGIN_SECS: i64 = 30;
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 1799;
const MAX_TOKEN_LIFETIME_SECS: u64 = 86_400;
const MAX_FLIGHT_OFFERS: u32 = 5;

/// Client for the Amadeus test environment.
///
/// Tokens are cached and reused until shortly before they expire. Every
/// non-success response is returned as [`TripError::Api`] carrying the
/// response body, which callers show verbatim.
pub struct AmadeusClient {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    timeout: StdDuration,
    cached_token: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for AmadeusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmadeusClient")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Parameters for a round-trip flight offer search.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightQuery {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub return_date: String,
    pub adults: u32,
    pub currency: String,
}

impl AmadeusClient {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client: shared_client().clone(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            timeout: StdDuration::from_secs(crate::config::DEFAULT_REQUEST_TIMEOUT_SECS),
            cached_token: Mutex::new(None),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
        self.timeout = timeout;
        self
    }

    /// A bearer token, fetched with the client-credentials grant when the
    /// cached one is missing or about to expire.
    pub async fn access_token(&self) -> Result<String, TripError> {
        if let Some(token) = self.read_cached_token() {
            return Ok(token);
        }

        let resp = self
            .client
            .post(format!("{}{TOKEN_PATH}", self.base_url))
            .timeout(self.timeout)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TripError::api(status.as_u16(), body));
        }

        let payload: TokenResponse = resp.json().await?;
        let access_token = payload
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                TripError::Authentication("No access token received from Amadeus.".into())
            })?;
        let lifetime = payload.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
        self.write_cached_token(&access_token, lifetime);
        debug!(expires_in = lifetime, "Fetched Amadeus access token");
        Ok(access_token)
    }

    /// Resolve a city name to its IATA city code.
    ///
    /// Tries the bare name, then `"{city} City"`, then
    /// `"{city} Metropolitan Area"`, accepting the first location whose
    /// city name equals `city` ignoring case. Lookups that fail are skipped.
    pub async fn find_city_code(&self, city: &str) -> Result<Option<String>, TripError> {
        let token = self.access_token().await?;
        let variants = [
            city.to_string(),
            format!("{city} City"),
            format!("{city} Metropolitan Area"),
        ];

        let wanted = city.to_lowercase();

        for keyword in &variants {
            let resp = self
                .client
                .get(format!("{}{LOCATIONS_PATH}", self.base_url))
                .timeout(self.timeout)
                .bearer_auth(&token)
                .query(&[
                    ("subType", "CITY"),
                    ("keyword", keyword.as_str()),
                    ("page[limit]", "5"),
                ])
                .send()
                .await?;
            if !resp.status().is_success() {
                debug!(%keyword, status = %resp.status(), "City lookup failed");
                continue;
            }

            let locations: DataEnvelope<Location> = resp.json().await?;
            let code = locations.data.into_iter().find_map(|loc| {
                let address = loc.address?;
                let name = address.city_name?;
                if name.to_lowercase() == wanted {
                    address.city_code
                } else {
                    None
                }
            });
            if code.is_some() {
                debug!(%city, %keyword, ?code, "Resolved city code");
                return Ok(code);
            }
        }
        Ok(None)
    }

    /// Hotels within 5 km of the city centre.
    pub async fn hotels_by_city(&self, city_code: &str) -> Result<Vec<HotelListing>, TripError> {
        let token = self.access_token().await?;
        let resp = self
            .client
            .get(format!("{}{HOTELS_BY_CITY_PATH}", self.base_url))
            .timeout(self.timeout)
            .bearer_auth(&token)
            .query(&[("cityCode", city_code), ("radius", "5"), ("radiusUnit", "KM")])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TripError::api(status.as_u16(), body));
        }
        let listings: DataEnvelope<HotelListing> = resp.json().await?;
        Ok(listings.data)
    }

    /// Up to five round-trip flight offers.
    pub async fn flight_offers(&self, query: &FlightQuery) -> Result<Vec<FlightOffer>, TripError> {
        let token = self.access_token().await?;
        let adults = query.adults.to_string();
        let max = MAX_FLIGHT_OFFERS.to_string();
        let resp = self
            .client
            .get(format!("{}{FLIGHT_OFFERS_PATH}", self.base_url))
            .timeout(self.timeout)
            .bearer_auth(&token)
            .query(&[
                ("originLocationCode", query.origin.as_str()),
                ("destinationLocationCode", query.destination.as_str()),
                ("departureDate", query.departure_date.as_str()),
                ("returnDate", query.return_date.as_str()),
                ("adults", adults.as_str()),
                ("currencyCode", query.currency.as_str()),
                ("max", max.as_str()),
            ])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TripError::api(status.as_u16(), body));
        }
        let offers: DataEnvelope<FlightOffer> = resp.json().await?;
        Ok(offers.data)
    }

    fn read_cached_token(&self) -> Option<String> {
        let guard = self.cached_token.lock().ok()?;
        let cached = guard.as_ref()?;
        if cached.expires_at - Utc::now() < Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS) {
            return None;
        }
        Some(cached.value.clone())
    }

    fn write_cached_token(&self, token: &str, lifetime_secs: u64) {
        let lifetime = lifetime_secs.min(MAX_TOKEN_LIFETIME_SECS) as i64;
        if let Ok(mut guard) = self.cached_token.lock() {
            *guard = Some(CachedToken {
                value: token.to_string(),
                expires_at: Utc::now() + Duration::seconds(lifetime),
            });
        }
    }
}

/// The body of a failed Amadeus call, or the error text for transport failures.
pub fn failure_detail(err: &TripError) -> String {
    match err {
        TripError::Api { message, .. } | TripError::Authentication(message) => message.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Location {
    address: Option<LocationAddress>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationAddress {
    city_name: Option<String>,
    city_code: Option<String>,
}

/// A hotel from the reference-data endpoint. It carries no rates.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HotelListing {
    pub name: Option<String>,
    pub chain_code: Option<String>,
    pub iata_code: Option<String>,
    pub geo_code: Option<GeoCode>,
    pub distance: Option<Distance>,
    pub address: Option<HotelAddress>,
}

/// Coordinates are kept as raw JSON so they print exactly as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeoCode {
    pub latitude: Option<serde_json::Value>,
    pub longitude: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Distance {
    pub value: Option<serde_json::Value>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HotelAddress {
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FlightOffer {
    pub price: Option<OfferPrice>,
    pub itineraries: Vec<Itinerary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OfferPrice {
    pub total: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Itinerary {
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Segment {
    pub departure: Option<Endpoint>,
    pub arrival: Option<Endpoint>,
    pub carrier_code: Option<String>,
    pub flight_number: Option<String>,
    pub number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Endpoint {
    pub iata_code: Option<String>,
    pub at: Option<String>,
}
