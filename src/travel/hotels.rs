//! `search_hotels` tool: Amadeus hotel reference data with a curated fallback.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::{info, warn};

use super::amadeus::{AmadeusClient, HotelListing};
use super::catalog::{self, CuratedHotel, HotelSource};
use super::dates::{nights, parse_date};
use super::json_text;
use crate::error::TripError;
use crate::tools::{AgentTool, AgentToolParameters, Tool, ToolExecutionContext};

pub const TOOL_NAME: &str = "search_hotels";

const DESCRIPTION: &str = "Search for available hotels in a specific city. \
Returns hotel options with nightly and total prices for the stay.";

const MISSING_CREDENTIALS: &str =
    "Amadeus API credentials not found. Please check your configuration.";

const MAX_LISTED: usize = 6;

/// Hotel search over Amadeus, falling back to the curated catalog whenever
/// the live lookup cannot produce listings.
#[derive(Debug, Clone)]
pub struct HotelSearch {
    amadeus: Option<Arc<AmadeusClient>>,
}

struct Stay<'a> {
    city: &'a str,
    check_in: &'a str,
    check_out: &'a str,
    nights: u32,
}

impl HotelSearch {
    pub fn new(amadeus: Option<Arc<AmadeusClient>>) -> Self {
        Self { amadeus }
    }

    /// Describe hotels for a stay. Malformed or out-of-order dates are errors;
    /// every other outcome is a message for the model.
    pub async fn search(
        &self,
        city: &str,
        check_in: &str,
        check_out: &str,
        guests: u32,
    ) -> Result<String, TripError> {
        let Some(amadeus) = &self.amadeus else {
            return Ok(MISSING_CREDENTIALS.to_string());
        };

        let nights = nights(parse_date(check_in)?, parse_date(check_out)?)?;
        let stay = Stay {
            city,
            check_in: check_in.trim(),
            check_out: check_out.trim(),
            nights,
        };
        info!(%city, nights, guests, "Searching hotels");

        match live_listings(amadeus, city).await {
            Ok(Lookup::Listings(listings)) if listings.is_empty() => Ok(format!(
                "No hotels found in {city} for the specified dates."
            )),
            Ok(Lookup::Listings(listings)) => Ok(render_listings(&stay, &listings)),
            Ok(Lookup::TokenRefused(status)) => {
                warn!(%city, status, "Amadeus refused the token request");
                Ok(format!("Failed to get access token: {status}"))
            }
            Ok(Lookup::UnknownCity) => {
                info!(%city, "No Amadeus city code, using curated hotels");
                Ok(render_curated(&stay, catalog::curated_hotels(city)))
            }
            Ok(Lookup::SearchRejected(status)) => {
                warn!(%city, status, "Amadeus hotel search rejected, using curated hotels");
                Ok(render_curated(&stay, catalog::curated_hotels(city)))
            }
            Err(e) => {
                warn!(%city, error = %e, "Amadeus hotel search failed, using simulated hotels");
                Ok(render_curated(&stay, catalog::simulated_hotels()))
            }
        }
    }
}

/// Outcome of the live lookup. Transport and decode failures are `Err`.
enum Lookup {
    Listings(Vec<HotelListing>),
    TokenRefused(u16),
    UnknownCity,
    SearchRejected(u16),
}

async fn live_listings(amadeus: &AmadeusClient, city: &str) -> Result<Lookup, TripError> {
    match amadeus.access_token().await {
        Ok(_) => {}
        Err(TripError::Api { status, .. }) => return Ok(Lookup::TokenRefused(status)),
        Err(e) => return Err(e),
    }
    let Some(code) = amadeus.find_city_code(city).await? else {
        return Ok(Lookup::UnknownCity);
    };
    match amadeus.hotels_by_city(&code).await {
        Ok(listings) => Ok(Lookup::Listings(listings)),
        Err(TripError::Api { status, .. }) => Ok(Lookup::SearchRejected(status)),
        Err(e) => Err(e),
    }
}

fn header(stay: &Stay<'_>, count: usize, source: HotelSource) -> String {
    format!(
        "Found {count} hotels in {} from {} to {} ({} nights) [{source}]:\n",
        stay.city, stay.check_in, stay.check_out, stay.nights
    )
}

fn render_listings(stay: &Stay<'_>, listings: &[HotelListing]) -> String {
    let mut out = header(stay, listings.len(), HotelSource::Amadeus);
    for (i, hotel) in listings.iter().take(MAX_LISTED).enumerate() {
        let chain = hotel.chain_code.as_deref().unwrap_or_default();
        let nightly = catalog::estimated_nightly_rate(chain);
        let total = u64::from(nightly) * u64::from(stay.nights);
        let (lat, lon) = hotel
            .geo_code
            .as_ref()
            .map(|g| (json_text(g.latitude.as_ref()), json_text(g.longitude.as_ref())))
            .unwrap_or_default();
        let (distance, unit) = hotel
            .distance
            .as_ref()
            .map(|d| (json_text(d.value.as_ref()), d.unit.as_deref().unwrap_or("KM")))
            .unwrap_or((String::new(), "KM"));
        let country = hotel
            .address
            .as_ref()
            .and_then(|a| a.country_code.as_deref())
            .unwrap_or_default();

        let _ = write!(
            out,
            "{}. {}\n   Chain: {chain} | IATA: {}\n   Location: {}, {country}\n   \
             Distance: {distance} {unit} from city center\n   \
             Estimated Price: ${nightly} per night\n   \
             Total for {} nights: ${total}\n   Coordinates: {lat}, {lon}\n\n",
            i + 1,
            hotel.name.as_deref().unwrap_or("Unknown Hotel"),
            hotel.iata_code.as_deref().unwrap_or_default(),
            stay.city,
            stay.nights,
        );
    }
    out
}

fn render_curated(stay: &Stay<'_>, (source, hotels): (HotelSource, &[CuratedHotel])) -> String {
    let mut out = header(stay, hotels.len(), source);
    for (i, hotel) in hotels.iter().enumerate() {
        write_curated(&mut out, i + 1, hotel, stay.nights);
    }
    out
}

fn write_curated(out: &mut String, index: usize, hotel: &CuratedHotel, nights: u32) {
    let total = u64::from(hotel.price) * u64::from(nights);
    let _ = write!(
        out,
        "{index}. {} ({:.1}★)\n   Location: {}\n   Price per night: ${}\n   \
         Total for {nights} nights: ${total}\n   Amenities: {}\n\n",
        hotel.name,
        hotel.rating,
        hotel.location,
        hotel.price,
        hotel.amenities.join(", "),
    );
}

/// The `search_hotels` tool backed by `search`.
pub fn hotel_search_tool(search: Arc<HotelSearch>) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        TOOL_NAME,
        DESCRIPTION,
        AgentToolParameters::object()
            .string("city", "City name (e.g. 'Paris', 'Tokyo', 'New York')", true)
            .string("check_in", "Check-in date in YYYY-MM-DD format", true)
            .string("check_out", "Check-out date in YYYY-MM-DD format", true)
            .integer_at_least("guests", "Number of guests (default: 1)", 1, false)
            .build(),
        move |args, _ctx: ToolExecutionContext| {
            let search = Arc::clone(&search);
            async move {
                let guests = args
                    .get_i64("guests")
                    .ok()
                    .and_then(|g| u32::try_from(g).ok())
                    .unwrap_or(1);
                let text = search
                    .search(
                        args.get_str("city")?,
                        args.get_str("check_in")?,
                        args.get_str("check_out")?,
                        guests,
                    )
                    .await?;
                Ok(serde_json::Value::String(text))
            }
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stay(city: &str) -> Stay<'_> {
        Stay {
            city,
            check_in: "2025-03-15",
            check_out: "2025-03-18",
            nights: 3,
        }
    }

    #[tokio::test]
    async fn missing_credentials_short_circuits() {
        let search = HotelSearch::new(None);
        let text = search
            .search("Paris", "2025-03-15", "2025-03-18", 2)
            .await
            .unwrap();
        assert_eq!(text, MISSING_CREDENTIALS);
    }

    #[test]
    fn curated_rendering_for_known_city() {
        let text = render_curated(&stay("Tokyo"), catalog::curated_hotels("Tokyo"));
        assert!(text.starts_with(
            "Found 6 hotels in Tokyo from 2025-03-15 to 2025-03-18 (3 nights) [Local Recommendations]:\n"
        ));
        assert!(text.contains(
            "1. Park Hyatt Tokyo (4.8★)\n   Location: Shinjuku\n   Price per night: $450\n   \
             Total for 3 nights: $1350\n   Amenities: WiFi, Pool, Spa, Restaurant, City View\n\n"
        ));
        assert!(text.contains("4. Shibuya Excel Hotel (4.0★)"));
    }

    #[test]
    fn unknown_city_uses_simulated_table() {
        let text = render_curated(&stay("Reykjavik"), catalog::curated_hotels("Reykjavik"));
        assert!(text.contains("[Simulated Data]"));
        assert!(text.contains("5. Budget Stay (3.5★)"));
    }

    #[test]
    fn amadeus_listings_are_capped_and_priced_by_chain() {
        let listing: HotelListing = serde_json::from_value(serde_json::json!({
            "name": "HOLIDAY INN PARIS",
            "chainCode": "HI",
            "iataCode": "PAR",
            "geoCode": { "latitude": 48.85, "longitude": 2.35 },
            "distance": { "value": 0.5, "unit": "KM" },
            "address": { "countryCode": "FR" }
        }))
        .unwrap();
        let listings = vec![listing; 8];

        let text = render_listings(&stay("Paris"), &listings);

        assert!(text.starts_with("Found 8 hotels in Paris"));
        assert!(text.contains("[Amadeus API]"));
        assert!(text.contains(
            "1. HOLIDAY INN PARIS\n   Chain: HI | IATA: PAR\n   Location: Paris, FR\n   \
             Distance: 0.5 KM from city center\n   Estimated Price: $150 per night\n   \
             Total for 3 nights: $450\n   Coordinates: 48.85, 2.35\n\n"
        ));
        assert!(text.contains("6. HOLIDAY INN PARIS"));
        assert!(!text.contains("7. HOLIDAY INN PARIS"));
    }

    #[test]
    fn sparse_listing_renders_placeholders() {
        let text = render_listings(&stay("Oslo"), &[HotelListing::default()]);
        assert!(text.contains("1. Unknown Hotel\n   Chain:  | IATA: \n"));
        assert!(text.contains("Estimated Price: $200 per night"));
    }
}
