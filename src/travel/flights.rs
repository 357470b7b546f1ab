//! `search_flights` tool: round-trip offers from Amadeus.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::{info, warn};

use super::amadeus::{failure_detail, AmadeusClient, FlightOffer, FlightQuery, Segment};
use super::dates::short_date;
use crate::error::TripError;
use crate::tools::{AgentTool, AgentToolParameters, Tool, ToolExecutionContext};

pub const TOOL_NAME: &str = "search_flights";

const DESCRIPTION: &str = "Search for round-trip flights between two airports. \
Origin and destination are IATA airport codes such as 'JFK' or 'LHR'.";

const NOT_AVAILABLE: &str = "N/A";

/// Flight offer search. Without credentials every token request fails and
/// the failure is reported to the model.
#[derive(Debug, Clone)]
pub struct FlightSearch {
    amadeus: Option<Arc<AmadeusClient>>,
    default_currency: String,
}

impl FlightSearch {
    pub fn new(amadeus: Option<Arc<AmadeusClient>>, default_currency: impl Into<String>) -> Self {
        Self {
            amadeus,
            default_currency: default_currency.into(),
        }
    }

    pub fn default_currency(&self) -> &str {
        &self.default_currency
    }

    /// Summarise offers for `query`. Always a message for the model.
    pub async fn search(&self, query: &FlightQuery) -> String {
        let Some(amadeus) = &self.amadeus else {
            return "Failed to get Amadeus access token: credentials are not configured"
                .to_string();
        };

        if let Err(e) = amadeus.access_token().await {
            warn!(error = %e, "Amadeus token request failed");
            return format!("Failed to get Amadeus access token: {}", failure_detail(&e));
        }

        info!(
            origin = %query.origin,
            destination = %query.destination,
            departure = %query.departure_date,
            "Searching flights"
        );
        match amadeus.flight_offers(query).await {
            Ok(offers) if offers.is_empty() => {
                "No flight offers found. Try different dates or airports.".to_string()
            }
            Ok(offers) => render_offers(query, &offers),
            Err(e) => {
                warn!(error = %e, "Flight offer search failed");
                format!("Failed to get flight offers: {}", failure_detail(&e))
            }
        }
    }
}

fn render_offers(query: &FlightQuery, offers: &[FlightOffer]) -> String {
    let mut out = format!(
        "Found {} round-trip flight offers from {} to {} (currency: {}):\n\n",
        offers.len(),
        query.origin,
        query.destination,
        query.currency
    );
    for (i, offer) in offers.iter().enumerate() {
        let outbound = offer
            .itineraries
            .first()
            .map(|it| route(&it.segments))
            .unwrap_or_default();
        let _ = writeln!(out, "{}. Outbound: {outbound}", i + 1);

        if let Some(inbound) = offer.itineraries.get(1).filter(|it| !it.segments.is_empty()) {
            let _ = writeln!(out, "   Return: {}", route(&inbound.segments));
        }

        let price = offer
            .price
            .as_ref()
            .and_then(|p| p.total.as_deref())
            .unwrap_or(NOT_AVAILABLE);
        let _ = write!(out, "   Total Price: {price} {}\n\n", query.currency);
    }
    out
}

fn route(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(segment_label)
        .collect::<Vec<_>>()
        .join(" → ")
}

/// `JFK → LHR (BA 178, May 01)`, with `N/A` for anything missing.
fn segment_label(segment: &Segment) -> String {
    let from = segment.departure.as_ref();
    let to = segment.arrival.as_ref();
    let flight_number = segment
        .flight_number
        .as_deref()
        .filter(|n| !n.is_empty())
        .or(segment.number.as_deref())
        .unwrap_or(NOT_AVAILABLE);
    let date = from
        .and_then(|d| d.at.as_deref())
        .map(short_date)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    format!(
        "{} → {} ({} {flight_number}, {date})",
        from.and_then(|d| d.iata_code.as_deref()).unwrap_or(NOT_AVAILABLE),
        to.and_then(|a| a.iata_code.as_deref()).unwrap_or(NOT_AVAILABLE),
        segment.carrier_code.as_deref().unwrap_or(NOT_AVAILABLE),
    )
}

fn query_from_args(
    args: &crate::tools::ToolArguments,
    default_currency: &str,
) -> Result<FlightQuery, TripError> {
    let adults = args
        .get_i64("adults")
        .ok()
        .and_then(|a| u32::try_from(a).ok())
        .unwrap_or(1);
    let currency = args
        .get_str_opt("currency")
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(default_currency);
    Ok(FlightQuery {
        origin: args.get_str("origin")?.trim().to_uppercase(),
        destination: args.get_str("destination")?.trim().to_uppercase(),
        departure_date: args.get_str("departure_date")?.trim().to_string(),
        return_date: args.get_str("return_date")?.trim().to_string(),
        adults,
        currency: currency.to_uppercase(),
    })
}

/// The `search_flights` tool backed by `search`.
pub fn flight_search_tool(search: Arc<FlightSearch>) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        TOOL_NAME,
        DESCRIPTION,
        AgentToolParameters::object()
            .string("origin", "IATA code of the departure airport (e.g. 'JFK')", true)
            .string("destination", "IATA code of the destination airport (e.g. 'LHR')", true)
            .string("departure_date", "Outbound flight date (YYYY-MM-DD)", true)
            .string("return_date", "Return flight date (YYYY-MM-DD)", true)
            .integer_at_least("adults", "Number of adult travelers (default: 1)", 1, false)
            .string("currency", "Preferred currency code (default: USD)", false)
            .build(),
        move |args, _ctx: ToolExecutionContext| {
            let search = Arc::clone(&search);
            async move {
                let query = query_from_args(&args, search.default_currency())?;
                Ok(serde_json::Value::String(search.search(&query).await))
            }
        },
    ))
}
