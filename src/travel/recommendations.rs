//! `get_travel_recommendations` tool: DuckDuckGo instant answers with a
//! curated fallback.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use super::catalog::{city_guide, CityGuide};
use crate::error::TripError;
use crate::provider::http::shared_client;
use crate::tools::{AgentTool, AgentToolParameters, Tool, ToolExecutionContext};
use crate::util::timeout::with_timeout;

pub const TOOL_NAME: &str = "get_travel_recommendations";
pub const DEFAULT_BASE_URL: &str = "https://api.duckduckgo.com";

const DESCRIPTION: &str = "Get travel recommendations (attractions, restaurants, \
activities and tips) for a city based on the traveler's interests.";

const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);
const TOPICS_SCANNED: usize = 10;

const ATTRACTION_WORDS: &[&str] = &[
    "museum", "park", "tower", "palace", "temple", "monument", "landmark",
];
const RESTAURANT_WORDS: &[&str] = &["restaurant", "cafe", "dining", "food", "cuisine"];
const ACTIVITY_WORDS: &[&str] = &["hiking", "skiing", "swimming", "tour", "walking", "adventure"];

/// Topic buckets extracted from a web answer.
#[derive(Debug, Default, PartialEq)]
struct Buckets {
    attractions: Vec<String>,
    restaurants: Vec<String>,
    activities: Vec<String>,
    tips: Vec<String>,
}

impl Buckets {
    fn from_topics<'a>(topics: impl IntoIterator<Item = &'a str>) -> Self {
        let mut buckets = Self::default();
        for text in topics {
            let lower = text.to_lowercase();
            let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));
            let bucket = if has(ATTRACTION_WORDS) {
                &mut buckets.attractions
            } else if has(RESTAURANT_WORDS) {
                &mut buckets.restaurants
            } else if has(ACTIVITY_WORDS) {
                &mut buckets.activities
            } else {
                &mut buckets.tips
            };
            bucket.push(text.to_string());
        }
        buckets
    }
}

#[derive(Debug, Clone)]
pub struct RecommendationService {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl Default for RecommendationService {
    fn default() -> Self {
        Self::new()
    }
}

impl RecommendationService {
    pub fn new() -> Self {
        Self {
            client: shared_client().clone(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: SEARCH_TIMEOUT,
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

    /// Recommendations for `city`: the web answer when it says anything
    /// useful, then the curated guide, then a pointer to travel sites.
    pub async fn recommend(&self, city: &str, interests: &str) -> String {
        let city = city.trim();
        debug!(%city, %interests, "Looking up recommendations");

        match self.web_answer(city).await {
            Ok(Some(text)) => return text,
            Ok(None) => debug!(%city, "Web answer had nothing usable"),
            Err(e) => warn!(%city, error = %e, "Web search failed"),
        }

        match city_guide(city) {
            Some(guide) => render_guide(guide),
            None => format!(
                "I found some general information about {city}, but for the most comprehensive \
                 and up-to-date travel recommendations, I recommend checking travel websites like \
                 TripAdvisor, Lonely Planet, or the official tourism website for {city}. You can \
                 also ask me about specific aspects like weather, flights, or hotels for {city}."
            ),
        }
    }

    async fn web_answer(&self, city: &str) -> Result<Option<String>, TripError> {
        let query = format!("{city} travel guide attractions restaurants activities");
        let request = self
            .client
            .get(format!("{}/", self.base_url))
            .query(&[
                ("q", query.as_str()),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send();

        let answer: InstantAnswer = with_timeout(self.timeout, async {
            let resp = request.await?;
            if !resp.status().is_success() {
                return Err(TripError::api(resp.status().as_u16(), "instant answer request failed"));
            }
            // The API labels its JSON as application/x-javascript.
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        })
        .await?;

        Ok(render_answer(city, &answer))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InstantAnswer {
    #[serde(rename = "Abstract")]
    abstract_text: String,
    #[serde(rename = "RelatedTopics")]
    related_topics: Vec<serde_json::Value>,
}

/// Render a web answer, or `None` when it carries neither an abstract nor
/// any attraction, restaurant or activity.
fn render_answer(city: &str, answer: &InstantAnswer) -> Option<String> {
    let buckets = Buckets::from_topics(
        answer
            .related_topics
            .iter()
            .take(TOPICS_SCANNED)
            .filter_map(|topic| topic.get("Text").and_then(|t| t.as_str())),
    );

    let abstract_text = answer.abstract_text.trim();
    if abstract_text.is_empty()
        && buckets.attractions.is_empty()
        && buckets.restaurants.is_empty()
        && buckets.activities.is_empty()
    {
        return None;
    }

    let mut out = format!("Travel recommendations for {city}:\n\n");
    if !abstract_text.is_empty() {
        let _ = write!(out, "Overview: {abstract_text}\n\n");
    }
    let sections = [
        ("Top Attractions:", &buckets.attractions, 5),
        ("Recommended Restaurants:", &buckets.restaurants, 3),
        ("Popular Activities:", &buckets.activities, 3),
    ];
    for (title, items, cap) in sections {
        if !items.is_empty() {
            write_section(&mut out, title, items.iter().take(cap));
            out.push('\n');
        }
    }
    if !buckets.tips.is_empty() {
        write_section(&mut out, "Travel Tips:", buckets.tips.iter().take(3));
    }
    Some(out)
}

fn render_guide(guide: &CityGuide) -> String {
    let mut out = format!("Travel recommendations for {}:\n\n", guide.city);
    write_section(&mut out, "Top Attractions:", guide.attractions.iter());
    out.push('\n');
    write_section(&mut out, "Recommended Restaurants:", guide.restaurants.iter());
    out.push('\n');
    write_section(&mut out, "Popular Activities:", guide.activities.iter());
    out.push('\n');
    write_section(&mut out, "Travel Tips:", guide.tips.iter());
    out
}

fn write_section<T: std::fmt::Display>(
    out: &mut String,
    title: &str,
    items: impl Iterator<Item = T>,
) {
    out.push_str(title);
    out.push('\n');
    for (i, item) in items.enumerate() {
        let _ = writeln!(out, "{}. {item}", i + 1);
    }
}

/// The `get_travel_recommendations` tool backed by `service`.
pub fn recommendations_tool(service: Arc<RecommendationService>) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        TOOL_NAME,
        DESCRIPTION,
        AgentToolParameters::object()
            .string(
                "city",
                "City name (e.g. 'Paris', 'Tokyo', 'New York', 'Aspen', 'Colorado')",
                true,
            )
            .string(
                "interests",
                "Type of interests (e.g. 'culture', 'food', 'adventure', 'shopping', 'outdoors')",
                false,
            )
            .build(),
        move |args, _ctx: ToolExecutionContext| {
            let service = Arc::clone(&service);
            async move {
                let city = args.get_str("city")?;
                let interests = args.get_str_opt("interests").unwrap_or("general");
                Ok(serde_json::Value::String(service.recommend(city, interests).await))
            }
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn answer(value: serde_json::Value) -> InstantAnswer {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn topics_are_bucketed_by_keyword() {
        let buckets = Buckets::from_topics([
            "Louvre Museum - art",
            "Cafe de Flore - coffee",
            "Seine walking tour",
            "Metro runs until 1am",
            "Rodin Museum park",
        ]);
        assert_eq!(buckets.attractions, vec!["Louvre Museum - art", "Rodin Museum park"]);
        assert_eq!(buckets.restaurants, vec!["Cafe de Flore - coffee"]);
        assert_eq!(buckets.activities, vec!["Seine walking tour"]);
        assert_eq!(buckets.tips, vec!["Metro runs until 1am"]);
    }

    #[test]
    fn answer_with_only_tips_is_not_used() {
        let a = answer(serde_json::json!({
            "Abstract": "",
            "RelatedTopics": [{ "Text": "Carry cash" }, { "Name": "group", "Topics": [] }]
        }));
        assert!(render_answer("Lisbon", &a).is_none());
    }

    #[test]
    fn answer_renders_overview_and_capped_sections() {
        let topics: Vec<_> = (1..=7)
            .map(|i| serde_json::json!({ "Text": format!("Museum {i}") }))
            .chain([serde_json::json!({ "Text": "Buy a transit pass" })])
            .collect();
        let a = answer(serde_json::json!({
            "Abstract": "Lisbon is the capital of Portugal.",
            "RelatedTopics": topics
        }));

        let text = render_answer("Lisbon", &a).unwrap();

        assert_eq!(
            text,
            "Travel recommendations for Lisbon:\n\n\
             Overview: Lisbon is the capital of Portugal.\n\n\
             Top Attractions:\n1. Museum 1\n2. Museum 2\n3. Museum 3\n4. Museum 4\n5. Museum 5\n\n\
             Travel Tips:\n1. Buy a transit pass\n"
        );
    }

    #[test]
    fn only_the_first_ten_topics_are_scanned() {
        let mut topics: Vec<_> = (0..10).map(|_| serde_json::json!({ "Text": "note" })).collect();
        topics.push(serde_json::json!({ "Text": "Belem Tower" }));
        let a = answer(serde_json::json!({ "RelatedTopics": topics }));
        assert!(render_answer("Lisbon", &a).is_none());
    }

    #[test]
    fn curated_guide_lists_every_section() {
        let text = render_guide(city_guide("Rome").unwrap());
        assert!(text.starts_with("Travel recommendations for Rome:\n\nTop Attractions:\n1. Colosseum\n"));
        assert!(text.contains("\nRecommended Restaurants:\n1. La Pergola\n"));
        assert!(text.ends_with("2. Visit early morning to avoid crowds\n"));
    }
}
