//! The travel agent end to end: OpenAI chat completions and the weather
//! back-end served by one wiremock server.

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tripmate::agent::{TravelAgent, TravelSession};
use tripmate::config::{self, TripConfig};
use tripmate::types::ModelMessage;

fn completion(message: serde_json::Value, finish_reason: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{ "index": 0, "message": message, "finish_reason": finish_reason }],
        "usage": { "prompt_tokens": 120, "completion_tokens": 30, "total_tokens": 150 }
    })
}

async fn mount_weather(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "name": "Paris", "lat": 48.85, "lon": 2.35 }])),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": [{ "dt_txt": "2030-01-01 12:00:00", "main": { "temp": 55.4 }, "weather": [{ "description": "overcast clouds" }] }]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn agent_calls_the_weather_tool_then_answers() {
    let server = MockServer::start().await;
    mount_weather(&server).await;

    // Second round: the tool result is in the transcript.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains(r#""tool_call_id":"call_w""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            json!({ "role": "assistant", "content": "Expect 55°F and clouds in Paris. Bring a jacket." }),
            "stop",
        )))
        .expect(1)
        .mount(&server)
        .await;
    // First round: ask for the forecast.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_w",
                    "type": "function",
                    "function": { "name": "get_weather_forecast", "arguments": "{\"city\":\"Paris\"}" }
                }]
            }),
            "tool_calls",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let agent = TravelAgent::new(&common::config_for(&server.uri())).unwrap();
    let result = agent
        .run("What's the weather in Paris?", &[], Default::default())
        .await
        .unwrap();

    assert_eq!(result.text, "Expect 55°F and clouds in Paris. Bring a jacket.");
    assert_eq!(result.steps.len(), 2);
    assert_eq!(result.usage.total_tokens, 300);
    assert_eq!(
        result.steps[0].tool_results[0].result,
        json!("Weather forecast for Paris on 2030-01-01 12:00:00: 55.4°F, overcast clouds.")
    );

    let requests = server.received_requests().await.unwrap();
    let completions: Vec<serde_json::Value> = requests
        .iter()
        .filter(|r| r.url.path() == "/chat/completions")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();
    assert_eq!(completions.len(), 2);
    assert_eq!(completions[0]["model"], "gpt-3.5-turbo");
    assert_eq!(completions[0]["temperature"], 0.7);
    assert_eq!(completions[0]["messages"][0]["role"], "system");
    assert_eq!(completions[0]["tools"].as_array().unwrap().len(), 4);
    assert_eq!(completions[1]["messages"][3]["role"], "tool");
}

#[tokio::test]
async fn rejected_key_becomes_an_apology() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Incorrect API key provided"))
        .expect(1)
        .mount(&server)
        .await;

    let agent = TravelAgent::new(&common::config_for(&server.uri())).unwrap();
    let reply = agent
        .chat("Hotels in Rome", &[ModelMessage::user("Hi"), ModelMessage::assistant("Hello!")])
        .await;

    assert_eq!(
        reply,
        "I encountered an error: Authentication error: Incorrect API key provided. \
         Please try rephrasing your request."
    );
}

#[tokio::test]
async fn session_over_http_keeps_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            json!({ "role": "assistant", "content": "Noted." }),
            "stop",
        )))
        .mount(&server)
        .await;

    let agent = TravelAgent::new(&common::config_for(&server.uri())).unwrap();
    let mut session = TravelSession::new(agent);
    session.send("I like museums").await;
    session.send("And good coffee").await;

    let requests = server.received_requests().await.unwrap();
    let last: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    let contents: Vec<&str> = last["messages"]
        .as_array()
        .unwrap()
        .iter()
        .skip(1)
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["I like museums", "Noted.", "And good coffee"]);
}

#[test]
fn agent_requires_an_openai_key() {
    let mut config = TripConfig::new();
    config.set_api_key(config::OPENWEATHER, "weather-key");
    let err = TravelAgent::new(&config).unwrap_err();
    assert!(err.to_string().contains("OPENAI_API_KEY"));
}
