//! Travel agent and session behaviour over the mock provider.

mod common;

use common::MockProvider;
use pretty_assertions::assert_eq;
use tripmate::agent::{TravelAgent, TravelSession, ITERATION_LIMIT_REPLY, SYSTEM_PROMPT};
use tripmate::config::TripConfig;
use tripmate::error::TripError;
use tripmate::generation::GenerateOptions;
use tripmate::tools::ToolSet;
use tripmate::types::*;
use tripmate::util::retry::RetryPolicy;

fn agent(provider: &MockProvider) -> TravelAgent {
    let mut config = TripConfig::new();
    config.set_temperature(0.3);
    TravelAgent::with_provider(Box::new(provider.clone()), ToolSet::new(), &config).with_options(
        GenerateOptions {
            retry: RetryPolicy::none(),
            ..GenerateOptions::default()
        },
    )
}

#[tokio::test]
async fn chat_sends_system_history_and_message() {
    let provider = MockProvider::new();
    provider.queue_response("How about Lisbon?");
    let history = vec![
        ModelMessage::user("I want somewhere warm"),
        ModelMessage::assistant("What is your budget?"),
    ];

    let reply = agent(&provider).chat("About $2000", &history).await;

    assert_eq!(reply, "How about Lisbon?");
    let request = &provider.requests()[0];
    let texts: Vec<String> = request.messages.iter().map(|m| m.text()).collect();
    assert_eq!(
        texts,
        vec![
            SYSTEM_PROMPT.to_string(),
            "I want somewhere warm".to_string(),
            "What is your budget?".to_string(),
            "About $2000".to_string(),
        ]
    );
    assert_eq!(request.messages[0].role, Role::System);
    assert_eq!(request.settings.temperature, Some(0.3));
}

#[tokio::test]
async fn chat_turns_errors_into_an_apology() {
    let provider = MockProvider::new();
    provider.queue_error(TripError::api(400, "context too long"));

    let reply = agent(&provider).chat("Plan everything", &[]).await;

    assert_eq!(
        reply,
        "I encountered an error: API error (status 400): context too long. \
         Please try rephrasing your request."
    );
}

#[tokio::test]
async fn session_accumulates_and_clears_history() {
    let provider = MockProvider::new();
    provider.queue_response("Which city?");
    provider.queue_response("Tokyo it is.");
    let mut session = TravelSession::new(agent(&provider));

    assert_eq!(session.send("Find me a hotel").await, "Which city?");
    assert_eq!(session.send("Tokyo").await, "Tokyo it is.");

    assert_eq!(session.conversation().turns(), 2);
    // Second request carries the first exchange.
    let second = &provider.requests()[1];
    assert_eq!(second.messages.len(), 4);
    assert_eq!(second.messages[2].text(), "Which city?");

    session.clear();
    assert!(session.conversation().is_empty());
    session.send("Start over").await;
    assert_eq!(provider.requests()[2].messages.len(), 2);
}

#[tokio::test]
async fn failed_turns_are_kept_in_history() {
    let provider = MockProvider::new();
    provider.queue_error(TripError::Timeout(120_000));
    let mut session = TravelSession::new(agent(&provider));

    let reply = session.send("Flights to Oslo").await;

    assert!(reply.starts_with("I encountered an error"));
    assert_eq!(session.conversation().len(), 2);
}

#[tokio::test]
async fn iteration_limit_gives_a_stop_notice() {
    let provider = MockProvider::new();
    for i in 0..5 {
        provider.queue_tool_call(
            &format!("call_{i}"),
            "search_hotels",
            serde_json::json!({ "city": "Lima" }),
        );
    }
    let agent = agent(&provider).with_options(GenerateOptions {
        max_iterations: 2,
        retry: RetryPolicy::none(),
        ..GenerateOptions::default()
    });
    let mut session = TravelSession::new(agent);

    let reply = session.send("Keep searching").await;

    assert_eq!(reply, ITERATION_LIMIT_REPLY);
    assert_eq!(provider.request_count(), 2);
    assert_eq!(session.conversation().messages()[1].text(), ITERATION_LIMIT_REPLY);
}

#[tokio::test]
async fn iteration_limit_keeps_text_the_model_already_gave() {
    let provider = MockProvider::new();
    provider.queue_tool_call_with_text(
        "Let me look up hotels.",
        "a",
        "search_hotels",
        serde_json::json!({}),
    );
    let agent = agent(&provider).with_options(GenerateOptions {
        max_iterations: 1,
        retry: RetryPolicy::none(),
        ..GenerateOptions::default()
    });

    assert_eq!(agent.chat("Hotels?", &[]).await, "Let me look up hotels.");
}
