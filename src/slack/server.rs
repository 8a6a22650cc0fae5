//! Slack events listener.
//!
//! Serves the Events API endpoint: answers the url_verification handshake
//! and dispatches mention/message events to the agent.

use super::client::SlackClient;
use super::events::{strip_mention, CallbackEvent, EventEnvelope, MessageEvent};
use crate::agent::Agent;
use crate::error::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared application state.
///
/// Constructed once at startup and read-only afterwards; handlers share no
/// other state across events.
pub struct AppState {
    pub agent: Agent,
    pub slack: SlackClient,
}

/// Build the events router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/slack/events", post(slack_events))
        .with_state(state)
}

/// Bind and serve the events listener.
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening for Slack events on http://{}", addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Events API endpoint.
///
/// The event is handled before the 200 acknowledgement goes out: the reply
/// is posted through the Web API, not through this response.
async fn slack_events(
    State(state): State<Arc<AppState>>,
    Json(envelope): Json<EventEnvelope>,
) -> Response {
    match envelope {
        EventEnvelope::UrlVerification { challenge } => {
            Json(serde_json::json!({ "challenge": challenge })).into_response()
        }
        EventEnvelope::EventCallback { event } => {
            handle_event(&state, event).await;
            StatusCode::OK.into_response()
        }
        EventEnvelope::Other => StatusCode::OK.into_response(),
    }
}

/// Dispatch one callback event to the agent.
async fn handle_event(state: &AppState, event: CallbackEvent) {
    match event {
        CallbackEvent::AppMention(mention) => {
            let input = strip_mention(&mention.text).to_string();
            info!("Mention handler input: {}", input);
            answer(state, &mention.channel, &input).await;
        }
        CallbackEvent::Message(message) => {
            let Some((channel, input)) = message_dispatch(message) else {
                return;
            };
            info!("Message handler input: {}", input);
            answer(state, &channel, &input).await;
        }
        CallbackEvent::Other => {}
    }
}

/// Decide whether a message event gets an answer.
///
/// Bot-originated messages are dropped here, before the agent is invoked,
/// so redelivered bot messages stay no-ops.
fn message_dispatch(message: MessageEvent) -> Option<(String, String)> {
    if message.is_bot_originated() {
        return None;
    }
    let channel = message.channel?;
    Some((channel, message.text.trim().to_string()))
}

/// Run the agent and reply to the originating channel.
///
/// A failed agent run still produces a reply: the user always receives
/// either an answer or a diagnostic line.
async fn answer(state: &AppState, channel: &str, input: &str) {
    let reply = match state.agent.run(input).await {
        Ok(response) => response.content,
        Err(e) => {
            warn!("Agent run failed: {}", e);
            format!("Sorry, I ran into a problem answering that: {}", e)
        }
    };

    if let Err(e) = state.slack.post_message(channel, &reply).await {
        error!("Failed to post reply to {}: {}", channel, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str, channel: Option<&str>, subtype: Option<&str>) -> MessageEvent {
        MessageEvent {
            text: text.to_string(),
            channel: channel.map(String::from),
            subtype: subtype.map(String::from),
            user: None,
        }
    }

    #[test]
    fn test_bot_messages_are_dropped() {
        let event = message("There are 2 students.", Some("D01"), Some("bot_message"));
        assert!(message_dispatch(event).is_none());
    }

    #[test]
    fn test_user_messages_are_answered() {
        let event = message("  how many students?  ", Some("D01"), None);
        assert_eq!(
            message_dispatch(event),
            Some(("D01".to_string(), "how many students?".to_string()))
        );
    }

    #[test]
    fn test_channelless_messages_are_dropped() {
        let event = message("hello", None, None);
        assert!(message_dispatch(event).is_none());
    }
}
