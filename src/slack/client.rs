//! Slack Web API client for sending replies.

use crate::error::{Result, SvarError};
use serde::Deserialize;
use std::time::Duration;

const POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

/// Request timeout for Web API calls.
const TIMEOUT_SECS: u64 = 15;

/// Minimal Slack Web API client.
///
/// Holds the bot token; intentionally does not derive Debug so the token
/// cannot end up in logs.
pub struct SlackClient {
    http: reqwest::Client,
    token: String,
}

/// Response shape shared by Slack Web API methods.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    error: Option<String>,
}

impl SlackClient {
    /// Create a client from a bot token.
    pub fn new(token: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            token: token.to_string(),
        })
    }

    /// Post a message to a channel (the `say` callback of the event flow).
    pub async fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        let response = self
            .http
            .post(POST_MESSAGE_URL)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({
                "channel": channel,
                "text": text,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SvarError::Slack(format!(
                "chat.postMessage returned {}",
                response.status()
            )));
        }

        let body: ApiResponse = response.json().await?;
        if !body.ok {
            return Err(SvarError::Slack(
                body.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        Ok(())
    }
}
