//! Slack Events API payload types.

use serde::Deserialize;

/// Top-level Events API envelope.
///
/// Slack sends a one-time `url_verification` handshake when the events URL
/// is configured, then `event_callback` envelopes for subscribed events.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEnvelope {
    UrlVerification { challenge: String },
    EventCallback { event: CallbackEvent },
    #[serde(other)]
    Other,
}

/// Inner event inside an `event_callback` envelope.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallbackEvent {
    AppMention(MentionEvent),
    Message(MessageEvent),
    #[serde(other)]
    Other,
}

/// A public-channel mention of the bot.
#[derive(Debug, Deserialize)]
pub struct MentionEvent {
    #[serde(default)]
    pub text: String,
    pub channel: String,
    pub user: Option<String>,
}

/// A channel or direct message.
#[derive(Debug, Deserialize)]
pub struct MessageEvent {
    #[serde(default)]
    pub text: String,
    pub channel: Option<String>,
    pub subtype: Option<String>,
    pub user: Option<String>,
}

impl MessageEvent {
    /// Whether this message was produced by a bot.
    ///
    /// Bot-originated messages must never be answered, or two bots in one
    /// channel reply to each other forever.
    pub fn is_bot_originated(&self) -> bool {
        self.subtype.as_deref() == Some("bot_message")
    }
}

/// Strip the bot-mention prefix from an `app_mention` text.
///
/// Splits on the first `>` (the end of the `<@BOTID>` marker) and trims the
/// remainder. Text without a mention marker passes through trimmed.
pub fn strip_mention(text: &str) -> &str {
    match text.split_once('>') {
        Some((_, rest)) => rest.trim(),
        None => text.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_mention() {
        assert_eq!(strip_mention("<@BOT123> show all students"), "show all students");
        assert_eq!(strip_mention("show all students"), "show all students");
        assert_eq!(strip_mention("<@BOT123>"), "");
        // Only the first '>' delimits the mention marker.
        assert_eq!(strip_mention("<@BOT123> a > b"), "a > b");
    }

    #[test]
    fn test_url_verification_envelope() {
        let envelope: EventEnvelope = serde_json::from_str(
            r#"{"type": "url_verification", "challenge": "abc123"}"#,
        )
        .unwrap();
        match envelope {
            EventEnvelope::UrlVerification { challenge } => assert_eq!(challenge, "abc123"),
            other => panic!("Expected UrlVerification, got {:?}", other),
        }
    }

    #[test]
    fn test_app_mention_envelope() {
        let envelope: EventEnvelope = serde_json::from_str(
            r#"{
                "type": "event_callback",
                "event": {
                    "type": "app_mention",
                    "text": "<@BOT123> show all students",
                    "channel": "C01",
                    "user": "U01"
                }
            }"#,
        )
        .unwrap();
        match envelope {
            EventEnvelope::EventCallback {
                event: CallbackEvent::AppMention(mention),
            } => {
                assert_eq!(strip_mention(&mention.text), "show all students");
                assert_eq!(mention.channel, "C01");
            }
            other => panic!("Expected AppMention, got {:?}", other),
        }
    }

    #[test]
    fn test_bot_message_subtype() {
        let envelope: EventEnvelope = serde_json::from_str(
            r#"{
                "type": "event_callback",
                "event": {
                    "type": "message",
                    "text": "There are 2 students.",
                    "channel": "D01",
                    "subtype": "bot_message"
                }
            }"#,
        )
        .unwrap();
        match envelope {
            EventEnvelope::EventCallback {
                event: CallbackEvent::Message(message),
            } => assert!(message.is_bot_originated()),
            other => panic!("Expected Message, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_event_tolerated() {
        let envelope: EventEnvelope = serde_json::from_str(
            r#"{
                "type": "event_callback",
                "event": {"type": "reaction_added", "reaction": "thumbsup"}
            }"#,
        )
        .unwrap();
        assert!(matches!(
            envelope,
            EventEnvelope::EventCallback {
                event: CallbackEvent::Other
            }
        ));
    }
}
