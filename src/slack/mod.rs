//! Slack integration for Svar.
//!
//! Receives Events API callbacks over HTTP and replies through the Web API.

mod client;
mod events;
mod server;

pub use client::SlackClient;
pub use events::{strip_mention, CallbackEvent, EventEnvelope, MentionEvent, MessageEvent};
pub use server::{router, run_server, AppState};
