//! Svar - Student Records Slack Bot
//!
//! A Slack bot that answers questions about a student-records service by
//! driving an LLM tool-calling agent.
//!
//! The name "Svar" comes from the Norwegian/Scandinavian word for "answer."
//!
//! # Overview
//!
//! Svar allows you to:
//! - Mention the bot in a channel or DM it with questions about students
//! - List students, filter by department, and create new records in chat
//! - Run the same agent from the terminal with `svar ask` or `svar chat`
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `records` - Student-records service client
//! - `agent` - LLM agent loop and tool adapters
//! - `slack` - Slack Events API listener and Web API client
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use svar::agent::{Agent, ToolContext};
//! use svar::config::Settings;
//! use svar::records::HttpRecordsStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let records = Arc::new(HttpRecordsStore::new(&settings.records)?);
//!     let agent = Agent::new(ToolContext::new(records), &settings.agent.model);
//!
//!     let response = agent.run("How many students are in CSE?").await?;
//!     println!("{}", response.content);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod records;
pub mod slack;

pub use error::{Result, SvarError};
