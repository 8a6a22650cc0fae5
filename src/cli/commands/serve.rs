//! Serve command - run the Slack events listener.

use crate::agent::{Agent, ToolContext};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::records::HttpRecordsStore;
use crate::slack::{run_server, AppState, SlackClient};
use anyhow::Result;
use std::sync::Arc;

/// Run the serve command.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Serve) {
        Output::error(&format!("{}", e));
        Output::info("Run 'svar doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let token = Settings::slack_bot_token()?;

    let records = Arc::new(HttpRecordsStore::new(&settings.records)?);
    let agent = Agent::new(ToolContext::new(records), &settings.agent.model)
        .with_max_iterations(settings.agent.max_iterations);
    let slack = SlackClient::new(&token)?;

    let state = Arc::new(AppState { agent, slack });

    let host = host.unwrap_or_else(|| settings.slack.host.clone());
    let port = port.unwrap_or(settings.slack.port);

    Output::header("Svar Slack Bot");
    println!();
    Output::success(&format!("Listening on http://{}:{}", host, port));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Slack Events", "POST /slack/events");
    println!();
    Output::kv("Records service", &settings.records.base_url);
    Output::kv("Model", &settings.agent.model);
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    run_server(&host, port, state).await?;

    Ok(())
}
