//! Ask command implementation.

use crate::agent::{Agent, ToolContext};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::records::HttpRecordsStore;
use anyhow::Result;
use std::sync::Arc;

/// Run the ask command.
pub async fn run_ask(question: &str, model: Option<String>, settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ask) {
        Output::error(&format!("{}", e));
        Output::info("Run 'svar doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let model = model.unwrap_or_else(|| settings.agent.model.clone());

    let records = Arc::new(HttpRecordsStore::new(&settings.records)?);
    let agent = Agent::new(ToolContext::new(records), &model)
        .with_max_iterations(settings.agent.max_iterations);

    let spinner = Output::spinner("Agent working...");

    match agent.run(question).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.content);

            if !response.tool_calls.is_empty() {
                Output::header(&format!("Tool calls ({})", response.tool_calls.len()));
                for call in &response.tool_calls {
                    Output::info(&format!("  {} {}", call.name, truncate(&call.arguments, 60)));
                }
                println!();
            }

            Output::info(&format!("Completed in {} iteration(s)", response.iterations));
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Agent failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("0123456789", 8), "01234...");
    }
}
