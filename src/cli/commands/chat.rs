//! Interactive chat command.
//!
//! Each line is one stateless agent invocation, the same contract the Slack
//! handlers use.

use crate::agent::{Agent, ToolContext};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;
use crate::records::HttpRecordsStore;
use console::style;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

/// Run the interactive chat command.
pub async fn run_chat(model: Option<String>, settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ask) {
        Output::error(&format!("{}", e));
        Output::info("Run 'svar doctor' for detailed diagnostics.");
        return Err(e);
    }

    let model = model.unwrap_or_else(|| settings.agent.model.clone());

    let records = Arc::new(HttpRecordsStore::new(&settings.records)?);
    let agent = Agent::new(ToolContext::new(records), &model)
        .with_max_iterations(settings.agent.max_iterations);

    println!("\n{}", style("Svar Chat").bold().cyan());
    println!(
        "{}\n",
        style("Ask about students, or type 'exit' to quit.").dim()
    );

    let stdin = io::stdin();
    loop {
        print!("{} ", style(">").green().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "exit" || input == "quit" {
            break;
        }

        let spinner = Output::spinner("Thinking...");
        match agent.run(input).await {
            Ok(response) => {
                spinner.finish_and_clear();
                println!("\n{}\n", response.content);
            }
            Err(e) => {
                spinner.finish_and_clear();
                Output::error(&format!("Agent failed: {}", e));
            }
        }
    }

    println!("\n{}", style("Goodbye!").dim());
    Ok(())
}
