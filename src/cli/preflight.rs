//! Pre-flight checks before expensive operations.
//!
//! Validates that required tokens are present before starting operations
//! that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{Result, SvarError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// One-off or interactive agent runs require the LLM API key.
    Ask,
    /// Serving Slack events additionally requires the bot token.
    Serve,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Ask => {
            check_openai_key()?;
        }
        Operation::Serve => {
            check_openai_key()?;
            Settings::slack_bot_token().map(|_| ())?;
        }
    }
    Ok(())
}

/// Check if the OpenAI API key is configured.
fn check_openai_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(SvarError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(SvarError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}
