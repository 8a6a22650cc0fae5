//! CLI module for Svar.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Svar - Student Records Slack Bot
///
/// A Slack bot that answers questions about a student-records service.
/// The name "Svar" comes from the Norwegian/Scandinavian word for "answer."
#[derive(Parser, Debug)]
#[command(name = "svar")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the Slack events listener
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask the agent a one-off question from the terminal
    Ask {
        /// The question to ask
        question: String,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Start an interactive chat session with the agent
    Chat {
        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Check tokens, configuration, and records service reachability
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
