//! Agent system for answering student-records questions with tool calling.
//!
//! Provides an LLM agent that can list students, filter them by department,
//! and create new records by calling the records service through tools.

mod runner;
mod tools;

pub use runner::{Agent, AgentResponse, ToolCallRecord};
pub use tools::{parse_tool_call, tool_definitions, ToolCall, ToolContext};
