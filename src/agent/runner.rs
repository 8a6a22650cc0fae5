//! Agent runner with tool calling loop.

use super::tools::{parse_tool_call, tool_definitions, ToolContext};
use crate::error::{Result, SvarError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use tracing::{debug, info};

/// Default system prompt for the agent.
const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an assistant for a student-records service.

You have tools to list all students, list students in a department, and create a new student record.

Guidelines:
- Use 'list_students' to count students or show every record
- Use 'list_students_by_department' when the question names a department like CSE or ECE
- Use 'create_student' to add a record; pass comma-separated key=value pairs

When you have gathered enough information, provide your final answer.
Keep answers short and suitable for a chat message."#;

/// Default bound on tool-selection rounds.
const DEFAULT_MAX_ITERATIONS: usize = 4;

/// Answer used when the model produces no text at all.
const EXHAUSTED_FALLBACK: &str =
    "I couldn't reach a conclusive answer. Here is what I found so far from the records service.";

/// Agent that answers questions by calling student-records tools.
pub struct Agent {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    tools: ToolContext,
    max_iterations: usize,
    system_prompt: String,
}

impl Agent {
    /// Create a new agent with the given tool context and model.
    pub fn new(tools: ToolContext, model: &str) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
            tools,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Set a custom system prompt.
    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        self.system_prompt = prompt.to_string();
        self
    }

    /// Set maximum tool-selection rounds for the agent loop.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Run the agent on a user message.
    ///
    /// The loop is bounded: after `max_iterations` tool-selection rounds the
    /// agent stops offering tools and asks the model for its best available
    /// answer, so exhaustion still yields usable text instead of an error.
    pub async fn run(&self, task: &str) -> Result<AgentResponse> {
        let mut messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_prompt.clone())
                .build()
                .map_err(|e| SvarError::Agent(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(task.to_string())
                .build()
                .map_err(|e| SvarError::Agent(e.to_string()))?
                .into(),
        ];

        let mut iterations = 0;
        let mut tool_calls_made = Vec::new();

        while iterations < self.max_iterations {
            iterations += 1;
            debug!("Agent iteration {}", iterations);

            // Call LLM with tools
            let request = CreateChatCompletionRequestArgs::default()
                .model(&self.model)
                .messages(messages.clone())
                .tools(tool_definitions())
                .build()
                .map_err(|e| SvarError::Agent(e.to_string()))?;

            let response = self
                .client
                .chat()
                .create(request)
                .await
                .map_err(|e| SvarError::OpenAI(format!("Agent API error: {}", e)))?;

            let choice = response
                .choices
                .first()
                .ok_or_else(|| SvarError::Agent("No response from model".to_string()))?;

            match &choice.message.tool_calls {
                Some(tool_calls) if !tool_calls.is_empty() => {
                    // Add assistant message with tool calls to history
                    let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
                        .tool_calls(tool_calls.clone())
                        .build()
                        .map_err(|e| SvarError::Agent(e.to_string()))?;
                    messages.push(assistant_msg.into());

                    // Execute each tool call and feed the result back
                    for tool_call in tool_calls {
                        let record = self.execute_tool_call(tool_call).await;

                        let tool_msg = ChatCompletionRequestToolMessageArgs::default()
                            .tool_call_id(&tool_call.id)
                            .content(record.result.clone())
                            .build()
                            .map_err(|e| SvarError::Agent(e.to_string()))?;
                        messages.push(tool_msg.into());

                        tool_calls_made.push(record);
                    }
                }
                _ => {
                    // No tool calls, the model considers the task done
                    return Ok(build_response(
                        &choice.message.content,
                        tool_calls_made,
                        iterations,
                    ));
                }
            }
        }

        info!(
            "Agent hit the iteration limit ({}), generating best-effort answer",
            self.max_iterations
        );
        self.finish_without_tools(messages, tool_calls_made, iterations)
            .await
    }

    /// One final completion with no tools offered, so the model must answer
    /// from whatever the tool results contain.
    async fn finish_without_tools(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
        tool_calls_made: Vec<ToolCallRecord>,
        iterations: usize,
    ) -> Result<AgentResponse> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .build()
            .map_err(|e| SvarError::Agent(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| SvarError::OpenAI(format!("Agent API error: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone());

        Ok(build_response(&content, tool_calls_made, iterations + 1))
    }

    /// Execute a single tool call and return a record of it.
    async fn execute_tool_call(&self, tool_call: &ChatCompletionMessageToolCall) -> ToolCallRecord {
        let name = &tool_call.function.name;
        let arguments = &tool_call.function.arguments;

        info!("Agent calling tool: {} with args: {}", name, arguments);

        // Failures become observations for the model, never faults
        let result = match parse_tool_call(name, arguments) {
            Ok(tool) => match self.tools.execute(&tool).await {
                Ok(output) => output,
                Err(e) => format!("Tool error: {}", e),
            },
            Err(e) => format!("Failed to parse tool call: {}", e),
        };

        ToolCallRecord {
            name: name.clone(),
            arguments: arguments.clone(),
            result,
        }
    }
}

/// Build the final agent response, substituting a fallback for empty content.
fn build_response(
    content: &Option<String>,
    tool_calls: Vec<ToolCallRecord>,
    iterations: usize,
) -> AgentResponse {
    let content = match content {
        Some(text) if !text.trim().is_empty() => text.clone(),
        _ => {
            let mut text = EXHAUSTED_FALLBACK.to_string();
            if let Some(last) = tool_calls.last() {
                text.push_str("\n\n");
                text.push_str(&last.result);
            }
            text
        }
    };

    AgentResponse {
        content,
        tool_calls,
        iterations,
    }
}

/// Response from an agent run.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final response content from the agent.
    pub content: String,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of LLM calls used.
    pub iterations: usize,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned by the tool.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}
