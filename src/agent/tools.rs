//! Tool definitions and implementations for the agent system.

use crate::error::{Result, SvarError};
use crate::records::{CreateOutcome, RecordsStore};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Available tools for the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ToolCall {
    /// List every student record.
    ListStudents,

    /// List students in a department.
    ListStudentsByDepartment { department: String },

    /// Create a student from a comma-separated `key=value` field spec.
    CreateStudent { fields: String },
}

/// Tool execution context with access to the records backend.
///
/// Constructed once at startup; the tool set is immutable for the process
/// lifetime.
pub struct ToolContext {
    pub records: Arc<dyn RecordsStore>,
}

impl ToolContext {
    /// Create a new tool context.
    pub fn new(records: Arc<dyn RecordsStore>) -> Self {
        Self { records }
    }

    /// Execute a tool call and return the result as a string.
    pub async fn execute(&self, tool: &ToolCall) -> Result<String> {
        match tool {
            ToolCall::ListStudents => self.execute_list_students().await,
            ToolCall::ListStudentsByDepartment { department } => {
                self.execute_list_by_department(department).await
            }
            ToolCall::CreateStudent { fields } => self.execute_create_student(fields).await,
        }
    }

    async fn execute_list_students(&self) -> Result<String> {
        let students = self.records.list_students().await?;
        Ok(format!(
            "There are {} students.\n\n{}",
            students.len(),
            serde_json::to_string_pretty(&students)?
        ))
    }

    async fn execute_list_by_department(&self, department: &str) -> Result<String> {
        // The department comes from an LLM and may arrive quoted or padded.
        let department = strip_wrapping(department);
        let students = self.records.list_by_department(department).await?;
        Ok(format!(
            "There are {} in {}:\n\n{}",
            students.len(),
            department,
            serde_json::to_string_pretty(&students)?
        ))
    }

    async fn execute_create_student(&self, fields: &str) -> Result<String> {
        let parsed = parse_field_spec(fields)?;
        match self.records.create_student(&parsed).await? {
            CreateOutcome::Created => Ok("Student created!".to_string()),
            CreateOutcome::Rejected(body) => Ok(body),
        }
    }
}

/// Strip surrounding quotes and whitespace from an LLM-produced argument.
pub fn strip_wrapping(input: &str) -> &str {
    input
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .trim()
}

/// Parse a comma-separated `key=value` field spec into a JSON object.
///
/// Each segment is split on the first `=`; a segment with no `=` is an
/// error, and no request may be issued from a partially parsed spec.
pub fn parse_field_spec(input: &str) -> Result<Map<String, Value>> {
    let cleaned = input.replace(['\'', '"'], "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return Err(SvarError::InvalidInput("empty field spec".to_string()));
    }

    let mut fields = Map::new();
    for segment in cleaned.split(',') {
        let segment = segment.trim();
        let (key, value) = segment.split_once('=').ok_or_else(|| {
            SvarError::InvalidInput(format!("missing '=' in segment '{}'", segment))
        })?;
        fields.insert(
            key.trim().to_string(),
            Value::String(value.trim().to_string()),
        );
    }

    Ok(fields)
}

/// Get OpenAI function/tool definitions for the agent.
pub fn tool_definitions() -> Vec<async_openai::types::ChatCompletionTool> {
    use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};

    vec![
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "list_students".to_string(),
                description: Some(
                    "Get all students. Use this to count students or see every record."
                        .to_string(),
                ),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {}
                })),
                strict: None,
            },
        },
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "list_students_by_department".to_string(),
                description: Some(
                    "Get the students in one department. Input a department code like 'CSE'."
                        .to_string(),
                ),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "department": {
                            "type": "string",
                            "description": "The department code, e.g. CSE or ECE"
                        }
                    },
                    "required": ["department"]
                })),
                strict: None,
            },
        },
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "create_student".to_string(),
                description: Some(
                    "Create a new student record. \
                    Input comma-separated key=value pairs, e.g. 'name=Riya, department=ECE'."
                        .to_string(),
                ),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "fields": {
                            "type": "string",
                            "description": "Comma-separated key=value pairs for the new record"
                        }
                    },
                    "required": ["fields"]
                })),
                strict: None,
            },
        },
    ]
}

/// Parse a tool call from the OpenAI response format.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    // Models occasionally send an empty argument string for no-arg tools.
    let arguments = if arguments.trim().is_empty() {
        "{}"
    } else {
        arguments
    };

    let args: serde_json::Value = serde_json::from_str(arguments)
        .map_err(|e| SvarError::Agent(format!("Invalid tool arguments: {}", e)))?;

    match name {
        "list_students" => Ok(ToolCall::ListStudents),
        "list_students_by_department" => {
            let department = args["department"]
                .as_str()
                .ok_or_else(|| SvarError::Agent("Missing 'department' argument".to_string()))?
                .to_string();
            Ok(ToolCall::ListStudentsByDepartment { department })
        }
        "create_student" => {
            let fields = args["fields"]
                .as_str()
                .ok_or_else(|| SvarError::Agent("Missing 'fields' argument".to_string()))?
                .to_string();
            Ok(ToolCall::CreateStudent { fields })
        }
        _ => Err(SvarError::Agent(format!("Unknown tool: {}", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{MemoryRecordsStore, RecordedCall};
    use serde_json::json;

    fn cse_pair() -> Vec<Value> {
        vec![
            json!({"name": "A", "department": "CSE"}),
            json!({"name": "B", "department": "CSE"}),
        ]
    }

    #[test]
    fn test_strip_wrapping() {
        assert_eq!(strip_wrapping("'CSE '"), "CSE");
        assert_eq!(strip_wrapping(" \"ECE\""), "ECE");
        assert_eq!(strip_wrapping("CSE"), "CSE");
        assert_eq!(strip_wrapping("  "), "");
    }

    #[test]
    fn test_parse_field_spec() {
        let fields = parse_field_spec("name=Riya, department=ECE").unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["name"], "Riya");
        assert_eq!(fields["department"], "ECE");
    }

    #[test]
    fn test_parse_field_spec_strips_quotes() {
        let fields = parse_field_spec("'name=Riya, department=\"ECE\"'").unwrap();
        assert_eq!(fields["name"], "Riya");
        assert_eq!(fields["department"], "ECE");
    }

    #[test]
    fn test_parse_field_spec_splits_on_first_equals() {
        let fields = parse_field_spec("note=a=b").unwrap();
        assert_eq!(fields["note"], "a=b");
    }

    #[test]
    fn test_parse_field_spec_missing_equals() {
        let err = parse_field_spec("name=Riya, ECE").unwrap_err();
        assert!(matches!(err, SvarError::InvalidInput(_)));
        assert!(err.to_string().contains("ECE"));
    }

    #[test]
    fn test_parse_tool_call_variants() {
        assert!(matches!(
            parse_tool_call("list_students", "").unwrap(),
            ToolCall::ListStudents
        ));

        match parse_tool_call("list_students_by_department", r#"{"department": "CSE"}"#).unwrap() {
            ToolCall::ListStudentsByDepartment { department } => assert_eq!(department, "CSE"),
            other => panic!("Expected ListStudentsByDepartment, got {:?}", other),
        }

        match parse_tool_call("create_student", r#"{"fields": "name=Riya"}"#).unwrap() {
            ToolCall::CreateStudent { fields } => assert_eq!(fields, "name=Riya"),
            other => panic!("Expected CreateStudent, got {:?}", other),
        }

        assert!(parse_tool_call("drop_students", "{}").is_err());
    }

    #[tokio::test]
    async fn test_execute_list_students() {
        let store = Arc::new(MemoryRecordsStore::with_students(cse_pair()));
        let tools = ToolContext::new(store.clone());

        let output = tools.execute(&ToolCall::ListStudents).await.unwrap();
        assert!(output.starts_with("There are 2 students.\n\n"));
        assert_eq!(store.calls(), vec![RecordedCall::List]);
    }

    #[tokio::test]
    async fn test_execute_by_department_strips_and_counts() {
        let store = Arc::new(MemoryRecordsStore::with_students(cse_pair()));
        let tools = ToolContext::new(store.clone());

        let output = tools
            .execute(&ToolCall::ListStudentsByDepartment {
                department: "'CSE '".to_string(),
            })
            .await
            .unwrap();

        assert!(output.starts_with("There are 2 in CSE:\n\n"));
        // Exactly one request, with the stripped department.
        assert_eq!(
            store.calls(),
            vec![RecordedCall::ByDepartment("CSE".to_string())]
        );

        let body = output.strip_prefix("There are 2 in CSE:\n\n").unwrap();
        let parsed: Vec<Value> = serde_json::from_str(body).unwrap();
        assert_eq!(parsed, cse_pair());
    }

    #[tokio::test]
    async fn test_execute_by_department_zero_matches() {
        let store = Arc::new(MemoryRecordsStore::with_students(cse_pair()));
        let tools = ToolContext::new(store);

        let output = tools
            .execute(&ToolCall::ListStudentsByDepartment {
                department: "MECH".to_string(),
            })
            .await
            .unwrap();
        assert!(output.starts_with("There are 0 in MECH:"));
    }

    #[tokio::test]
    async fn test_execute_create_student() {
        let store = Arc::new(MemoryRecordsStore::new());
        let tools = ToolContext::new(store.clone());

        let output = tools
            .execute(&ToolCall::CreateStudent {
                fields: "name=Riya, department=ECE".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(output, "Student created!");
        let mut expected = Map::new();
        expected.insert("name".to_string(), Value::String("Riya".to_string()));
        expected.insert("department".to_string(), Value::String("ECE".to_string()));
        assert_eq!(store.calls(), vec![RecordedCall::Create(expected)]);
    }

    #[tokio::test]
    async fn test_execute_create_student_malformed_issues_no_request() {
        let store = Arc::new(MemoryRecordsStore::new());
        let tools = ToolContext::new(store.clone());

        let err = tools
            .execute(&ToolCall::CreateStudent {
                fields: "name=Riya, ECE".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SvarError::InvalidInput(_)));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_execute_create_student_rejected_returns_body() {
        let store = Arc::new(MemoryRecordsStore::new().rejecting_creates("duplicate roll number"));
        let tools = ToolContext::new(store);

        let output = tools
            .execute(&ToolCall::CreateStudent {
                fields: "name=Riya".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(output, "duplicate roll number");
    }
}
