//! In-memory records backend.
//!
//! Records every call it receives, so tests can assert exactly which
//! requests the tool adapters issued.

use super::{CreateOutcome, RecordsStore};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::RwLock;

/// A call observed by the in-memory backend.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    List,
    ByDepartment(String),
    Create(Map<String, Value>),
}

/// In-memory records backend.
pub struct MemoryRecordsStore {
    students: RwLock<Vec<Value>>,
    calls: RwLock<Vec<RecordedCall>>,
    reject_body: Option<String>,
}

impl MemoryRecordsStore {
    /// Create an empty in-memory backend.
    pub fn new() -> Self {
        Self {
            students: RwLock::new(Vec::new()),
            calls: RwLock::new(Vec::new()),
            reject_body: None,
        }
    }

    /// Create a backend seeded with student records.
    pub fn with_students(students: Vec<Value>) -> Self {
        Self {
            students: RwLock::new(students),
            calls: RwLock::new(Vec::new()),
            reject_body: None,
        }
    }

    /// Make every create request come back rejected with the given body.
    pub fn rejecting_creates(mut self, body: &str) -> Self {
        self.reject_body = Some(body.to_string());
        self
    }

    /// Calls observed so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().unwrap().clone()
    }

    /// Current student records.
    pub fn students(&self) -> Vec<Value> {
        self.students.read().unwrap().clone()
    }
}

impl Default for MemoryRecordsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordsStore for MemoryRecordsStore {
    async fn list_students(&self) -> Result<Vec<Value>> {
        self.calls.write().unwrap().push(RecordedCall::List);
        Ok(self.students.read().unwrap().clone())
    }

    async fn list_by_department(&self, department: &str) -> Result<Vec<Value>> {
        self.calls
            .write()
            .unwrap()
            .push(RecordedCall::ByDepartment(department.to_string()));

        let students = self.students.read().unwrap();
        Ok(students
            .iter()
            .filter(|s| s["department"] == department)
            .cloned()
            .collect())
    }

    async fn create_student(&self, fields: &Map<String, Value>) -> Result<CreateOutcome> {
        self.calls
            .write()
            .unwrap()
            .push(RecordedCall::Create(fields.clone()));

        if let Some(body) = &self.reject_body {
            return Ok(CreateOutcome::Rejected(body.clone()));
        }

        self.students
            .write()
            .unwrap()
            .push(Value::Object(fields.clone()));
        Ok(CreateOutcome::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_calls_are_recorded_in_order() {
        let store = MemoryRecordsStore::new();
        store.list_students().await.unwrap();
        store.list_by_department("CSE").await.unwrap();

        assert_eq!(
            store.calls(),
            vec![
                RecordedCall::List,
                RecordedCall::ByDepartment("CSE".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_department_filter() {
        let store = MemoryRecordsStore::with_students(vec![
            json!({"name": "A", "department": "CSE"}),
            json!({"name": "B", "department": "ECE"}),
        ]);

        let matched = store.list_by_department("CSE").await.unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0]["name"], "A");

        let unmatched = store.list_by_department("MECH").await.unwrap();
        assert!(unmatched.is_empty());
    }

    #[tokio::test]
    async fn test_rejecting_creates() {
        let store = MemoryRecordsStore::new().rejecting_creates("duplicate roll number");
        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String("Riya".to_string()));

        let outcome = store.create_student(&fields).await.unwrap();
        assert_eq!(
            outcome,
            CreateOutcome::Rejected("duplicate roll number".to_string())
        );
        assert!(store.students().is_empty());
    }
}
