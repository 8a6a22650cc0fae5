//! Student-records service abstraction.
//!
//! Provides a trait-based interface over the records HTTP service so the
//! agent tools can be exercised against an in-memory backend in tests.

mod http;
mod memory;

pub use http::HttpRecordsStore;
pub use memory::{MemoryRecordsStore, RecordedCall};

use crate::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Outcome of a create request.
///
/// A rejected create is not an error at this layer: the agent loop consumes
/// the service's response body as a textual observation.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// The service accepted the record.
    Created,
    /// The service refused; carries the raw response body.
    Rejected(String),
}

/// Trait for student-records backends.
///
/// Student records are opaque JSON objects; Svar never interprets their
/// shape beyond counting and pretty-printing.
#[async_trait]
pub trait RecordsStore: Send + Sync {
    /// Fetch all student records.
    async fn list_students(&self) -> Result<Vec<Value>>;

    /// Fetch student records filtered by department.
    async fn list_by_department(&self, department: &str) -> Result<Vec<Value>>;

    /// Create a student record from the given fields.
    async fn create_student(&self, fields: &Map<String, Value>) -> Result<CreateOutcome>;
}
