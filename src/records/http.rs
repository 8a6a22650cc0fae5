//! HTTP client for the student-records service.

use super::{CreateOutcome, RecordsStore};
use crate::config::RecordsSettings;
use crate::error::{Result, SvarError};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::time::Duration;
use url::Url;

/// Records backend talking to the student-records HTTP service.
pub struct HttpRecordsStore {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpRecordsStore {
    /// Create a new client from records settings.
    pub fn new(settings: &RecordsSettings) -> Result<Self> {
        let base_url = parse_base_url(&settings.base_url)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self { client, base_url })
    }

    fn students_url(&self) -> Url {
        let mut url = self.base_url.clone();
        // Validated as a base URL at construction time, so segments exist.
        url.path_segments_mut()
            .unwrap()
            .pop_if_empty()
            .push("students");
        url
    }

    fn by_department_url(&self, department: &str) -> Url {
        let mut url = self.students_url();
        url.path_segments_mut().unwrap().push("by-dept");
        url.query_pairs_mut().append_pair("dept", department);
        url
    }

    async fn fetch_records(&self, url: Url) -> Result<Vec<Value>> {
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(SvarError::Records(format!(
                "GET {} returned {}",
                url.path(),
                response.status()
            )));
        }

        let records: Vec<Value> = response.json().await.map_err(|e| {
            SvarError::Records(format!("GET {} returned non-JSON body: {}", url.path(), e))
        })?;

        Ok(records)
    }
}

#[async_trait]
impl RecordsStore for HttpRecordsStore {
    async fn list_students(&self) -> Result<Vec<Value>> {
        self.fetch_records(self.students_url()).await
    }

    async fn list_by_department(&self, department: &str) -> Result<Vec<Value>> {
        self.fetch_records(self.by_department_url(department)).await
    }

    async fn create_student(&self, fields: &Map<String, Value>) -> Result<CreateOutcome> {
        let response = self
            .client
            .post(self.students_url())
            .json(fields)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(CreateOutcome::Created)
        } else {
            let body = response.text().await.unwrap_or_default();
            Ok(CreateOutcome::Rejected(body))
        }
    }
}

/// Parse and validate the records service base URL.
fn parse_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url)
        .map_err(|e| SvarError::Config(format!("Invalid records base_url '{}': {}", base_url, e)))?;

    if url.cannot_be_a_base() {
        return Err(SvarError::Config(format!(
            "Records base_url '{}' cannot be used as a base URL",
            base_url
        )));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(base_url: &str) -> HttpRecordsStore {
        HttpRecordsStore::new(&RecordsSettings {
            base_url: base_url.to_string(),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_students_url() {
        let store = store("http://localhost:8081");
        assert_eq!(store.students_url().as_str(), "http://localhost:8081/students");
    }

    #[test]
    fn test_by_department_url() {
        let store = store("http://localhost:8081");
        assert_eq!(
            store.by_department_url("CSE").as_str(),
            "http://localhost:8081/students/by-dept?dept=CSE"
        );
    }

    #[test]
    fn test_department_query_value_is_encoded() {
        let store = store("http://localhost:8081");
        let url = store.by_department_url("E&CE dept");
        assert_eq!(
            url.as_str(),
            "http://localhost:8081/students/by-dept?dept=E%26CE+dept"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = HttpRecordsStore::new(&RecordsSettings {
            base_url: "not a url".to_string(),
            timeout_seconds: 5,
        });
        assert!(matches!(result, Err(SvarError::Config(_))));
    }
}
