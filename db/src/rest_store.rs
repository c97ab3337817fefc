//! Hosted-table store.
//!
//! Inserts one row per call into a PostgREST-style endpoint
//! (`POST {url}/rest/v1/{table}`), authenticating with the service key in both the
//! `apikey` and `Authorization` headers. `Prefer: return=representation` makes the
//! service echo the inserted row so the generated `id` can be read back.

use crate::store::{PersistenceError, RecordId, SubmissionRecord, SubmissionRow, SubmissionStore};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;

pub const DEFAULT_TABLE: &str = "student_submissions";

#[derive(Deserialize)]
struct InsertedRow {
    id: i64,
}

#[derive(Clone)]
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    table: String,
}

impl fmt::Debug for RestStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestStore")
            .field("base_url", &self.base_url)
            .field("service_key", &"<redacted>")
            .field("table", &self.table)
            .finish()
    }
}

impl RestStore {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self::with_table(base_url, service_key, DEFAULT_TABLE)
    }

    pub fn with_table(
        base_url: impl Into<String>,
        service_key: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            table: table.into(),
        }
    }

    fn insert_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }
}

#[async_trait]
impl SubmissionStore for RestStore {
    async fn save(&self, record: &SubmissionRecord) -> Result<RecordId, PersistenceError> {
        let row = SubmissionRow::from(record);

        let response = self
            .client
            .post(self.insert_url())
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await
            .map_err(|e| PersistenceError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PersistenceError::Transport(e.to_string()))?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::error!(status = status.as_u16(), "submission store rejected credentials");
            return Err(PersistenceError::Unauthorized {
                status: status.as_u16(),
                body,
            });
        }
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "submission insert rejected");
            return Err(PersistenceError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let inserted: Vec<InsertedRow> = serde_json::from_str(&body)
            .map_err(|e| PersistenceError::InvalidResponse(e.to_string()))?;
        let id = inserted
            .first()
            .map(|row| RecordId(row.id))
            .ok_or_else(|| PersistenceError::InvalidResponse("no row returned".into()))?;

        tracing::info!(
            student_id = record.student_id(),
            record_id = id.0,
            "submission stored"
        );
        Ok(id)
    }
}
