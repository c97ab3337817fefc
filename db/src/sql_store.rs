use crate::models::student_submission::Model as StudentSubmission;
use crate::store::{PersistenceError, RecordId, SubmissionRecord, SubmissionStore};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;

/// SeaORM-backed store. Used when no hosted table is configured, and in tests.
#[derive(Clone)]
pub struct SqlStore {
    db: DatabaseConnection,
}

impl SqlStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Reads a stored row back as a record. Not exposed over HTTP.
    pub async fn find_by_id(
        &self,
        id: RecordId,
    ) -> Result<Option<SubmissionRecord>, PersistenceError> {
        StudentSubmission::find_by_id(&self.db, id.0)
            .await?
            .map(StudentSubmission::into_record)
            .transpose()
    }
}

#[async_trait]
impl SubmissionStore for SqlStore {
    async fn save(&self, record: &SubmissionRecord) -> Result<RecordId, PersistenceError> {
        let model = StudentSubmission::create(&self.db, record).await.map_err(|e| {
            tracing::error!(student_id = record.student_id(), error = %e, "insert failed");
            PersistenceError::from(e)
        })?;

        tracing::info!(
            student_id = record.student_id(),
            record_id = model.id,
            "submission stored"
        );
        Ok(RecordId(model.id))
    }
}
