use crate::store::{PersistenceError, SubmissionRecord, SubmissionRow};
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "student_submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub student_id: String,

    pub answer_1: String,
    pub answer_2: String,
    pub answer_3: String,

    /// `"O: ..."` when correct, `"X: ..."` when incorrect.
    pub feedback_1: String,
    pub feedback_2: String,
    pub feedback_3: String,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(db: &DbConn, record: &SubmissionRecord) -> Result<Model, DbErr> {
        let row = SubmissionRow::from(record);
        let submission = ActiveModel {
            student_id: Set(row.student_id),
            answer_1: Set(row.answer_1),
            answer_2: Set(row.answer_2),
            answer_3: Set(row.answer_3),
            feedback_1: Set(row.feedback_1),
            feedback_2: Set(row.feedback_2),
            feedback_3: Set(row.feedback_3),
            created_at: Set(row.created_at),
            ..Default::default()
        };

        submission.insert(db).await
    }

    pub async fn find_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub fn into_record(self) -> Result<SubmissionRecord, PersistenceError> {
        SubmissionRecord::try_from(SubmissionRow {
            student_id: self.student_id,
            answer_1: self.answer_1,
            answer_2: self.answer_2,
            answer_3: self.answer_3,
            feedback_1: self.feedback_1,
            feedback_2: self.feedback_2,
            feedback_3: self.feedback_3,
            created_at: self.created_at,
        })
    }
}
