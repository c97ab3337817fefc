use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202610160001_create_student_submissions"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("student_submissions"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("student_id")).text().not_null())
                    .col(ColumnDef::new(Alias::new("answer_1")).text().not_null())
                    .col(ColumnDef::new(Alias::new("answer_2")).text().not_null())
                    .col(ColumnDef::new(Alias::new("answer_3")).text().not_null())
                    .col(ColumnDef::new(Alias::new("feedback_1")).text().not_null())
                    .col(ColumnDef::new(Alias::new("feedback_2")).text().not_null())
                    .col(ColumnDef::new(Alias::new("feedback_3")).text().not_null())
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .to_owned(),
            )
            .await?;

        // Non-unique: the same student may submit more than once.
        manager
            .create_index(
                Index::create()
                    .name("idx_student_submissions_student_id")
                    .table(Alias::new("student_submissions"))
                    .col(Alias::new("student_id"))
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(Alias::new("student_submissions"))
                    .to_owned(),
            )
            .await
    }
}
