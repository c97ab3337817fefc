//! Persistence for graded submissions.
//!
//! [`store::SubmissionStore`] is the write-only seam the rest of the workspace uses.
//! Two backends implement it:
//! - [`rest_store::RestStore`] inserts into a hosted `student_submissions` table over HTTP.
//! - [`sql_store::SqlStore`] inserts through SeaORM (SQLite by default).

pub mod models;
pub mod rest_store;
pub mod sql_store;
pub mod store;
pub mod test_utils;

pub use rest_store::RestStore;
pub use sql_store::SqlStore;
pub use store::{PersistenceError, RecordId, SubmissionRecord, SubmissionStore};

use migration::Migrator;
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::path::Path;
use util::config;

/// Connects to the database named by `DATABASE_PATH` and applies pending migrations.
///
/// A value starting with `sqlite:` or `postgres://` is used as a DSN as-is; anything
/// else is treated as a SQLite file path whose parent directory is created on demand.
pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    let path_or_url = config::database_path();
    let url = if path_or_url.starts_with("sqlite:") || path_or_url.starts_with("postgres://") {
        path_or_url
    } else {
        // SQLite won't create intermediate dirs.
        if let Some(parent) = Path::new(&path_or_url).parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        format!("sqlite://{path_or_url}?mode=rwc")
    };

    let db = Database::connect(&url).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}
