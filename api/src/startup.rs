//! Builds the grading pipeline from the process configuration.

use db::{RestStore, SqlStore, SubmissionStore};
use marker::{Grader, GradingConfig, LlmGrader, MarkerError, Rubric, RubricError};
use sea_orm::DbErr;
use services::GradingPipeline;
use std::sync::Arc;
use std::time::Duration;
use util::config::{self, AppConfig, RemoteTable};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("could not load rubric: {0}")]
    Rubric(#[from] RubricError),

    #[error("{0} (set OPENAI_API_KEY)")]
    Grading(#[from] MarkerError),

    #[error("SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY must be set together; {missing} is missing")]
    PartialRemoteTable { missing: &'static str },

    #[error("could not open submission database: {0}")]
    Database(#[from] DbErr),
}

/// Loads the rubric, builds the grading client and picks the submission store.
///
/// The hosted table is used when both its URL and service key are set, the SeaORM
/// database at `DATABASE_PATH` when neither is. Setting only one is an error.
pub async fn build_pipeline() -> Result<GradingPipeline, StartupError> {
    let rubric_path = config::rubric_path();
    let rubric = if rubric_path.trim().is_empty() {
        tracing::info!("using built-in rubric");
        Rubric::builtin()
    } else {
        tracing::info!(path = %rubric_path, "loading rubric");
        Rubric::load(&rubric_path)?
    };

    let grading = GradingConfig::new(
        config::openai_api_key(),
        config::llm_model(),
        config::llm_base_url(),
    )?;
    tracing::info!(model = grading.model(), "grading client configured");
    let grader: Arc<dyn Grader> = Arc::new(LlmGrader::new(grading));

    let remote = AppConfig::global().remote_table();
    let store: Arc<dyn SubmissionStore> = match remote {
        RemoteTable::Configured => {
            tracing::info!(url = %config::supabase_url(), "storing submissions in hosted table");
            Arc::new(RestStore::new(
                config::supabase_url(),
                config::supabase_service_role_key(),
            ))
        }
        RemoteTable::Partial { missing } => {
            return Err(StartupError::PartialRemoteTable { missing });
        }
        RemoteTable::Unset => {
            tracing::info!(
                path = %config::database_path(),
                "storing submissions in local database"
            );
            Arc::new(SqlStore::new(db::connect().await?))
        }
    };

    Ok(GradingPipeline::new(grader, store, Arc::new(rubric)))
}

/// How long an idle session is kept, and how often idle sessions are swept.
pub fn session_timing() -> (Duration, Duration) {
    let ttl = Duration::from_secs(config::session_ttl_secs());
    let sweep = (ttl / 4).clamp(Duration::from_secs(1), Duration::from_secs(300));
    (ttl, sweep)
}
