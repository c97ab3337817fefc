use colored::*;
use migration::Migrator;
use sea_orm::DatabaseConnection;
use sea_orm_migration::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

const STATUS_COLUMN: usize = 72;

/// Applies pending migrations one step at a time, recording each in
/// `seaql_migrations` so the server's own `Migrator::up` sees them as done.
pub async fn run_all_migrations(url: &str) {
    let db = sea_orm::Database::connect(url)
        .await
        .expect("DB connection failed");

    let pending = match Migrator::get_pending_migrations(&db).await {
        Ok(pending) => pending,
        Err(err) => {
            println!("{} {}", "could not read migration status:".red(), err);
            std::process::exit(1);
        }
    };

    if pending.is_empty() {
        println!("{}", "Nothing to migrate".dimmed());
        return;
    }

    println!("Running {} migration(s)...", pending.len());
    for migration in &pending {
        apply_next(&db, migration.name()).await;
    }
}

async fn apply_next(db: &DatabaseConnection, name: &str) {
    let label = format!("Applying {}", name.bold());
    let dots = ".".repeat(STATUS_COLUMN.saturating_sub(label.len()));
    print!("{label}{dots} ");
    io::stdout().flush().ok();

    let start = Instant::now();
    match Migrator::up(db, Some(1)).await {
        Ok(()) => {
            let elapsed = format!("({:.2?})", start.elapsed()).dimmed();
            println!("{} {}", "done".green(), elapsed);
        }
        Err(err) => {
            println!("{} {}", "failed".red(), err);
            std::process::exit(1);
        }
    }
}
