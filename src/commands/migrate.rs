//! `migrate` subcommand: schema changes for the supplier and identity tables.

use sea_orm::DbErr;

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

fn schema_error(step: &'static str) -> impl FnOnce(DbErr) -> AppError {
    move |e| AppError::internal(format!("{} failed: {}", step, e))
}

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(schema_error("Connecting to the schema database"))?;

    match args.action {
        MigrateAction::Up => {
            // The bookkeeping table does not exist before the first run.
            let pending = db
                .migration_status()
                .await
                .map(|status| pending_count(&status))
                .ok();
            db.run_migrations()
                .await
                .map_err(schema_error("Applying schema changes"))?;
            tracing::info!(pending_before = ?pending, "Schema is up to date");
        }
        MigrateAction::Down => {
            db.rollback_migration()
                .await
                .map_err(schema_error("Reverting the newest schema change"))?;
            tracing::info!("Newest schema change reverted");
        }
        MigrateAction::Status => {
            let status = db
                .migration_status()
                .await
                .map_err(schema_error("Reading schema state"))?;
            print!("{}", status_report(&status));
        }
        MigrateAction::Fresh => {
            tracing::warn!("Rebuilding schema from scratch, existing rows will be lost");
            db.fresh_migrations()
                .await
                .map_err(schema_error("Rebuilding the schema"))?;
            tracing::info!("Schema rebuilt");
        }
    }

    Ok(())
}

fn pending_count(status: &[(String, bool)]) -> usize {
    status.iter().filter(|(_, applied)| !applied).count()
}

/// One `[x]`/`[ ]` line per migration, then a pending summary.
fn status_report(status: &[(String, bool)]) -> String {
    let mut report = String::new();
    for (name, applied) in status {
        let mark = if *applied { 'x' } else { ' ' };
        report.push_str(&format!("[{}] {}\n", mark, name));
    }
    report.push_str(&format!(
        "{} of {} schema changes pending\n",
        pending_count(status),
        status.len()
    ));
    report
}
