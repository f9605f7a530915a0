//! Users command - identity administration from the shell.

use crate::cli::args::{UsersAction, UsersArgs};
use crate::config::Config;
use crate::domain::UserClaim;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// Execute the users command
pub async fn execute(args: UsersArgs, config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let users = Services::from_connection(db.get_connection(), config).users();

    match args.action {
        UsersAction::GrantClaim {
            email,
            claim_type,
            claim_value,
        } => {
            users
                .grant_claim(&email, UserClaim::new(claim_type.clone(), claim_value))
                .await?;
            println!("Granted {} to {}", claim_type, email);
        }
        UsersAction::RevokeClaim { email, claim_type } => {
            let removed = users.revoke_claim(&email, &claim_type).await?;
            println!("Removed {} {} claim(s) from {}", removed, claim_type, email);
        }
        UsersAction::AddRole { email, role } => {
            users.add_role(&email, &role).await?;
            println!("Added role {} to {}", role, email);
        }
        UsersAction::Unlock { email } => {
            users.unlock(&email).await?;
            println!("Unlocked {}", email);
        }
    }

    Ok(())
}
