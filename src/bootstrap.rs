//! First-boot provisioning.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::entities::user::UserRole;
use crate::errors::ServiceError;
use crate::services::users::{CreateUserInput, UserService};

/// Makes sure the configured administrator account exists.
///
/// Runs on every boot and is idempotent: an existing account is left
/// untouched, in particular its password is never reset. When no account
/// exists and no admin password is configured, provisioning is skipped
/// with a warning instead of falling back to a default credential.
pub async fn ensure_admin(
    db: Arc<DatabaseConnection>,
    auth: Arc<AuthService>,
    config: &AppConfig,
) -> Result<(), ServiceError> {
    let users = UserService::new(db, auth);

    if users
        .get_user_by_email(&config.admin_email)
        .await?
        .is_some()
    {
        info!(email = %config.admin_email, "admin account already present");
        return Ok(());
    }

    let Some(password) = config.admin_password.as_deref() else {
        warn!(
            email = %config.admin_email,
            "no admin account exists and no admin password is configured; \
             set APP__ADMIN_PASSWORD to provision one"
        );
        return Ok(());
    };

    let admin = users
        .create_user(CreateUserInput {
            name: config.admin_name.clone(),
            email: config.admin_email.clone(),
            password: password.to_string(),
            role: UserRole::Admin,
            created_by: None,
        })
        .await?;
    info!(user_id = %admin.id, email = %admin.email, "admin account provisioned");

    Ok(())
}
