use crate::{
    auth::AuthService,
    entities::{user, UserRole},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Input for creating a user account
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub created_by: Option<Uuid>,
}

/// Input for updating a user account. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

/// Filters for listing users
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    pub active: Option<bool>,
}

/// Service for managing user accounts and credential checks
#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
    auth: Arc<AuthService>,
}

impl UserService {
    /// Creates a new user service instance
    pub fn new(db: Arc<DatabaseConnection>, auth: Arc<AuthService>) -> Self {
        Self { db, auth }
    }

    /// Verifies login credentials. Unknown email, inactive account, and a
    /// wrong password all answer the same way so the response does not leak
    /// which part failed.
    #[instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<user::Model, ServiceError> {
        let user = user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::AuthError("Invalid credentials".to_string()))?;

        if !user.is_active {
            return Err(ServiceError::AuthError("Invalid credentials".to_string()));
        }

        if !self.auth.verify_password(password, &user.password_hash)? {
            return Err(ServiceError::AuthError("Invalid credentials".to_string()));
        }

        Ok(user)
    }

    /// Creates a new user account
    #[instrument(skip(self, input))]
    pub async fn create_user(&self, input: CreateUserInput) -> Result<user::Model, ServiceError> {
        let email = input.email.trim().to_lowercase();

        let existing = user::Entity::find()
            .filter(user::Column::Email.eq(&email))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(
                "A user with that email already exists".to_string(),
            ));
        }

        let password_hash = self.auth.hash_password(&input.password)?;

        let user = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            email: Set(email),
            password_hash: Set(password_hash),
            role: Set(input.role),
            is_active: NotSet,
            created_by: Set(input.created_by),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let user = user.insert(&*self.db).await?;
        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    /// Gets a user by ID
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Uuid) -> Result<user::Model, ServiceError> {
        user::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    /// Gets a user by email, if present
    #[instrument(skip(self))]
    pub async fn get_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<user::Model>, ServiceError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Lists users, newest first
    #[instrument(skip(self))]
    pub async fn list_users(
        &self,
        filter: UserFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<user::Model>, u64), ServiceError> {
        let mut query = user::Entity::find();

        if let Some(role) = filter.role {
            query = query.filter(user::Column::Role.eq(role));
        }
        if let Some(active) = filter.active {
            query = query.filter(user::Column::IsActive.eq(active));
        }

        let paginator = query
            .order_by_desc(user::Column::CreatedAt)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await?;
        let users = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((users, total))
    }

    /// Refuses changes that would leave the system without any active admin.
    async fn ensure_not_last_admin(&self, user: &user::Model) -> Result<(), ServiceError> {
        if user.role != UserRole::Admin || !user.is_active {
            return Ok(());
        }

        let other_admins = user::Entity::find()
            .filter(user::Column::Role.eq(UserRole::Admin))
            .filter(user::Column::IsActive.eq(true))
            .filter(user::Column::Id.ne(user.id))
            .count(&*self.db)
            .await?;

        if other_admins == 0 {
            return Err(ServiceError::Conflict(
                "Cannot remove the last active admin account".to_string(),
            ));
        }

        Ok(())
    }

    /// Updates a user account. Changing the password re-hashes it.
    #[instrument(skip(self, input))]
    pub async fn update_user(
        &self,
        user_id: Uuid,
        input: UpdateUserInput,
    ) -> Result<user::Model, ServiceError> {
        let user = self.get_user(user_id).await?;

        let demotes = matches!(input.role, Some(role) if role != UserRole::Admin);
        if demotes || input.is_active == Some(false) {
            self.ensure_not_last_admin(&user).await?;
        }

        // Stored emails are always lowercase, the login lookup depends on it
        let email = input.email.map(|e| e.trim().to_lowercase());
        if let Some(email) = &email {
            if *email != user.email {
                let taken = user::Entity::find()
                    .filter(user::Column::Email.eq(email))
                    .filter(user::Column::Id.ne(user_id))
                    .one(&*self.db)
                    .await?;
                if taken.is_some() {
                    return Err(ServiceError::Conflict(
                        "A user with that email already exists".to_string(),
                    ));
                }
            }
        }

        let mut user: user::ActiveModel = user.into();

        if let Some(name) = input.name {
            user.name = Set(name);
        }
        if let Some(email) = email {
            user.email = Set(email);
        }
        if let Some(password) = input.password {
            user.password_hash = Set(self.auth.hash_password(&password)?);
        }
        if let Some(role) = input.role {
            user.role = Set(role);
        }
        if let Some(is_active) = input.is_active {
            user.is_active = Set(is_active);
        }
        user.updated_at = Set(Utc::now());

        let user = user.update(&*self.db).await?;
        info!(user_id = %user.id, "user updated");
        Ok(user)
    }

    /// Flips the active flag without touching anything else
    #[instrument(skip(self))]
    pub async fn set_active(
        &self,
        user_id: Uuid,
        active: bool,
    ) -> Result<user::Model, ServiceError> {
        let user = self.get_user(user_id).await?;

        if !active {
            self.ensure_not_last_admin(&user).await?;
        }

        let mut user: user::ActiveModel = user.into();
        user.is_active = Set(active);
        user.updated_at = Set(Utc::now());

        let user = user.update(&*self.db).await?;
        info!(user_id = %user.id, active, "user active flag changed");
        Ok(user)
    }

    /// Deletes a user account
    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), ServiceError> {
        let user = self.get_user(user_id).await?;
        self.ensure_not_last_admin(&user).await?;

        user::Entity::delete_by_id(user_id).exec(&*self.db).await?;
        info!(%user_id, "user deleted");
        Ok(())
    }
}
