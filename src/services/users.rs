use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::auth::AuthService;
use crate::entities::user::{self, Entity as User, UserRole};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
}

/// Admin-facing account management. Creation goes through the auth
/// service so password hashing stays in one place.
#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
    auth: Arc<AuthService>,
}

impl UserService {
    pub fn new(db: Arc<DatabaseConnection>, auth: Arc<AuthService>) -> Self {
        Self { db, auth }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, limit: u64, offset: u64) -> Result<Vec<user::Model>, ServiceError> {
        Ok(User::find()
            .order_by_desc(user::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await?)
    }

    pub async fn get(&self, id: i32) -> Result<Option<user::Model>, ServiceError> {
        Ok(User::find_by_id(id).one(self.db.as_ref()).await?)
    }

    #[instrument(skip(self, password))]
    pub async fn create(
        &self,
        username: String,
        email: String,
        password: String,
        role: UserRole,
    ) -> Result<user::Model, ServiceError> {
        self.auth
            .register(username, email, password, Some(role))
            .await
            .map_err(|e| match e {
                crate::auth::AuthError::AlreadyRegistered => {
                    ServiceError::Conflict("Username or email already taken".into())
                }
                other => ServiceError::InternalError(other.to_string()),
            })
    }

    #[instrument(skip(self, update))]
    pub async fn update(&self, id: i32, update: UserUpdate) -> Result<user::Model, ServiceError> {
        let existing = self
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {id} not found")))?;

        let mut model: user::ActiveModel = existing.into();
        if let Some(username) = update.username {
            model.username = Set(username);
        }
        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(role) = update.role {
            model.role = Set(role);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        if let Some(password) = update.password {
            let hash = self
                .auth
                .hash_password(&password)
                .map_err(|e| ServiceError::InternalError(e.to_string()))?;
            model.password_hash = Set(hash);
        }
        let updated = model.update(self.db.as_ref()).await?;
        info!(user_id = id, "user updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let res = User::delete_by_id(id).exec(self.db.as_ref()).await?;
        if res.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("User {id} not found")));
        }
        Ok(())
    }
}
