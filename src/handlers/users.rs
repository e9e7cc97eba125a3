use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::RequireAdmin;
use crate::entities::user::{self, UserRole};
use crate::errors::ApiError;
use crate::services::users::UserUpdate;
use crate::AppState;

use super::common::{validate_input, PaginationParams};

#[derive(Debug, Deserialize, Validate)]
struct CreateUserRequest {
    #[validate(length(min = 3, max = 150))]
    username: String,
    #[validate(email)]
    email: String,
    #[validate(length(min = 8))]
    password: String,
    role: Option<UserRole>,
}

#[derive(Debug, Deserialize)]
struct UpdateUserRequest {
    username: Option<String>,
    email: Option<String>,
    role: Option<UserRole>,
    is_active: Option<bool>,
    password: Option<String>,
}

async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<Vec<user::Model>>, ApiError> {
    let users = state
        .services
        .users
        .list(pagination.limit(), pagination.offset())
        .await?;
    Ok(Json(users))
}

async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<user::Model>), ApiError> {
    validate_input(&payload)?;
    let created = state
        .services
        .users
        .create(
            payload.username,
            payload.email,
            payload.password,
            payload.role.unwrap_or(UserRole::Staff),
        )
        .await?;
    state
        .services
        .audit
        .record(
            &admin,
            "CREATE",
            "User",
            created.id,
            format!("Created account '{}'", created.username),
        )
        .await;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<user::Model>, ApiError> {
    let found = state
        .services
        .users
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {id} not found")))?;
    Ok(Json(found))
}

async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<user::Model>, ApiError> {
    if let Some(password) = payload.password.as_deref() {
        if password.len() < 8 {
            return Err(ApiError::ValidationError(
                "password must be at least 8 characters".into(),
            ));
        }
    }
    let updated = state
        .services
        .users
        .update(
            id,
            UserUpdate {
                username: payload.username,
                email: payload.email,
                role: payload.role,
                is_active: payload.is_active,
                password: payload.password,
            },
        )
        .await?;
    state
        .services
        .audit
        .record(
            &admin,
            "UPDATE",
            "User",
            id,
            format!("Updated account '{}'", updated.username),
        )
        .await;
    Ok(Json(updated))
}

async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.services.users.delete(id).await?;
    state
        .services
        .audit
        .record(&admin, "DELETE", "User", id, String::new())
        .await;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}
