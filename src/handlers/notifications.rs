use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::notification::{self, NotificationKind};
use crate::errors::ApiError;
use crate::AppState;

use super::common::{validate_input, PaginationParams};

#[derive(Debug, Deserialize, Validate)]
struct CreateNotificationRequest {
    /// Omit to broadcast to every user.
    user_id: Option<i32>,
    #[validate(length(min = 1))]
    message: String,
    #[serde(rename = "type", default)]
    kind: Option<NotificationKind>,
}

#[derive(Debug, Serialize)]
struct ReadAllResponse {
    updated_count: u64,
}

async fn list_notifications(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<Vec<notification::Model>>, ApiError> {
    let notifications = state
        .services
        .notifications
        .list_for_user(user.id, pagination.limit(), pagination.offset())
        .await?;
    Ok(Json(notifications))
}

async fn create_notification(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<notification::Model>), ApiError> {
    validate_input(&payload)?;
    let created = state
        .services
        .notifications
        .create(
            payload.user_id,
            payload.message,
            payload.kind.unwrap_or(NotificationKind::Info),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn mark_read(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<notification::Model>, ApiError> {
    Ok(Json(state.services.notifications.mark_read(id).await?))
}

async fn mark_all_read(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ReadAllResponse>, ApiError> {
    let updated_count = state.services.notifications.mark_all_read(user.id).await?;
    Ok(Json(ReadAllResponse { updated_count }))
}

async fn delete_notification(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.services.notifications.delete(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications).post(create_notification))
        .route("/:id/read", post(mark_read))
        .route("/read-all", post(mark_all_read))
        .route("/:id", axum::routing::delete(delete_notification))
}
