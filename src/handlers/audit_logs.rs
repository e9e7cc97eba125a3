use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::audit_log;
use crate::errors::ApiError;
use crate::services::audit::AuditFilter;
use crate::AppState;

use super::common::{validate_input, PaginationParams};

#[derive(Debug, Deserialize)]
struct ListAuditLogsQuery {
    user: Option<String>,
    action: Option<String>,
    object_type: Option<String>,
    /// Inclusive, `YYYY-MM-DD`.
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
struct CreateAuditLogRequest {
    #[validate(length(min = 1, max = 100))]
    action: String,
    #[validate(length(min = 1, max = 100))]
    object_type: String,
    #[serde(default)]
    object_id: String,
    #[serde(default)]
    message: String,
}

async fn list_audit_logs(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<ListAuditLogsQuery>,
) -> Result<Json<Vec<audit_log::Model>>, ApiError> {
    let filter = AuditFilter {
        user: query.user,
        action: query.action,
        object_type: query.object_type,
        start_date: query.start_date,
        end_date: query.end_date,
    };
    let logs = state
        .services
        .audit
        .list(filter, pagination.limit(), pagination.offset())
        .await?;
    Ok(Json(logs))
}

async fn create_audit_log(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateAuditLogRequest>,
) -> Result<(StatusCode, Json<audit_log::Model>), ApiError> {
    validate_input(&payload)?;
    let created = state
        .services
        .audit
        .append(
            Some(user.id),
            Some(user.username),
            payload.action,
            payload.object_type,
            payload.object_id,
            payload.message,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_audit_logs).post(create_audit_log))
}
