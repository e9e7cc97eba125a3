use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::payment_request::{self, PaymentStatus, PaymentType};
use crate::entities::payment_transaction;
use crate::errors::ApiError;
use crate::services::payments::{
    NewPaymentRequest, PaymentAnalytics, PaymentFilter, StatusUpdate,
};
use crate::AppState;

use super::common::{validate_input, PaginationParams};

const DEFAULT_CURRENCY: &str = "GHS";

#[derive(Debug, Deserialize)]
struct ListPaymentsQuery {
    status: Option<PaymentStatus>,
    payment_type: Option<PaymentType>,
}

#[derive(Debug, Deserialize, Validate)]
struct CreatePaymentRequest {
    payment_type: PaymentType,
    amount: Decimal,
    currency: Option<String>,
    #[serde(default)]
    description: String,
    #[validate(length(min = 7, max = 20))]
    momo_phone: String,
}

impl CreatePaymentRequest {
    fn into_new(self, user_id: i32) -> NewPaymentRequest {
        NewPaymentRequest {
            user_id,
            payment_type: self.payment_type,
            amount: self.amount,
            currency: self
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            description: self.description,
            momo_phone: self.momo_phone,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StatusUpdateRequest {
    status: PaymentStatus,
    transaction_id: Option<String>,
    notes: Option<String>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WebhookRequest {
    reference_id: String,
    transaction_id: Option<String>,
    status: PaymentStatus,
}

#[derive(Debug, Deserialize)]
struct ListTransactionsQuery {
    payment_request: Option<Uuid>,
}

async fn list_requests(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<ListPaymentsQuery>,
) -> Result<Json<Vec<payment_request::Model>>, ApiError> {
    let filter = PaymentFilter {
        status: query.status,
        payment_type: query.payment_type,
    };
    let requests = state
        .services
        .payments
        .list_for_user(user.id, filter, pagination.limit(), pagination.offset())
        .await?;
    Ok(Json(requests))
}

async fn create_request(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<payment_request::Model>), ApiError> {
    validate_input(&payload)?;
    let created = state
        .services
        .payments
        .create_request(payload.into_new(user.id))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<payment_request::Model>, ApiError> {
    let found = state
        .services
        .payments
        .get_for_user(id, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Payment request {id} not found")))?;
    Ok(Json(found))
}

async fn delete_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.services.payments.delete_for_user(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_request_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusUpdateRequest>,
) -> Result<Json<payment_request::Model>, ApiError> {
    let (updated, old_status) = state
        .services
        .payments
        .update_status(
            id,
            user.id,
            StatusUpdate {
                status: payload.status,
                transaction_id: payload.transaction_id,
                notes: payload.notes,
                error_message: payload.error_message,
            },
        )
        .await?;

    if updated.status != old_status {
        state.services.mailer.send_async(
            user.email.clone(),
            format!("Payment {} is now {}", updated.reference_id, updated.status.as_str()),
            format!(
                "Your payment request {} for {} {} changed from {} to {}.",
                updated.reference_id,
                updated.amount,
                updated.currency,
                old_status.as_str(),
                updated.status.as_str()
            ),
        );
        state
            .services
            .audit
            .record(
                &user,
                "PAYMENT_STATUS",
                "PaymentRequest",
                updated.id,
                format!(
                    "Payment {} moved from {} to {}",
                    updated.reference_id,
                    old_status.as_str(),
                    updated.status.as_str()
                ),
            )
            .await;
    }
    Ok(Json(updated))
}

async fn generate_link(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<payment_request::Model>), ApiError> {
    validate_input(&payload)?;
    let created = state
        .services
        .payments
        .generate_link(payload.into_new(user.id))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Gateway callback; deliberately unauthenticated and keyed by the opaque
/// reference id.
async fn webhook(
    State(state): State<AppState>,
    Json(payload): Json<WebhookRequest>,
) -> Result<Json<payment_request::Model>, ApiError> {
    let (updated, old_status) = state
        .services
        .payments
        .apply_webhook(&payload.reference_id, payload.transaction_id, payload.status)
        .await?;

    if updated.status != old_status {
        if let Some(owner) = state.services.users.get(updated.user_id).await? {
            state.services.mailer.send_async(
                owner.email,
                format!("Payment {} is now {}", updated.reference_id, updated.status.as_str()),
                format!(
                    "Your payment request {} for {} {} changed from {} to {}.",
                    updated.reference_id,
                    updated.amount,
                    updated.currency,
                    old_status.as_str(),
                    updated.status.as_str()
                ),
            );
        }
    }
    Ok(Json(updated))
}

async fn list_transactions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<Vec<payment_transaction::Model>>, ApiError> {
    let transactions = state
        .services
        .payments
        .list_transactions(user.id, query.payment_request)
        .await?;
    Ok(Json(transactions))
}

async fn analytics(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<PaymentAnalytics>, ApiError> {
    Ok(Json(state.services.payments.analytics(user.id).await?))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/requests", get(list_requests).post(create_request))
        .route(
            "/requests/:id",
            get(get_request).delete(delete_request),
        )
        .route("/requests/:id/status", post(update_request_status))
        .route("/generate-link", post(generate_link))
        .route("/webhook", post(webhook))
        .route("/transactions", get(list_transactions))
        .route("/analytics", get(analytics))
}
