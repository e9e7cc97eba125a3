use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::purchase_order;
use crate::errors::ApiError;
use crate::export::{csv::write_csv, pdf::write_pdf, TableReport};
use crate::services::purchase_orders::{
    NewOrder, OrderAction, OrderAnalytics, OrderFilter, OrderUpdate,
};
use crate::AppState;

use super::common::{csv_attachment, pdf_attachment, validate_input, PaginationParams};

#[derive(Debug, Deserialize)]
struct ListOrdersQuery {
    supplier: Option<String>,
    item: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
struct CreateOrderRequest {
    #[validate(length(min = 1, max = 255))]
    supplier: String,
    #[validate(length(min = 1, max = 255))]
    item: String,
    quantity: i32,
}

#[derive(Debug, Deserialize)]
struct UpdateOrderRequest {
    supplier: Option<String>,
    item: Option<String>,
    quantity: Option<i32>,
}

/// The action arrives as a free string so an unknown value can be answered
/// with a 400 instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
struct OrderActionRequest {
    action: String,
}

async fn list_orders(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<purchase_order::Model>>, ApiError> {
    let filter = OrderFilter {
        supplier: query.supplier,
        item: query.item,
        status: query.status,
    };
    let orders = state
        .services
        .orders
        .list(filter, pagination.limit(), pagination.offset())
        .await?;
    Ok(Json(orders))
}

async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<purchase_order::Model>), ApiError> {
    validate_input(&payload)?;
    let created = state
        .services
        .orders
        .create(NewOrder {
            supplier: payload.supplier,
            item: payload.item,
            quantity: payload.quantity,
        })
        .await?;
    state
        .services
        .audit
        .record(
            &user,
            "CREATE",
            "PurchaseOrder",
            created.id,
            format!(
                "Ordered {} x '{}' from '{}'",
                created.quantity, created.item, created.supplier
            ),
        )
        .await;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_order(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<purchase_order::Model>, ApiError> {
    let order = state
        .services
        .orders
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;
    Ok(Json(order))
}

async fn update_order(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateOrderRequest>,
) -> Result<Json<purchase_order::Model>, ApiError> {
    let updated = state
        .services
        .orders
        .update(
            id,
            OrderUpdate {
                supplier: payload.supplier,
                item: payload.item,
                quantity: payload.quantity,
            },
        )
        .await?;
    Ok(Json(updated))
}

async fn delete_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.services.orders.delete(id).await?;
    state
        .services
        .audit
        .record(&user, "DELETE", "PurchaseOrder", id, String::new())
        .await;
    Ok(StatusCode::NO_CONTENT)
}

async fn order_action(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<OrderActionRequest>,
) -> Result<Json<purchase_order::Model>, ApiError> {
    let action = OrderAction::parse(&payload.action).ok_or_else(|| {
        ApiError::BadRequest(format!(
            "Invalid action '{}'; expected 'approve' or 'reject'",
            payload.action
        ))
    })?;
    let updated = state.services.orders.apply_action(id, action).await?;
    state
        .services
        .audit
        .record(
            &user,
            "ORDER_ACTION",
            "PurchaseOrder",
            id,
            format!("Order {} {}", id, updated.status.as_str().to_lowercase()),
        )
        .await;
    Ok(Json(updated))
}

fn orders_report(orders: &[purchase_order::Model]) -> TableReport {
    TableReport::new(
        "Purchase Orders Report",
        &["ID", "Supplier", "Item", "Quantity", "Status", "Created At"],
        orders
            .iter()
            .map(|order| {
                vec![
                    order.id.to_string(),
                    order.supplier.clone(),
                    order.item.clone(),
                    order.quantity.to_string(),
                    order.status.as_str().to_string(),
                    order.created_at.to_rfc3339(),
                ]
            })
            .collect(),
    )
}

async fn export_csv(State(state): State<AppState>, _user: AuthUser) -> Result<Response, ApiError> {
    let orders = state.services.orders.export_all().await?;
    let bytes = write_csv(&orders_report(&orders))?;
    Ok(csv_attachment("purchase_orders.csv", bytes))
}

async fn export_pdf(State(state): State<AppState>, _user: AuthUser) -> Result<Response, ApiError> {
    let orders = state.services.orders.export_all().await?;
    let bytes = write_pdf(&orders_report(&orders));
    Ok(pdf_attachment("purchase_orders.pdf", bytes))
}

async fn analytics(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<OrderAnalytics>, ApiError> {
    Ok(Json(state.services.orders.analytics().await?))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route(
            "/:id",
            get(get_order).put(update_order).delete(delete_order),
        )
        .route("/:id/action", post(order_action))
        .route("/export/csv", get(export_csv))
        .route("/export/pdf", get(export_pdf))
        .route("/analytics", get(analytics))
}
