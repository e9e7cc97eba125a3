use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::warn;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::{inventory_item, notification::NotificationKind};
use crate::errors::ApiError;
use crate::export::{csv::write_csv, pdf::write_pdf, TableReport};
use crate::services::inventory::{
    ImportRow, ImportSummary, InventoryMetrics, ItemFilter, ItemUpdate, NewItem,
};
use crate::AppState;

use super::common::{csv_attachment, pdf_attachment, validate_input, PaginationParams};

#[derive(Debug, Deserialize)]
struct ListItemsQuery {
    name: Option<String>,
    sku: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
struct CreateItemRequest {
    #[validate(length(min = 1, max = 255))]
    name: String,
    #[validate(length(min = 1, max = 64))]
    sku: String,
    #[serde(default)]
    quantity: i32,
    #[serde(default)]
    reorder_level: i32,
}

#[derive(Debug, Deserialize)]
struct UpdateItemRequest {
    name: Option<String>,
    sku: Option<String>,
    quantity: Option<i32>,
    reorder_level: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct StockMovementRequest {
    amount: i32,
}

async fn list_items(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<Vec<inventory_item::Model>>, ApiError> {
    let filter = ItemFilter {
        name: query.name,
        sku: query.sku,
    };
    let items = state
        .services
        .inventory
        .list(filter, pagination.limit(), pagination.offset())
        .await?;
    Ok(Json(items))
}

async fn create_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<inventory_item::Model>), ApiError> {
    validate_input(&payload)?;
    let created = state
        .services
        .inventory
        .create(NewItem {
            name: payload.name,
            sku: payload.sku,
            quantity: payload.quantity,
            reorder_level: payload.reorder_level,
        })
        .await?;
    state
        .services
        .audit
        .record(
            &user,
            "CREATE",
            "InventoryItem",
            created.id,
            format!("Created item '{}' (SKU {})", created.name, created.sku),
        )
        .await;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_item(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<inventory_item::Model>, ApiError> {
    let item = state
        .services
        .inventory
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Inventory item {id} not found")))?;
    Ok(Json(item))
}

async fn update_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<Json<inventory_item::Model>, ApiError> {
    let updated = state
        .services
        .inventory
        .update(
            id,
            ItemUpdate {
                name: payload.name,
                sku: payload.sku,
                quantity: payload.quantity,
                reorder_level: payload.reorder_level,
            },
        )
        .await?;
    state
        .services
        .audit
        .record(
            &user,
            "UPDATE",
            "InventoryItem",
            id,
            format!("Updated item '{}'", updated.name),
        )
        .await;
    Ok(Json(updated))
}

async fn delete_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.services.inventory.delete(id).await?;
    state
        .services
        .audit
        .record(&user, "DELETE", "InventoryItem", id, String::new())
        .await;
    Ok(StatusCode::NO_CONTENT)
}

async fn stock_in(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<StockMovementRequest>,
) -> Result<Json<inventory_item::Model>, ApiError> {
    let item = state
        .services
        .inventory
        .stock_in(id, payload.amount)
        .await?;
    state
        .services
        .audit
        .record(
            &user,
            "STOCK_IN",
            "InventoryItem",
            id,
            format!(
                "Stocked in {} of '{}', now {}",
                payload.amount, item.name, item.quantity
            ),
        )
        .await;
    Ok(Json(item))
}

async fn stock_out(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<StockMovementRequest>,
) -> Result<Json<inventory_item::Model>, ApiError> {
    let item = state
        .services
        .inventory
        .stock_out(id, payload.amount)
        .await?;

    // Stock-outs that land an item at or below its reorder level raise a
    // broadcast warning for every user.
    if item.is_low_stock() {
        let message = format!(
            "Low stock: '{}' is down to {} (reorder level {})",
            item.name, item.quantity, item.reorder_level
        );
        if let Err(err) = state
            .services
            .notifications
            .create(None, message, NotificationKind::Warning)
            .await
        {
            warn!(item_id = id, error = %err, "failed to create low-stock notification");
        }
    }

    state
        .services
        .audit
        .record(
            &user,
            "STOCK_OUT",
            "InventoryItem",
            id,
            format!(
                "Stocked out {} of '{}', now {}",
                payload.amount, item.name, item.quantity
            ),
        )
        .await;
    Ok(Json(item))
}

fn items_report(items: &[inventory_item::Model]) -> TableReport {
    TableReport::new(
        "Inventory Report",
        &["ID", "Name", "SKU", "Quantity", "Reorder Level", "Created At"],
        items
            .iter()
            .map(|item| {
                vec![
                    item.id.to_string(),
                    item.name.clone(),
                    item.sku.clone(),
                    item.quantity.to_string(),
                    item.reorder_level.to_string(),
                    item.created_at.to_rfc3339(),
                ]
            })
            .collect(),
    )
}

async fn export_csv(State(state): State<AppState>, _user: AuthUser) -> Result<Response, ApiError> {
    let items = state.services.inventory.export_all().await?;
    let bytes = write_csv(&items_report(&items))?;
    Ok(csv_attachment("inventory.csv", bytes))
}

async fn export_pdf(State(state): State<AppState>, _user: AuthUser) -> Result<Response, ApiError> {
    let items = state.services.inventory.export_all().await?;
    let bytes = write_pdf(&items_report(&items));
    Ok(pdf_attachment("inventory.pdf", bytes))
}

async fn import_csv(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ImportSummary>, ApiError> {
    let mut data: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        let is_file = field.name() == Some("file");
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;
        if is_file || data.is_none() {
            data = Some(bytes.to_vec());
        }
    }
    let data = data.ok_or_else(|| ApiError::BadRequest("no file uploaded".into()))?;

    let mut rows = Vec::new();
    let mut reader = csv::Reader::from_reader(data.as_slice());
    for row in reader.deserialize::<ImportRow>() {
        rows.push(row.map_err(|e| ApiError::BadRequest(format!("invalid CSV row: {e}")))?);
    }

    let summary = state.services.inventory.import_rows(rows).await?;
    state
        .services
        .audit
        .record(
            &user,
            "IMPORT",
            "InventoryItem",
            "csv",
            format!(
                "Imported inventory: {} created, {} updated",
                summary.created, summary.updated
            ),
        )
        .await;
    Ok(Json(summary))
}

async fn metrics(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<InventoryMetrics>, ApiError> {
    Ok(Json(state.services.inventory.metrics().await?))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/:id",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/items/:id/stock-in", post(stock_in))
        .route("/items/:id/stock-out", post(stock_out))
        .route("/items/export/csv", get(export_csv))
        .route("/items/export/pdf", get(export_pdf))
        .route("/items/import/csv", post(import_csv))
        .route("/metrics", get(metrics))
}
