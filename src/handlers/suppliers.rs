use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::AuthUser;
use crate::entities::supplier;
use crate::errors::ApiError;
use crate::export::{csv::write_csv, pdf::write_pdf, TableReport};
use crate::services::suppliers::{NewSupplier, SupplierAnalytics, SupplierFilter, SupplierUpdate};
use crate::AppState;

use super::common::{csv_attachment, pdf_attachment, validate_input, PaginationParams};

#[derive(Debug, Deserialize)]
struct ListSuppliersQuery {
    name: Option<String>,
    contact_name: Option<String>,
    contact_email: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 255))]
    name: String,
    #[serde(default)]
    contact_name: String,
    #[serde(default)]
    contact_email: String,
    #[serde(default)]
    contact_phone: String,
    #[serde(default)]
    address: String,
}

#[derive(Debug, Deserialize)]
struct UpdateSupplierRequest {
    name: Option<String>,
    contact_name: Option<String>,
    contact_email: Option<String>,
    contact_phone: Option<String>,
    address: Option<String>,
}

async fn list_suppliers(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pagination): Query<PaginationParams>,
    Query(query): Query<ListSuppliersQuery>,
) -> Result<Json<Vec<supplier::Model>>, ApiError> {
    let filter = SupplierFilter {
        name: query.name,
        contact_name: query.contact_name,
        contact_email: query.contact_email,
    };
    let suppliers = state
        .services
        .suppliers
        .list(filter, pagination.limit(), pagination.offset())
        .await?;
    Ok(Json(suppliers))
}

async fn create_supplier(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateSupplierRequest>,
) -> Result<(StatusCode, Json<supplier::Model>), ApiError> {
    validate_input(&payload)?;
    let created = state
        .services
        .suppliers
        .create(NewSupplier {
            name: payload.name,
            contact_name: payload.contact_name,
            contact_email: payload.contact_email,
            contact_phone: payload.contact_phone,
            address: payload.address,
        })
        .await?;
    state
        .services
        .audit
        .record(
            &user,
            "CREATE",
            "Supplier",
            created.id,
            format!("Created supplier '{}'", created.name),
        )
        .await;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_supplier(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<supplier::Model>, ApiError> {
    let found = state
        .services
        .suppliers
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Supplier {id} not found")))?;
    Ok(Json(found))
}

async fn update_supplier(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateSupplierRequest>,
) -> Result<Json<supplier::Model>, ApiError> {
    let updated = state
        .services
        .suppliers
        .update(
            id,
            SupplierUpdate {
                name: payload.name,
                contact_name: payload.contact_name,
                contact_email: payload.contact_email,
                contact_phone: payload.contact_phone,
                address: payload.address,
            },
        )
        .await?;
    Ok(Json(updated))
}

async fn delete_supplier(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.services.suppliers.delete(id).await?;
    state
        .services
        .audit
        .record(&user, "DELETE", "Supplier", id, String::new())
        .await;
    Ok(StatusCode::NO_CONTENT)
}

fn suppliers_report(suppliers: &[supplier::Model]) -> TableReport {
    TableReport::new(
        "Suppliers Report",
        &["ID", "Name", "Contact", "Email", "Phone", "Address"],
        suppliers
            .iter()
            .map(|s| {
                vec![
                    s.id.to_string(),
                    s.name.clone(),
                    s.contact_name.clone(),
                    s.contact_email.clone(),
                    s.contact_phone.clone(),
                    s.address.clone(),
                ]
            })
            .collect(),
    )
}

async fn export_csv(State(state): State<AppState>, _user: AuthUser) -> Result<Response, ApiError> {
    let suppliers = state.services.suppliers.export_all().await?;
    let bytes = write_csv(&suppliers_report(&suppliers))?;
    Ok(csv_attachment("suppliers.csv", bytes))
}

async fn export_pdf(State(state): State<AppState>, _user: AuthUser) -> Result<Response, ApiError> {
    let suppliers = state.services.suppliers.export_all().await?;
    let bytes = write_pdf(&suppliers_report(&suppliers));
    Ok(pdf_attachment("suppliers.pdf", bytes))
}

async fn analytics(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<SupplierAnalytics>, ApiError> {
    Ok(Json(state.services.suppliers.analytics().await?))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route(
            "/:id",
            get(get_supplier).put(update_supplier).delete(delete_supplier),
        )
        .route("/export/csv", get(export_csv))
        .route("/export/pdf", get(export_pdf))
        .route("/analytics", get(analytics))
}
