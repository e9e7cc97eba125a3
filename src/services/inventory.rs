use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::entities::inventory_item::{self, Entity as InventoryItem};
use crate::errors::ServiceError;

/// Dashboard metrics. `low_stock` is computed relationally at query time
/// (quantity <= reorder_level), never stored, so it always reflects the
/// latest quantities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventoryMetrics {
    pub total_items: u64,
    pub low_stock: u64,
}

/// Outcome of a CSV import: rows with a known SKU overwrite the stored
/// fields, unknown SKUs create new items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: u64,
    pub updated: u64,
}

/// One row of a CSV import file.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportRow {
    pub sku: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub reorder_level: i32,
}

#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub name: Option<String>,
    pub sku: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub sku: String,
    pub quantity: i32,
    pub reorder_level: i32,
}

#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub quantity: Option<i32>,
    pub reorder_level: Option<i32>,
}

/// Service owning the stock ledger rule: quantity never goes negative, and
/// every quantity change is a single atomic UPDATE rather than a
/// read-check-write sequence.
#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DatabaseConnection>,
}

impl InventoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: ItemFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<inventory_item::Model>, ServiceError> {
        let mut query = InventoryItem::find().order_by_desc(inventory_item::Column::CreatedAt);
        if let Some(name) = filter.name.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(inventory_item::Column::Name.contains(name));
        }
        if let Some(sku) = filter.sku.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(inventory_item::Column::Sku.contains(sku));
        }
        let items = query
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await?;
        Ok(items)
    }

    pub async fn get(&self, id: i32) -> Result<Option<inventory_item::Model>, ServiceError> {
        Ok(InventoryItem::find_by_id(id).one(self.db.as_ref()).await?)
    }

    async fn get_required(&self, id: i32) -> Result<inventory_item::Model, ServiceError> {
        self.get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Inventory item {id} not found")))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, item: NewItem) -> Result<inventory_item::Model, ServiceError> {
        if item.quantity < 0 || item.reorder_level < 0 {
            return Err(ServiceError::ValidationError(
                "quantity and reorder_level must be non-negative".into(),
            ));
        }
        let exists = InventoryItem::find()
            .filter(inventory_item::Column::Sku.eq(item.sku.as_str()))
            .one(self.db.as_ref())
            .await?;
        if exists.is_some() {
            return Err(ServiceError::Conflict(format!(
                "SKU '{}' already exists",
                item.sku
            )));
        }

        let now = Utc::now();
        let model = inventory_item::ActiveModel {
            name: Set(item.name),
            sku: Set(item.sku),
            quantity: Set(item.quantity),
            reorder_level: Set(item.reorder_level),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = model.insert(self.db.as_ref()).await?;
        info!(item_id = created.id, sku = %created.sku, "inventory item created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: i32,
        update: ItemUpdate,
    ) -> Result<inventory_item::Model, ServiceError> {
        let existing = self.get_required(id).await?;

        if let Some(q) = update.quantity {
            if q < 0 {
                return Err(ServiceError::ValidationError(
                    "quantity must be non-negative".into(),
                ));
            }
        }
        if let Some(r) = update.reorder_level {
            if r < 0 {
                return Err(ServiceError::ValidationError(
                    "reorder_level must be non-negative".into(),
                ));
            }
        }
        if let Some(sku) = update.sku.as_deref() {
            if sku != existing.sku {
                let taken = InventoryItem::find()
                    .filter(inventory_item::Column::Sku.eq(sku))
                    .one(self.db.as_ref())
                    .await?;
                if taken.is_some() {
                    return Err(ServiceError::Conflict(format!("SKU '{sku}' already exists")));
                }
            }
        }

        let mut model: inventory_item::ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(sku) = update.sku {
            model.sku = Set(sku);
        }
        if let Some(quantity) = update.quantity {
            model.quantity = Set(quantity);
        }
        if let Some(reorder_level) = update.reorder_level {
            model.reorder_level = Set(reorder_level);
        }
        model.updated_at = Set(Utc::now());
        Ok(model.update(self.db.as_ref()).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let res = InventoryItem::delete_by_id(id).exec(self.db.as_ref()).await?;
        if res.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Inventory item {id} not found"
            )));
        }
        Ok(())
    }

    /// Stock-in: unconditional atomic increment. No upper bound.
    #[instrument(skip(self))]
    pub async fn stock_in(
        &self,
        id: i32,
        amount: i32,
    ) -> Result<inventory_item::Model, ServiceError> {
        if amount < 0 {
            return Err(ServiceError::ValidationError(
                "amount must be non-negative".into(),
            ));
        }

        let res = InventoryItem::update_many()
            .col_expr(
                inventory_item::Column::Quantity,
                Expr::col(inventory_item::Column::Quantity).add(amount),
            )
            .col_expr(inventory_item::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(inventory_item::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        if res.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Inventory item {id} not found"
            )));
        }
        let item = self.get_required(id).await?;
        info!(item_id = id, amount, new_quantity = item.quantity, "stock in");
        Ok(item)
    }

    /// Stock-out: a single conditional UPDATE (`quantity = quantity - ?`
    /// guarded by `quantity >= ?`), so concurrent calls cannot both pass a
    /// stale check and drive the quantity negative.
    #[instrument(skip(self))]
    pub async fn stock_out(
        &self,
        id: i32,
        amount: i32,
    ) -> Result<inventory_item::Model, ServiceError> {
        if amount < 0 {
            return Err(ServiceError::ValidationError(
                "amount must be non-negative".into(),
            ));
        }

        let res = InventoryItem::update_many()
            .col_expr(
                inventory_item::Column::Quantity,
                Expr::col(inventory_item::Column::Quantity).sub(amount),
            )
            .col_expr(inventory_item::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(inventory_item::Column::Id.eq(id))
            .filter(inventory_item::Column::Quantity.gte(amount))
            .exec(self.db.as_ref())
            .await?;

        if res.rows_affected == 0 {
            // Zero rows means either the item is absent or the guard failed.
            let item = self.get_required(id).await?;
            return Err(ServiceError::InsufficientStock(format!(
                "Not enough stock: {} on hand, {} requested",
                item.quantity, amount
            )));
        }
        let item = self.get_required(id).await?;
        info!(item_id = id, amount, new_quantity = item.quantity, "stock out");
        Ok(item)
    }

    /// Total and low-stock counts, recomputed per call with a relational
    /// column comparison.
    #[instrument(skip(self))]
    pub async fn metrics(&self) -> Result<InventoryMetrics, ServiceError> {
        let total_items = InventoryItem::find().count(self.db.as_ref()).await?;
        let low_stock = InventoryItem::find()
            .filter(
                Expr::col(inventory_item::Column::Quantity)
                    .lte(Expr::col(inventory_item::Column::ReorderLevel)),
            )
            .count(self.db.as_ref())
            .await?;
        Ok(InventoryMetrics {
            total_items,
            low_stock,
        })
    }

    /// All items for export, ordered by name.
    pub async fn export_all(&self) -> Result<Vec<inventory_item::Model>, ServiceError> {
        Ok(InventoryItem::find()
            .order_by_asc(inventory_item::Column::Name)
            .all(self.db.as_ref())
            .await?)
    }

    /// Upsert-by-SKU import. A known SKU overwrites name, quantity and
    /// reorder_level in place; an unknown SKU creates exactly one new item.
    #[instrument(skip(self, rows))]
    pub async fn import_rows(&self, rows: Vec<ImportRow>) -> Result<ImportSummary, ServiceError> {
        let mut summary = ImportSummary {
            created: 0,
            updated: 0,
        };

        for row in rows {
            if row.sku.trim().is_empty() {
                return Err(ServiceError::ValidationError(
                    "import row is missing a SKU".into(),
                ));
            }
            if row.quantity < 0 || row.reorder_level < 0 {
                return Err(ServiceError::ValidationError(format!(
                    "import row for SKU '{}' has a negative quantity or reorder level",
                    row.sku
                )));
            }

            let existing = InventoryItem::find()
                .filter(inventory_item::Column::Sku.eq(row.sku.as_str()))
                .one(self.db.as_ref())
                .await?;

            match existing {
                Some(item) => {
                    let mut model: inventory_item::ActiveModel = item.into();
                    model.name = Set(row.name);
                    model.quantity = Set(row.quantity);
                    model.reorder_level = Set(row.reorder_level);
                    model.updated_at = Set(Utc::now());
                    model.update(self.db.as_ref()).await?;
                    summary.updated += 1;
                }
                None => {
                    let now = Utc::now();
                    let model = inventory_item::ActiveModel {
                        name: Set(row.name),
                        sku: Set(row.sku),
                        quantity: Set(row.quantity),
                        reorder_level: Set(row.reorder_level),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    };
                    model.insert(self.db.as_ref()).await?;
                    summary.created += 1;
                }
            }
        }

        info!(
            created = summary.created,
            updated = summary.updated,
            "inventory import complete"
        );
        Ok(summary)
    }
}
