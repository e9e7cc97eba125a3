use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::entities::purchase_order::{self, Entity as PurchaseOrder, OrderStatus};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub supplier: Option<String>,
    pub item: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub supplier: String,
    pub item: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub supplier: Option<String>,
    pub item: Option<String>,
    pub quantity: Option<i32>,
}

/// The only way an order changes status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Approve,
    Reject,
}

impl OrderAction {
    /// Case-sensitive, exactly "approve" or "reject"; anything else is a
    /// client error and the order stays untouched.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "approve" => Some(OrderAction::Approve),
            "reject" => Some(OrderAction::Reject),
            _ => None,
        }
    }

    fn target_status(self) -> OrderStatus {
        match self {
            OrderAction::Approve => OrderStatus::Approved,
            OrderAction::Reject => OrderStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromQueryResult)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAnalytics {
    pub status_distribution: Vec<StatusCount>,
}

#[derive(Clone)]
pub struct PurchaseOrderService {
    db: Arc<DatabaseConnection>,
}

impl PurchaseOrderService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: OrderFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<purchase_order::Model>, ServiceError> {
        let mut query = PurchaseOrder::find().order_by_desc(purchase_order::Column::CreatedAt);
        if let Some(supplier) = filter.supplier.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(purchase_order::Column::Supplier.contains(supplier));
        }
        if let Some(item) = filter.item.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(purchase_order::Column::Item.contains(item));
        }
        if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
            // Status filtering is case-insensitive; an unknown value simply
            // matches nothing rather than erroring.
            query = query.filter(purchase_order::Column::Status.eq(status.to_uppercase()));
        }
        Ok(query
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await?)
    }

    pub async fn get(&self, id: i32) -> Result<Option<purchase_order::Model>, ServiceError> {
        Ok(PurchaseOrder::find_by_id(id).one(self.db.as_ref()).await?)
    }

    #[instrument(skip(self))]
    pub async fn create(&self, new: NewOrder) -> Result<purchase_order::Model, ServiceError> {
        if new.quantity < 1 {
            return Err(ServiceError::ValidationError(
                "quantity must be at least 1".into(),
            ));
        }
        let now = Utc::now();
        let model = purchase_order::ActiveModel {
            supplier: Set(new.supplier),
            item: Set(new.item),
            quantity: Set(new.quantity),
            status: Set(OrderStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = model.insert(self.db.as_ref()).await?;
        info!(order_id = created.id, "purchase order created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: i32,
        update: OrderUpdate,
    ) -> Result<purchase_order::Model, ServiceError> {
        let existing = self
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {id} not found")))?;

        if let Some(q) = update.quantity {
            if q < 1 {
                return Err(ServiceError::ValidationError(
                    "quantity must be at least 1".into(),
                ));
            }
        }

        let mut model: purchase_order::ActiveModel = existing.into();
        if let Some(supplier) = update.supplier {
            model.supplier = Set(supplier);
        }
        if let Some(item) = update.item {
            model.item = Set(item);
        }
        if let Some(quantity) = update.quantity {
            model.quantity = Set(quantity);
        }
        model.updated_at = Set(Utc::now());
        Ok(model.update(self.db.as_ref()).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let res = PurchaseOrder::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        if res.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Order {id} not found")));
        }
        Ok(())
    }

    /// Apply an approve/reject action. This is the only code path that
    /// writes the status column.
    #[instrument(skip(self))]
    pub async fn apply_action(
        &self,
        id: i32,
        action: OrderAction,
    ) -> Result<purchase_order::Model, ServiceError> {
        let existing = self
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {id} not found")))?;

        let mut model: purchase_order::ActiveModel = existing.into();
        model.status = Set(action.target_status());
        model.updated_at = Set(Utc::now());
        let updated = model.update(self.db.as_ref()).await?;
        info!(order_id = id, status = updated.status.as_str(), "order action applied");
        Ok(updated)
    }

    /// All orders for export, newest first.
    pub async fn export_all(&self) -> Result<Vec<purchase_order::Model>, ServiceError> {
        Ok(PurchaseOrder::find()
            .order_by_desc(purchase_order::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?)
    }

    /// Count of orders per status.
    #[instrument(skip(self))]
    pub async fn analytics(&self) -> Result<OrderAnalytics, ServiceError> {
        let status_distribution = PurchaseOrder::find()
            .select_only()
            .column(purchase_order::Column::Status)
            .column_as(purchase_order::Column::Id.count(), "count")
            .group_by(purchase_order::Column::Status)
            .order_by_asc(purchase_order::Column::Status)
            .into_model::<StatusCount>()
            .all(self.db.as_ref())
            .await?;
        Ok(OrderAnalytics {
            status_distribution,
        })
    }
}
