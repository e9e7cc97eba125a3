use chrono::Utc;
use sea_orm::sea_query::{Alias, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::entities::{
    purchase_order,
    supplier::{self, Entity as Supplier},
};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Default)]
pub struct SupplierFilter {
    pub name: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewSupplier {
    pub name: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Default)]
pub struct SupplierUpdate {
    pub name: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
}

/// Orders grouped per supplier name, largest first.
#[derive(Debug, Clone, Serialize, Deserialize, FromQueryResult)]
pub struct SupplierOrderCount {
    pub supplier: String,
    pub order_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierAnalytics {
    pub total_suppliers: u64,
    pub top_suppliers: Vec<SupplierOrderCount>,
}

#[derive(Clone)]
pub struct SupplierService {
    db: Arc<DatabaseConnection>,
}

impl SupplierService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: SupplierFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<supplier::Model>, ServiceError> {
        let mut query = Supplier::find().order_by_desc(supplier::Column::CreatedAt);
        if let Some(name) = filter.name.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(supplier::Column::Name.contains(name));
        }
        if let Some(contact) = filter.contact_name.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(supplier::Column::ContactName.contains(contact));
        }
        if let Some(email) = filter.contact_email.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(supplier::Column::ContactEmail.contains(email));
        }
        Ok(query
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await?)
    }

    pub async fn get(&self, id: i32) -> Result<Option<supplier::Model>, ServiceError> {
        Ok(Supplier::find_by_id(id).one(self.db.as_ref()).await?)
    }

    #[instrument(skip(self))]
    pub async fn create(&self, new: NewSupplier) -> Result<supplier::Model, ServiceError> {
        let now = Utc::now();
        let model = supplier::ActiveModel {
            name: Set(new.name),
            contact_name: Set(new.contact_name),
            contact_email: Set(new.contact_email),
            contact_phone: Set(new.contact_phone),
            address: Set(new.address),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = model.insert(self.db.as_ref()).await?;
        info!(supplier_id = created.id, name = %created.name, "supplier created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: i32,
        update: SupplierUpdate,
    ) -> Result<supplier::Model, ServiceError> {
        let existing = self
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {id} not found")))?;

        let mut model: supplier::ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(contact_name) = update.contact_name {
            model.contact_name = Set(contact_name);
        }
        if let Some(contact_email) = update.contact_email {
            model.contact_email = Set(contact_email);
        }
        if let Some(contact_phone) = update.contact_phone {
            model.contact_phone = Set(contact_phone);
        }
        if let Some(address) = update.address {
            model.address = Set(address);
        }
        model.updated_at = Set(Utc::now());
        Ok(model.update(self.db.as_ref()).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let res = Supplier::delete_by_id(id).exec(self.db.as_ref()).await?;
        if res.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Supplier {id} not found")));
        }
        Ok(())
    }

    /// All suppliers for export, ordered by name.
    pub async fn export_all(&self) -> Result<Vec<supplier::Model>, ServiceError> {
        Ok(Supplier::find()
            .order_by_asc(supplier::Column::Name)
            .all(self.db.as_ref())
            .await?)
    }

    /// Supplier count plus the ten suppliers with the most purchase orders.
    /// Orders reference suppliers by name, so the grouping is by name.
    #[instrument(skip(self))]
    pub async fn analytics(&self) -> Result<SupplierAnalytics, ServiceError> {
        let total_suppliers = Supplier::find().count(self.db.as_ref()).await?;

        let top_suppliers = purchase_order::Entity::find()
            .select_only()
            .column(purchase_order::Column::Supplier)
            .column_as(purchase_order::Column::Id.count(), "order_count")
            .group_by(purchase_order::Column::Supplier)
            .order_by_desc(Expr::col(Alias::new("order_count")))
            .limit(10)
            .into_model::<SupplierOrderCount>()
            .all(self.db.as_ref())
            .await?;

        Ok(SupplierAnalytics {
            total_suppliers,
            top_suppliers,
        })
    }
}
