use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::entities::payment_request::{
    self, Entity as PaymentRequest, PaymentStatus, PaymentType,
};
use crate::entities::payment_transaction::{
    self, Entity as PaymentTransaction, TransactionType,
};
use crate::errors::ServiceError;

#[derive(Debug, Clone)]
pub struct NewPaymentRequest {
    pub user_id: i32,
    pub payment_type: PaymentType,
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub momo_phone: String,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub status: Option<PaymentStatus>,
    pub payment_type: Option<PaymentType>,
}

#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAnalytics {
    pub total_payments: u64,
    pub completed_payments: u64,
    pub pending_payments: u64,
    pub failed_payments: u64,
    pub total_amount: Decimal,
    pub recent_payments: Vec<payment_request::Model>,
}

/// Generate the externally-visible reference for a new payment request.
/// Generated once at creation; never changed afterwards.
fn new_reference_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("IPMS-{}", hex[..8].to_uppercase())
}

/// Payment requests and their transactions. The gateway integration is a
/// placeholder: links are hand-built URLs and the webhook trusts its caller.
#[derive(Clone)]
pub struct PaymentService {
    db: Arc<DatabaseConnection>,
    link_base: String,
}

impl PaymentService {
    pub fn new(db: Arc<DatabaseConnection>, link_base: String) -> Self {
        Self { db, link_base }
    }

    #[instrument(skip(self, new))]
    pub async fn create_request(
        &self,
        new: NewPaymentRequest,
    ) -> Result<payment_request::Model, ServiceError> {
        if new.amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "amount must be positive".into(),
            ));
        }

        let now = Utc::now();
        let model = payment_request::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(new.user_id),
            payment_type: Set(new.payment_type),
            amount: Set(new.amount),
            currency: Set(new.currency),
            description: Set(new.description),
            momo_phone: Set(new.momo_phone),
            reference_id: Set(new_reference_id()),
            status: Set(PaymentStatus::Pending),
            payment_url: Set(None),
            transaction_id: Set(None),
            notes: Set(String::new()),
            error_message: Set(String::new()),
            created_at: Set(now),
            updated_at: Set(now),
            completed_at: Set(None),
        };
        let created = model.insert(self.db.as_ref()).await?;
        info!(reference_id = %created.reference_id, "payment request created");
        Ok(created)
    }

    /// Create a request and attach a placeholder gateway link. There is no
    /// real gateway call behind this URL.
    #[instrument(skip(self, new))]
    pub async fn generate_link(
        &self,
        new: NewPaymentRequest,
    ) -> Result<payment_request::Model, ServiceError> {
        let created = self.create_request(new).await?;
        let url = format!(
            "{}?ref={}&amount={}&phone={}",
            self.link_base, created.reference_id, created.amount, created.momo_phone
        );

        let mut model: payment_request::ActiveModel = created.into();
        model.payment_url = Set(Some(url));
        model.updated_at = Set(Utc::now());
        Ok(model.update(self.db.as_ref()).await?)
    }

    /// List a user's own payment requests, newest first.
    #[instrument(skip(self))]
    pub async fn list_for_user(
        &self,
        user_id: i32,
        filter: PaymentFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<payment_request::Model>, ServiceError> {
        let mut query = PaymentRequest::find()
            .filter(payment_request::Column::UserId.eq(user_id))
            .order_by_desc(payment_request::Column::CreatedAt);
        if let Some(status) = filter.status {
            query = query.filter(payment_request::Column::Status.eq(status));
        }
        if let Some(payment_type) = filter.payment_type {
            query = query.filter(payment_request::Column::PaymentType.eq(payment_type));
        }
        Ok(query
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await?)
    }

    /// Fetch a request scoped to its owner.
    pub async fn get_for_user(
        &self,
        id: Uuid,
        user_id: i32,
    ) -> Result<Option<payment_request::Model>, ServiceError> {
        Ok(PaymentRequest::find_by_id(id)
            .filter(payment_request::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_for_user(&self, id: Uuid, user_id: i32) -> Result<(), ServiceError> {
        let existing = self
            .get_for_user(id, user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Payment request {id} not found")))?;
        PaymentRequest::delete_by_id(existing.id)
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }

    /// Owner-driven status update. `reference_id` is immutable; only status,
    /// transaction id and free-text fields change.
    #[instrument(skip(self, update))]
    pub async fn update_status(
        &self,
        id: Uuid,
        user_id: i32,
        update: StatusUpdate,
    ) -> Result<(payment_request::Model, PaymentStatus), ServiceError> {
        let existing = self
            .get_for_user(id, user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Payment request {id} not found")))?;
        let old_status = existing.status;

        let mut model: payment_request::ActiveModel = existing.into();
        model.status = Set(update.status);
        if let Some(transaction_id) = update.transaction_id {
            model.transaction_id = Set(Some(transaction_id));
        }
        if let Some(notes) = update.notes {
            model.notes = Set(notes);
        }
        if let Some(error_message) = update.error_message {
            model.error_message = Set(error_message);
        }
        if update.status == PaymentStatus::Completed {
            model.completed_at = Set(Some(Utc::now()));
        }
        model.updated_at = Set(Utc::now());
        let updated = model.update(self.db.as_ref()).await?;
        Ok((updated, old_status))
    }

    /// Webhook-driven update, keyed by reference id. Unknown references are
    /// a 404; a completed status also records a transaction row when the
    /// gateway supplied a transaction id not seen before.
    #[instrument(skip(self))]
    pub async fn apply_webhook(
        &self,
        reference_id: &str,
        transaction_id: Option<String>,
        status: PaymentStatus,
    ) -> Result<(payment_request::Model, PaymentStatus), ServiceError> {
        let existing = PaymentRequest::find()
            .filter(payment_request::Column::ReferenceId.eq(reference_id))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Payment request {reference_id} not found"))
            })?;
        let old_status = existing.status;
        let request_snapshot = existing.clone();

        let mut model: payment_request::ActiveModel = existing.into();
        model.status = Set(status);
        if let Some(ref tid) = transaction_id {
            model.transaction_id = Set(Some(tid.clone()));
        }
        if status == PaymentStatus::Completed {
            model.completed_at = Set(Some(Utc::now()));
        }
        model.updated_at = Set(Utc::now());
        let updated = model.update(self.db.as_ref()).await?;

        if let Some(tid) = transaction_id {
            self.record_transaction(&request_snapshot, tid, status).await?;
        }

        info!(reference_id, status = status.as_str(), "webhook applied");
        Ok((updated, old_status))
    }

    async fn record_transaction(
        &self,
        request: &payment_request::Model,
        external_transaction_id: String,
        status: PaymentStatus,
    ) -> Result<(), ServiceError> {
        let seen = PaymentTransaction::find()
            .filter(
                payment_transaction::Column::ExternalTransactionId
                    .eq(external_transaction_id.as_str()),
            )
            .one(self.db.as_ref())
            .await?;
        if seen.is_some() {
            return Ok(());
        }

        let model = payment_transaction::ActiveModel {
            id: Set(Uuid::new_v4()),
            payment_request_id: Set(request.id),
            transaction_type: Set(TransactionType::Payment),
            amount: Set(request.amount),
            currency: Set(request.currency.clone()),
            external_transaction_id: Set(external_transaction_id),
            phone: Set(request.momo_phone.clone()),
            status: Set(status),
            description: Set(request.description.clone()),
            created_at: Set(Utc::now()),
        };
        model.insert(self.db.as_ref()).await?;
        Ok(())
    }

    /// Transactions belonging to the user's requests, optionally narrowed to
    /// one request.
    #[instrument(skip(self))]
    pub async fn list_transactions(
        &self,
        user_id: i32,
        payment_request_id: Option<Uuid>,
    ) -> Result<Vec<payment_transaction::Model>, ServiceError> {
        let request_ids: Vec<Uuid> = PaymentRequest::find()
            .filter(payment_request::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|r| r.id)
            .filter(|id| payment_request_id.map_or(true, |wanted| *id == wanted))
            .collect();

        if request_ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(PaymentTransaction::find()
            .filter(payment_transaction::Column::PaymentRequestId.is_in(request_ids))
            .order_by_desc(payment_transaction::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?)
    }

    /// Per-user statistics, folded in memory; fine at this scale.
    #[instrument(skip(self))]
    pub async fn analytics(&self, user_id: i32) -> Result<PaymentAnalytics, ServiceError> {
        let requests = PaymentRequest::find()
            .filter(payment_request::Column::UserId.eq(user_id))
            .order_by_desc(payment_request::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        let count_with =
            |s: PaymentStatus| requests.iter().filter(|r| r.status == s).count() as u64;
        let total_amount = requests
            .iter()
            .filter(|r| r.status == PaymentStatus::Completed)
            .map(|r| r.amount)
            .sum();

        Ok(PaymentAnalytics {
            total_payments: requests.len() as u64,
            completed_payments: count_with(PaymentStatus::Completed),
            pending_payments: count_with(PaymentStatus::Pending),
            failed_payments: count_with(PaymentStatus::Failed),
            total_amount,
            recent_payments: requests.into_iter().take(5).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_ids_have_the_expected_shape() {
        let reference = new_reference_id();
        assert!(reference.starts_with("IPMS-"));
        assert_eq!(reference.len(), "IPMS-".len() + 8);
        assert!(reference["IPMS-".len()..]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
