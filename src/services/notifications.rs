use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::entities::notification::{self, Entity as Notification, NotificationKind};
use crate::errors::ServiceError;

#[derive(Clone)]
pub struct NotificationService {
    db: Arc<DatabaseConnection>,
}

impl NotificationService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// A user sees their own notifications plus broadcasts (user_id null),
    /// newest first.
    #[instrument(skip(self))]
    pub async fn list_for_user(
        &self,
        user_id: i32,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<notification::Model>, ServiceError> {
        Ok(Notification::find()
            .filter(
                Condition::any()
                    .add(notification::Column::UserId.eq(user_id))
                    .add(notification::Column::UserId.is_null()),
            )
            .order_by_desc(notification::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await?)
    }

    /// Create a notification; `user_id` of `None` broadcasts to everyone.
    #[instrument(skip(self, message))]
    pub async fn create(
        &self,
        user_id: Option<i32>,
        message: String,
        kind: NotificationKind,
    ) -> Result<notification::Model, ServiceError> {
        let model = notification::ActiveModel {
            user_id: Set(user_id),
            message: Set(message),
            kind: Set(kind),
            is_read: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let created = model.insert(self.db.as_ref()).await?;
        info!(
            notification_id = created.id,
            kind = created.kind.as_str(),
            broadcast = created.user_id.is_none(),
            "notification created"
        );
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn mark_read(&self, id: i32) -> Result<notification::Model, ServiceError> {
        let existing = Notification::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Notification {id} not found")))?;

        let mut model: notification::ActiveModel = existing.into();
        model.is_read = Set(true);
        Ok(model.update(self.db.as_ref()).await?)
    }

    /// Mark every unread notification visible to the user as read; returns
    /// the number of rows touched.
    #[instrument(skip(self))]
    pub async fn mark_all_read(&self, user_id: i32) -> Result<u64, ServiceError> {
        let res = Notification::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .filter(
                Condition::any()
                    .add(notification::Column::UserId.eq(user_id))
                    .add(notification::Column::UserId.is_null()),
            )
            .filter(notification::Column::IsRead.eq(false))
            .exec(self.db.as_ref())
            .await?;
        Ok(res.rows_affected)
    }

    /// Delete a notification. A personal notification may only be deleted by
    /// its owner; broadcasts may be deleted by anyone authenticated.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32, requester_id: i32) -> Result<(), ServiceError> {
        let existing = Notification::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Notification {id} not found")))?;

        if let Some(owner) = existing.user_id {
            if owner != requester_id {
                return Err(ServiceError::Forbidden(
                    "Cannot delete another user's notification".into(),
                ));
            }
        }

        Notification::delete_by_id(id).exec(self.db.as_ref()).await?;
        Ok(())
    }
}
