use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::auth::AuthUser;
use crate::entities::audit_log::{self, Entity as AuditLog};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub user: Option<String>,
    pub action: Option<String>,
    pub object_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Append-only audit trail. Entries are written by mutating handlers and by
/// the explicit create endpoint; nothing ever updates or deletes them.
#[derive(Clone)]
pub struct AuditService {
    db: Arc<DatabaseConnection>,
}

impl AuditService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: AuditFilter,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<audit_log::Model>, ServiceError> {
        let mut query = AuditLog::find().order_by_desc(audit_log::Column::CreatedAt);
        if let Some(user) = filter.user.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(audit_log::Column::Username.contains(user));
        }
        if let Some(action) = filter.action.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(audit_log::Column::Action.contains(action));
        }
        if let Some(object_type) = filter.object_type.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(audit_log::Column::ObjectType.contains(object_type));
        }
        if let Some(start) = filter.start_date {
            let start_at = start.and_time(chrono::NaiveTime::MIN).and_utc();
            query = query.filter(audit_log::Column::CreatedAt.gte(start_at));
        }
        if let Some(end) = filter.end_date {
            // Inclusive end date: everything before the following midnight.
            let end_at = (end + chrono::Days::new(1))
                .and_time(chrono::NaiveTime::MIN)
                .and_utc();
            query = query.filter(audit_log::Column::CreatedAt.lt(end_at));
        }
        Ok(query
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await?)
    }

    #[instrument(skip(self, message))]
    pub async fn append(
        &self,
        user_id: Option<i32>,
        username: Option<String>,
        action: String,
        object_type: String,
        object_id: String,
        message: String,
    ) -> Result<audit_log::Model, ServiceError> {
        let model = audit_log::ActiveModel {
            user_id: Set(user_id),
            username: Set(username),
            action: Set(action),
            object_type: Set(object_type),
            object_id: Set(object_id),
            message: Set(message),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        Ok(model.insert(self.db.as_ref()).await?)
    }

    /// Best-effort trail entry for a mutating handler. A failed write is
    /// logged and swallowed so it never fails the request that caused it.
    pub async fn record(
        &self,
        actor: &AuthUser,
        action: &str,
        object_type: &str,
        object_id: impl ToString,
        message: String,
    ) {
        if let Err(err) = self
            .append(
                Some(actor.id),
                Some(actor.username.clone()),
                action.to_string(),
                object_type.to_string(),
                object_id.to_string(),
                message,
            )
            .await
        {
            warn!(action, object_type, error = %err, "failed to write audit log entry");
        }
    }
}
