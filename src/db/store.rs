//! Storage-agnostic collaborator contracts for the monitoring engine.
//!
//! The engine only ever talks to the data store through [`MonitorStore`] and
//! [`AlertSettingsStore`]. [`SeaOrmStore`] is the production implementation
//! backed by the query services; tests run against the in-memory store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DbErr};
use std::sync::Arc;
use thiserror::Error;

use crate::db::entities::{alert, check_result, notification, target, webhook};
use crate::db::enums::{
    AlertType, CheckType, ExpiryKind, NotificationChannel, NotificationStatus, TargetStatus,
};
use crate::db::models::{AlertSettings, NewActivityLog, NewCheckResult, NewNotification};
use crate::db::services;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Repository operations the engine requires from the data store.
#[async_trait]
pub trait MonitorStore: Send + Sync {
    async fn list_monitored_targets(&self) -> Result<Vec<target::Model>, StoreError>;

    async fn list_monitored_targets_with_expiry(
        &self,
        kind: ExpiryKind,
    ) -> Result<Vec<target::Model>, StoreError>;

    async fn append_check_result(&self, input: NewCheckResult) -> Result<i32, StoreError>;

    /// Most recent results first, ordered by `checked_at` descending.
    async fn recent_check_results(
        &self,
        target_id: i32,
        check_type: CheckType,
        limit: u64,
    ) -> Result<Vec<check_result::Model>, StoreError>;

    async fn find_open_alert(
        &self,
        target_id: i32,
        alert_type: AlertType,
    ) -> Result<Option<alert::Model>, StoreError>;

    async fn create_alert(
        &self,
        target_id: i32,
        alert_type: AlertType,
        message: &str,
    ) -> Result<alert::Model, StoreError>;

    /// Exposed for external acknowledgement flows; never invoked by the
    /// engine itself.
    async fn close_alert(&self, alert_id: i32) -> Result<(), StoreError>;

    async fn create_notification(&self, input: NewNotification) -> Result<(), StoreError>;

    async fn list_pending_notifications(
        &self,
        channel: NotificationChannel,
        limit: u64,
    ) -> Result<Vec<notification::Model>, StoreError>;

    async fn mark_notification(
        &self,
        id: i32,
        status: NotificationStatus,
        sent_at: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError>;

    async fn update_target_status(
        &self,
        target_id: i32,
        status: TargetStatus,
    ) -> Result<(), StoreError>;

    async fn list_active_webhooks(
        &self,
        event: AlertType,
    ) -> Result<Vec<webhook::Model>, StoreError>;

    async fn owner_email(&self, target_id: i32) -> Result<Option<String>, StoreError>;

    async fn append_activity_log(&self, input: NewActivityLog) -> Result<(), StoreError>;
}

/// Durable alert settings, read fresh on every dispatcher run so operator
/// changes take effect without a restart.
#[async_trait]
pub trait AlertSettingsStore: Send + Sync {
    async fn get_alert_settings(&self) -> Result<AlertSettings, StoreError>;

    async fn update_alert_settings(
        &self,
        settings: AlertSettings,
    ) -> Result<AlertSettings, StoreError>;
}

/// Production store backed by sea-orm over Postgres.
#[derive(Clone)]
pub struct SeaOrmStore {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MonitorStore for SeaOrmStore {
    async fn list_monitored_targets(&self) -> Result<Vec<target::Model>, StoreError> {
        Ok(services::list_monitored_targets(&self.db).await?)
    }

    async fn list_monitored_targets_with_expiry(
        &self,
        kind: ExpiryKind,
    ) -> Result<Vec<target::Model>, StoreError> {
        Ok(services::list_monitored_targets_with_expiry(&self.db, kind).await?)
    }

    async fn append_check_result(&self, input: NewCheckResult) -> Result<i32, StoreError> {
        Ok(services::append_check_result(&self.db, input).await?)
    }

    async fn recent_check_results(
        &self,
        target_id: i32,
        check_type: CheckType,
        limit: u64,
    ) -> Result<Vec<check_result::Model>, StoreError> {
        Ok(services::recent_check_results(&self.db, target_id, check_type, limit).await?)
    }

    async fn find_open_alert(
        &self,
        target_id: i32,
        alert_type: AlertType,
    ) -> Result<Option<alert::Model>, StoreError> {
        Ok(services::find_open_alert(&self.db, target_id, alert_type).await?)
    }

    async fn create_alert(
        &self,
        target_id: i32,
        alert_type: AlertType,
        message: &str,
    ) -> Result<alert::Model, StoreError> {
        Ok(services::create_alert(&self.db, target_id, alert_type, message).await?)
    }

    async fn close_alert(&self, alert_id: i32) -> Result<(), StoreError> {
        services::close_alert(&self.db, alert_id).await?;
        Ok(())
    }

    async fn create_notification(&self, input: NewNotification) -> Result<(), StoreError> {
        services::create_notification(&self.db, input).await?;
        Ok(())
    }

    async fn list_pending_notifications(
        &self,
        channel: NotificationChannel,
        limit: u64,
    ) -> Result<Vec<notification::Model>, StoreError> {
        Ok(services::list_pending_notifications(&self.db, channel, limit).await?)
    }

    async fn mark_notification(
        &self,
        id: i32,
        status: NotificationStatus,
        sent_at: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError> {
        services::mark_notification(&self.db, id, status, sent_at).await?;
        Ok(())
    }

    async fn update_target_status(
        &self,
        target_id: i32,
        status: TargetStatus,
    ) -> Result<(), StoreError> {
        services::update_target_status(&self.db, target_id, status).await?;
        Ok(())
    }

    async fn list_active_webhooks(
        &self,
        event: AlertType,
    ) -> Result<Vec<webhook::Model>, StoreError> {
        Ok(services::list_active_webhooks(&self.db, event).await?)
    }

    async fn owner_email(&self, target_id: i32) -> Result<Option<String>, StoreError> {
        Ok(services::get_owner_email(&self.db, target_id).await?)
    }

    async fn append_activity_log(&self, input: NewActivityLog) -> Result<(), StoreError> {
        services::append_activity_log(&self.db, input).await?;
        Ok(())
    }
}

#[async_trait]
impl AlertSettingsStore for SeaOrmStore {
    async fn get_alert_settings(&self) -> Result<AlertSettings, StoreError> {
        Ok(services::get_alert_settings(&self.db).await?)
    }

    async fn update_alert_settings(
        &self,
        settings: AlertSettings,
    ) -> Result<AlertSettings, StoreError> {
        Ok(services::update_alert_settings(&self.db, settings).await?)
    }
}
