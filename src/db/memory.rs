//! In-memory implementation of the store traits used by the unit tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::db::entities::{activity_log, alert, check_result, notification, target, webhook};
use crate::db::enums::{
    AlertStatus, AlertType, CheckType, ExpiryKind, NotificationChannel, NotificationStatus,
    TargetStatus,
};
use crate::db::models::{AlertSettings, NewActivityLog, NewCheckResult, NewNotification};
use crate::db::store::{AlertSettingsStore, MonitorStore, StoreError};

#[derive(Default)]
struct State {
    targets: Vec<target::Model>,
    owner_emails: HashMap<i32, String>,
    check_results: Vec<check_result::Model>,
    alerts: Vec<alert::Model>,
    notifications: Vec<notification::Model>,
    webhooks: Vec<webhook::Model>,
    activity_logs: Vec<activity_log::Model>,
    settings: AlertSettings,
    next_id: i32,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

/// Builds a monitored target with no expiry dates and unknown status.
pub fn make_target(id: i32, domain: &str) -> target::Model {
    let now = Utc::now();
    target::Model {
        id,
        domain: domain.to_string(),
        monitoring_enabled: true,
        status: TargetStatus::Unknown.as_str().to_string(),
        domain_expiry_date: None,
        ssl_expiry_date: None,
        owner_id: None,
        created_at: now,
        updated_at: now,
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_target(&self, target: target::Model) {
        self.state.lock().unwrap().targets.push(target);
    }

    pub fn add_webhook(&self, url: &str, event: AlertType, is_active: bool) {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.webhooks.push(webhook::Model {
            id,
            url: url.to_string(),
            event: event.as_str().to_string(),
            is_active,
            created_at: Utc::now(),
        });
    }

    pub fn set_owner_email(&self, target_id: i32, email: &str) {
        self.state
            .lock()
            .unwrap()
            .owner_emails
            .insert(target_id, email.to_string());
    }

    pub fn targets(&self) -> Vec<target::Model> {
        self.state.lock().unwrap().targets.clone()
    }

    pub fn check_results(&self) -> Vec<check_result::Model> {
        self.state.lock().unwrap().check_results.clone()
    }

    pub fn alerts(&self) -> Vec<alert::Model> {
        self.state.lock().unwrap().alerts.clone()
    }

    pub fn notifications(&self) -> Vec<notification::Model> {
        self.state.lock().unwrap().notifications.clone()
    }

    pub fn activity_logs(&self) -> Vec<activity_log::Model> {
        self.state.lock().unwrap().activity_logs.clone()
    }
}

#[async_trait]
impl MonitorStore for MemoryStore {
    async fn list_monitored_targets(&self) -> Result<Vec<target::Model>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .targets
            .iter()
            .filter(|t| t.monitoring_enabled)
            .cloned()
            .collect())
    }

    async fn list_monitored_targets_with_expiry(
        &self,
        kind: ExpiryKind,
    ) -> Result<Vec<target::Model>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .targets
            .iter()
            .filter(|t| t.monitoring_enabled)
            .filter(|t| match kind {
                ExpiryKind::Domain => t.domain_expiry_date.is_some(),
                ExpiryKind::Ssl => t.ssl_expiry_date.is_some(),
            })
            .cloned()
            .collect())
    }

    async fn append_check_result(&self, input: NewCheckResult) -> Result<i32, StoreError> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.check_results.push(check_result::Model {
            id,
            target_id: input.target_id,
            check_type: input.check_type.as_str().to_string(),
            status: input.status.as_str().to_string(),
            response_time_ms: input.response_time_ms,
            message: input.message,
            raw_data: input.raw_data,
            checked_at: input.checked_at,
        });
        Ok(id)
    }

    async fn recent_check_results(
        &self,
        target_id: i32,
        check_type: CheckType,
        limit: u64,
    ) -> Result<Vec<check_result::Model>, StoreError> {
        let state = self.state.lock().unwrap();
        let mut results: Vec<check_result::Model> = state
            .check_results
            .iter()
            .filter(|c| c.target_id == target_id && c.check_type == check_type.as_str())
            .cloned()
            .collect();
        results.sort_by(|a, b| b.checked_at.cmp(&a.checked_at));
        results.truncate(limit as usize);
        Ok(results)
    }

    async fn find_open_alert(
        &self,
        target_id: i32,
        alert_type: AlertType,
    ) -> Result<Option<alert::Model>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .alerts
            .iter()
            .find(|a| {
                a.target_id == target_id
                    && a.alert_type == alert_type.as_str()
                    && a.status == AlertStatus::Open.as_str()
            })
            .cloned())
    }

    async fn create_alert(
        &self,
        target_id: i32,
        alert_type: AlertType,
        message: &str,
    ) -> Result<alert::Model, StoreError> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let model = alert::Model {
            id,
            target_id,
            alert_type: alert_type.as_str().to_string(),
            status: AlertStatus::Open.as_str().to_string(),
            message: message.to_string(),
            opened_at: Utc::now(),
            closed_at: None,
        };
        state.alerts.push(model.clone());
        Ok(model)
    }

    async fn close_alert(&self, alert_id: i32) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if let Some(a) = state
            .alerts
            .iter_mut()
            .find(|a| a.id == alert_id && a.status == AlertStatus::Open.as_str())
        {
            a.status = AlertStatus::Closed.as_str().to_string();
            a.closed_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_notification(&self, input: NewNotification) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.notifications.push(notification::Model {
            id,
            target_id: input.target_id,
            alert_type: input.alert_type.as_str().to_string(),
            channel: input.channel.as_str().to_string(),
            payload: input.payload,
            status: NotificationStatus::Pending.as_str().to_string(),
            created_at: Utc::now(),
            sent_at: None,
        });
        Ok(())
    }

    async fn list_pending_notifications(
        &self,
        channel: NotificationChannel,
        limit: u64,
    ) -> Result<Vec<notification::Model>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .notifications
            .iter()
            .filter(|n| {
                n.channel == channel.as_str()
                    && n.status == NotificationStatus::Pending.as_str()
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn mark_notification(
        &self,
        id: i32,
        status: NotificationStatus,
        sent_at: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if let Some(n) = state
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.status == NotificationStatus::Pending.as_str())
        {
            n.status = status.as_str().to_string();
            n.sent_at = sent_at;
        }
        Ok(())
    }

    async fn update_target_status(
        &self,
        target_id: i32,
        status: TargetStatus,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if let Some(t) = state.targets.iter_mut().find(|t| t.id == target_id) {
            t.status = status.as_str().to_string();
            t.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn list_active_webhooks(
        &self,
        event: AlertType,
    ) -> Result<Vec<webhook::Model>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .webhooks
            .iter()
            .filter(|w| w.is_active && w.event == event.as_str())
            .cloned()
            .collect())
    }

    async fn owner_email(&self, target_id: i32) -> Result<Option<String>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .owner_emails
            .get(&target_id)
            .cloned())
    }

    async fn append_activity_log(&self, input: NewActivityLog) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.activity_logs.push(activity_log::Model {
            id,
            endpoint: input.endpoint,
            method: input.method,
            payload: input.payload,
            user_agent: input.user_agent,
            created_at: Utc::now(),
        });
        Ok(())
    }
}

#[async_trait]
impl AlertSettingsStore for MemoryStore {
    async fn get_alert_settings(&self) -> Result<AlertSettings, StoreError> {
        Ok(self.state.lock().unwrap().settings.clone())
    }

    async fn update_alert_settings(
        &self,
        settings: AlertSettings,
    ) -> Result<AlertSettings, StoreError> {
        self.state.lock().unwrap().settings = settings.clone();
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn alert_settings_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get_alert_settings().await.unwrap().alert_email, None);

        let updated = store
            .update_alert_settings(AlertSettings {
                alert_email: Some("ops@example.com".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(updated, store.get_alert_settings().await.unwrap());
    }

    #[tokio::test]
    async fn mark_notification_only_moves_pending_rows() {
        let store = MemoryStore::new();
        store
            .create_notification(NewNotification {
                target_id: 1,
                alert_type: AlertType::UptimeDown,
                channel: NotificationChannel::Email,
                payload: serde_json::json!({}),
            })
            .await
            .unwrap();
        let id = store.notifications()[0].id;

        store
            .mark_notification(id, NotificationStatus::Sent, Some(Utc::now()))
            .await
            .unwrap();
        // a second transition must not overwrite the terminal state
        store
            .mark_notification(id, NotificationStatus::Failed, None)
            .await
            .unwrap();

        let n = &store.notifications()[0];
        assert_eq!(n.status, "sent");
        assert!(n.sent_at.is_some());
    }
}
