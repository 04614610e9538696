//! Email dispatch service: drains the pending email notification queue in
//! batches, resolves each recipient through the destination chain, and marks
//! every row with a terminal status.

use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::db::entities::notification;
use crate::db::enums::{NotificationChannel, NotificationStatus};
use crate::db::store::{AlertSettingsStore, MonitorStore, StoreError};
use crate::notifications::mailer::Mailer;

/// Document stored in an email notification's payload column. Every field is
/// optional; escalation writes `subject` and `message`, external enqueuers
/// may write `to` and `body`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EmailPayload {
    to: Option<String>,
    subject: Option<String>,
    body: Option<String>,
    message: Option<String>,
}

pub struct EmailDispatchService {
    store: Arc<dyn MonitorStore>,
    settings: Arc<dyn AlertSettingsStore>,
    mailer: Arc<dyn Mailer>,
    batch_size: u64,
    default_recipient: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl EmailDispatchService {
    pub fn new(
        store: Arc<dyn MonitorStore>,
        settings: Arc<dyn AlertSettingsStore>,
        mailer: Arc<dyn Mailer>,
        batch_size: u64,
        default_recipient: Option<String>,
    ) -> Self {
        Self {
            store,
            settings,
            mailer,
            batch_size,
            default_recipient: non_empty(default_recipient),
        }
    }

    pub async fn start_periodic_dispatch(self: Arc<Self>, period: Duration) {
        info!(
            interval_seconds = period.as_secs(),
            batch_size = self.batch_size,
            "Email dispatch service started."
        );
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = self.run_dispatch_cycle().await {
                error!(error = %e, "Error during email dispatch cycle.");
            }
        }
    }

    /// One drain of the pending queue. Settings are re-read each cycle so an
    /// operator change to the global alert address applies immediately.
    pub async fn run_dispatch_cycle(&self) -> Result<(), StoreError> {
        let settings = self.settings.get_alert_settings().await?;
        let global_recipient = non_empty(settings.alert_email);
        let pending = self
            .store
            .list_pending_notifications(NotificationChannel::Email, self.batch_size)
            .await?;
        debug!(count = pending.len(), "Dispatching pending email notifications.");

        for item in pending {
            self.dispatch_one(&item, global_recipient.as_deref()).await;
        }
        Ok(())
    }

    async fn dispatch_one(&self, item: &notification::Model, global_recipient: Option<&str>) {
        let payload: EmailPayload = match serde_json::from_value(item.payload.clone()) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(
                    notification_id = item.id,
                    error = %e,
                    "Malformed email payload; marking notification failed."
                );
                self.mark(item.id, NotificationStatus::Failed, None).await;
                return;
            }
        };

        let Some(recipient) = self.resolve_recipient(item, global_recipient, &payload).await
        else {
            warn!(
                notification_id = item.id,
                target_id = item.target_id,
                "No destination for email notification; marking failed."
            );
            self.mark(item.id, NotificationStatus::Failed, None).await;
            return;
        };

        let subject = payload
            .subject
            .unwrap_or_else(|| "[Website Manager] Alert".to_string());
        let text = payload.body.or(payload.message).unwrap_or_default();

        match self.mailer.send(&recipient, &subject, &text).await {
            Ok(()) => {
                self.mark(item.id, NotificationStatus::Sent, Some(Utc::now()))
                    .await;
            }
            Err(e) => {
                error!(
                    notification_id = item.id,
                    recipient = %recipient,
                    error = %e,
                    "Failed to send email notification."
                );
                self.mark(item.id, NotificationStatus::Failed, None).await;
            }
        }
    }

    /// Destination chain: the global alert address wins, then the payload's
    /// own `to`, then the target owner's account email, then the configured
    /// fallback.
    async fn resolve_recipient(
        &self,
        item: &notification::Model,
        global_recipient: Option<&str>,
        payload: &EmailPayload,
    ) -> Option<String> {
        if let Some(to) = global_recipient {
            return Some(to.to_string());
        }
        if let Some(to) = non_empty(payload.to.clone()) {
            return Some(to);
        }
        match self.store.owner_email(item.target_id).await {
            Ok(Some(email)) => return non_empty(Some(email)).or_else(|| self.default_recipient.clone()),
            Ok(None) => {}
            Err(e) => {
                warn!(
                    notification_id = item.id,
                    target_id = item.target_id,
                    error = %e,
                    "Owner email lookup failed; falling back."
                );
            }
        }
        self.default_recipient.clone()
    }

    async fn mark(
        &self,
        id: i32,
        status: NotificationStatus,
        sent_at: Option<chrono::DateTime<Utc>>,
    ) {
        if let Err(e) = self.store.mark_notification(id, status, sent_at).await {
            error!(
                notification_id = id,
                status = %status,
                error = %e,
                "Failed to update notification status."
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::enums::AlertType;
    use crate::db::memory::{make_target, MemoryStore};
    use crate::db::models::{AlertSettings, NewNotification};
    use crate::notifications::mailer::TransportError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingMailer {
        sent: Mutex<Vec<(String, String, String)>>,
        fail: bool,
    }

    impl RecordingMailer {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn sent(&self) -> Vec<(String, String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, to: &str, subject: &str, text: &str) -> Result<(), TransportError> {
            if self.fail {
                return Err(TransportError::Delivery("connection refused".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string(), text.to_string()));
            Ok(())
        }
    }

    async fn enqueue_email(store: &MemoryStore, target_id: i32, payload: serde_json::Value) {
        store
            .create_notification(NewNotification {
                target_id,
                alert_type: AlertType::UptimeDown,
                channel: NotificationChannel::Email,
                payload,
            })
            .await
            .unwrap();
    }

    fn dispatcher(
        store: Arc<MemoryStore>,
        mailer: Arc<RecordingMailer>,
        default_recipient: Option<&str>,
    ) -> EmailDispatchService {
        EmailDispatchService::new(
            store.clone(),
            store,
            mailer,
            20,
            default_recipient.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn global_alert_address_overrides_all_other_destinations() {
        let store = Arc::new(MemoryStore::new());
        store.add_target(make_target(1, "example.com"));
        store.set_owner_email(1, "owner@example.com");
        store
            .update_alert_settings(AlertSettings {
                alert_email: Some("ops@example.com".to_string()),
            })
            .await
            .unwrap();
        enqueue_email(
            &store,
            1,
            serde_json::json!({"to": "payload@example.com", "subject": "Down", "message": "body"}),
        )
        .await;
        let mailer = Arc::new(RecordingMailer::new());

        dispatcher(store.clone(), mailer.clone(), Some("fallback@example.com"))
            .run_dispatch_cycle()
            .await
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], (
            "ops@example.com".to_string(),
            "Down".to_string(),
            "body".to_string(),
        ));
        let n = &store.notifications()[0];
        assert_eq!(n.status, "sent");
        assert!(n.sent_at.is_some());
    }

    #[tokio::test]
    async fn payload_recipient_used_when_no_global_address() {
        let store = Arc::new(MemoryStore::new());
        store.add_target(make_target(1, "example.com"));
        store.set_owner_email(1, "owner@example.com");
        enqueue_email(
            &store,
            1,
            serde_json::json!({"to": "payload@example.com", "message": "body"}),
        )
        .await;
        let mailer = Arc::new(RecordingMailer::new());

        dispatcher(store.clone(), mailer.clone(), None)
            .run_dispatch_cycle()
            .await
            .unwrap();

        assert_eq!(mailer.sent()[0].0, "payload@example.com");
    }

    #[tokio::test]
    async fn owner_email_used_when_payload_has_no_recipient() {
        let store = Arc::new(MemoryStore::new());
        store.add_target(make_target(1, "example.com"));
        store.set_owner_email(1, "owner@example.com");
        enqueue_email(&store, 1, serde_json::json!({"message": "body"})).await;
        let mailer = Arc::new(RecordingMailer::new());

        dispatcher(store.clone(), mailer.clone(), Some("fallback@example.com"))
            .run_dispatch_cycle()
            .await
            .unwrap();

        assert_eq!(mailer.sent()[0].0, "owner@example.com");
    }

    #[tokio::test]
    async fn configured_fallback_is_the_last_resort() {
        let store = Arc::new(MemoryStore::new());
        store.add_target(make_target(1, "example.com"));
        enqueue_email(&store, 1, serde_json::json!({"message": "body"})).await;
        let mailer = Arc::new(RecordingMailer::new());

        dispatcher(store.clone(), mailer.clone(), Some("fallback@example.com"))
            .run_dispatch_cycle()
            .await
            .unwrap();

        assert_eq!(mailer.sent()[0].0, "fallback@example.com");
    }

    #[tokio::test]
    async fn no_destination_fails_the_notification_without_an_attempt() {
        let store = Arc::new(MemoryStore::new());
        store.add_target(make_target(1, "example.com"));
        enqueue_email(&store, 1, serde_json::json!({"message": "body"})).await;
        let mailer = Arc::new(RecordingMailer::new());

        dispatcher(store.clone(), mailer.clone(), None)
            .run_dispatch_cycle()
            .await
            .unwrap();

        assert!(mailer.sent().is_empty());
        assert_eq!(store.notifications()[0].status, "failed");
        assert!(store.notifications()[0].sent_at.is_none());
    }

    #[tokio::test]
    async fn transport_error_marks_the_notification_failed() {
        let store = Arc::new(MemoryStore::new());
        store.add_target(make_target(1, "example.com"));
        store.set_owner_email(1, "owner@example.com");
        enqueue_email(&store, 1, serde_json::json!({"message": "body"})).await;
        let mailer = Arc::new(RecordingMailer::failing());

        dispatcher(store.clone(), mailer, None)
            .run_dispatch_cycle()
            .await
            .unwrap();

        assert_eq!(store.notifications()[0].status, "failed");
        assert!(store.notifications()[0].sent_at.is_none());
    }

    #[tokio::test]
    async fn malformed_payload_marks_the_notification_failed() {
        let store = Arc::new(MemoryStore::new());
        store.add_target(make_target(1, "example.com"));
        enqueue_email(&store, 1, serde_json::json!("not an object")).await;
        let mailer = Arc::new(RecordingMailer::new());

        dispatcher(store.clone(), mailer.clone(), Some("fallback@example.com"))
            .run_dispatch_cycle()
            .await
            .unwrap();

        assert!(mailer.sent().is_empty());
        assert_eq!(store.notifications()[0].status, "failed");
    }

    #[tokio::test]
    async fn each_cycle_drains_at_most_one_batch() {
        let store = Arc::new(MemoryStore::new());
        store.add_target(make_target(1, "example.com"));
        store.set_owner_email(1, "owner@example.com");
        for _ in 0..25 {
            enqueue_email(&store, 1, serde_json::json!({"message": "body"})).await;
        }
        let mailer = Arc::new(RecordingMailer::new());
        let svc = dispatcher(store.clone(), mailer.clone(), None);

        svc.run_dispatch_cycle().await.unwrap();
        assert_eq!(mailer.sent().len(), 20);
        let still_pending = store
            .notifications()
            .iter()
            .filter(|n| n.status == "pending")
            .count();
        assert_eq!(still_pending, 5);

        svc.run_dispatch_cycle().await.unwrap();
        assert_eq!(mailer.sent().len(), 25);
    }

    #[tokio::test]
    async fn non_email_channels_are_left_untouched() {
        let store = Arc::new(MemoryStore::new());
        store.add_target(make_target(1, "example.com"));
        store
            .create_notification(NewNotification {
                target_id: 1,
                alert_type: AlertType::UptimeDown,
                channel: NotificationChannel::System,
                payload: serde_json::json!({"domain": "example.com"}),
            })
            .await
            .unwrap();
        let mailer = Arc::new(RecordingMailer::new());

        dispatcher(store.clone(), mailer.clone(), Some("fallback@example.com"))
            .run_dispatch_cycle()
            .await
            .unwrap();

        assert!(mailer.sent().is_empty());
        assert_eq!(store.notifications()[0].status, "pending");
    }

    #[tokio::test]
    async fn missing_subject_falls_back_to_a_generic_one() {
        let store = Arc::new(MemoryStore::new());
        store.add_target(make_target(1, "example.com"));
        store.set_owner_email(1, "owner@example.com");
        enqueue_email(&store, 1, serde_json::json!({"message": "body"})).await;
        let mailer = Arc::new(RecordingMailer::new());

        dispatcher(store.clone(), mailer.clone(), None)
            .run_dispatch_cycle()
            .await
            .unwrap();

        assert_eq!(mailer.sent()[0].1, "[Website Manager] Alert");
    }
}
