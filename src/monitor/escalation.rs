//! Shared escalation path: open-alert dedup plus per-channel notification
//! fan-out. Every check executor funnels qualifying conditions through
//! [`escalate`].

use serde_json::Value;
use tracing::info;

use crate::db::enums::{AlertType, NotificationChannel};
use crate::db::entities::target;
use crate::db::models::NewNotification;
use crate::db::store::{MonitorStore, StoreError};

/// One qualifying condition, ready to be turned into an alert and a set of
/// channel notifications.
#[derive(Debug, Clone)]
pub struct Escalation {
    pub alert_type: AlertType,
    /// Message stored on the alert row and used as the email body.
    pub alert_message: String,
    pub email_subject: String,
    /// Channel-specific payload for the system notification.
    pub system_payload: Value,
    /// Base payload for webhook notifications; hook id, url and event are
    /// added per subscription.
    pub webhook_payload: Value,
}

#[derive(Debug, Clone, Copy)]
pub struct EscalationOutcome {
    pub alert_opened: bool,
    pub notifications_enqueued: usize,
}

/// Applies the dedup rule and enqueues notifications.
///
/// An alert is opened only if no open alert of the same type exists for the
/// target. Notification enqueuing is independent of that: with
/// `renotify_while_open` set, every qualifying sweep re-emits the full
/// channel set even while the alert stays open; without it, notifications
/// are only enqueued on the absent-to-open transition.
pub async fn escalate(
    store: &dyn MonitorStore,
    target: &target::Model,
    escalation: Escalation,
    renotify_while_open: bool,
) -> Result<EscalationOutcome, StoreError> {
    let existing = store
        .find_open_alert(target.id, escalation.alert_type)
        .await?;
    let alert_opened = existing.is_none();

    if alert_opened {
        store
            .create_alert(target.id, escalation.alert_type, &escalation.alert_message)
            .await?;
        info!(
            target_id = target.id,
            domain = %target.domain,
            alert_type = %escalation.alert_type,
            "Opened alert."
        );
    }

    if !alert_opened && !renotify_while_open {
        return Ok(EscalationOutcome {
            alert_opened,
            notifications_enqueued: 0,
        });
    }

    store
        .create_notification(NewNotification {
            target_id: target.id,
            alert_type: escalation.alert_type,
            channel: NotificationChannel::System,
            payload: escalation.system_payload,
        })
        .await?;

    store
        .create_notification(NewNotification {
            target_id: target.id,
            alert_type: escalation.alert_type,
            channel: NotificationChannel::Email,
            payload: serde_json::json!({
                "subject": escalation.email_subject,
                "message": escalation.alert_message,
            }),
        })
        .await?;

    let hooks = store.list_active_webhooks(escalation.alert_type).await?;
    let mut enqueued = 2;
    for hook in &hooks {
        let mut payload = escalation.webhook_payload.clone();
        if let Some(object) = payload.as_object_mut() {
            object.insert("webhook_id".to_string(), Value::from(hook.id));
            object.insert("url".to_string(), Value::from(hook.url.clone()));
            object.insert(
                "event".to_string(),
                Value::from(escalation.alert_type.as_str()),
            );
        }
        store
            .create_notification(NewNotification {
                target_id: target.id,
                alert_type: escalation.alert_type,
                channel: NotificationChannel::Webhook,
                payload,
            })
            .await?;
        enqueued += 1;
    }

    Ok(EscalationOutcome {
        alert_opened,
        notifications_enqueued: enqueued,
    })
}
