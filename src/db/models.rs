//! Insert DTOs and settings documents shared by the store trait and its
//! implementations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::enums::{AlertType, CheckStatus, CheckType, NotificationChannel};

/// Input for appending one probe outcome.
#[derive(Debug, Clone)]
pub struct NewCheckResult {
    pub target_id: i32,
    pub check_type: CheckType,
    pub status: CheckStatus,
    pub response_time_ms: Option<i32>,
    pub message: String,
    pub raw_data: Option<serde_json::Value>,
    pub checked_at: DateTime<Utc>,
}

/// Input for enqueuing one notification. Status always starts as pending.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub target_id: i32,
    pub alert_type: AlertType,
    pub channel: NotificationChannel,
    pub payload: serde_json::Value,
}

/// Input for one audit trail entry.
#[derive(Debug, Clone)]
pub struct NewActivityLog {
    pub endpoint: String,
    pub method: String,
    pub payload: String,
    pub user_agent: String,
}

/// Global alert settings singleton. Serialized as `{"alertEmail": ...}` in
/// the settings table, matching the document the operator UI writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertSettings {
    pub alert_email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_settings_document_uses_camel_case_key() {
        let settings = AlertSettings {
            alert_email: Some("ops@example.com".to_string()),
        };
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["alertEmail"], "ops@example.com");

        let parsed: AlertSettings = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn alert_settings_tolerates_empty_document() {
        let parsed: AlertSettings = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(parsed.alert_email, None);
    }
}
