//! Expiry check executor, parameterized over the domain registration and
//! TLS certificate expiry dates.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::db::enums::{CheckStatus, ExpiryKind};
use crate::db::entities::target;
use crate::db::models::{NewActivityLog, NewCheckResult};
use crate::db::store::{MonitorStore, StoreError};
use crate::monitor::escalation::{escalate, Escalation};

const ACTIVITY_PAYLOAD_MAX_CHARS: usize = 1000;

pub struct ExpiryCheckService {
    store: Arc<dyn MonitorStore>,
    kind: ExpiryKind,
    warning_days: i64,
    renotify_while_open: bool,
}

/// Whole days until `expiry`, rounded up. A date three and a half days out
/// reads as 4; an already-passed date yields a negative count.
fn days_until(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let diff_ms = expiry.signed_duration_since(now).num_milliseconds();
    (diff_ms as f64 / 86_400_000f64).ceil() as i64
}

impl ExpiryCheckService {
    pub fn new(
        store: Arc<dyn MonitorStore>,
        kind: ExpiryKind,
        warning_days: i64,
        renotify_while_open: bool,
    ) -> Self {
        Self {
            store,
            kind,
            warning_days,
            renotify_while_open,
        }
    }

    fn audit_endpoint(&self) -> &'static str {
        match self.kind {
            ExpiryKind::Domain => "cron:domain-expiry-check",
            ExpiryKind::Ssl => "cron:ssl-expiry-check",
        }
    }

    pub async fn start_periodic_sweeps(self: Arc<Self>, period: Duration) {
        info!(
            kind = self.kind.noun(),
            interval_seconds = period.as_secs(),
            "Expiry check service started."
        );
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = self.run_sweep().await {
                error!(kind = self.kind.noun(), error = %e, "Error during expiry sweep.");
            }
        }
    }

    /// One pass over every monitored target that carries the relevant expiry
    /// date. Per-target failures are logged and do not stop the sweep.
    pub async fn run_sweep(&self) -> Result<(), StoreError> {
        let targets = self
            .store
            .list_monitored_targets_with_expiry(self.kind)
            .await?;
        debug!(
            kind = self.kind.noun(),
            count = targets.len(),
            "Running expiry sweep."
        );
        let now = Utc::now();
        for target in targets {
            if let Err(e) = self.check_target(&target, now).await {
                error!(
                    target_id = target.id,
                    domain = %target.domain,
                    error = %e,
                    "Expiry check failed for target; continuing sweep."
                );
            }
        }
        Ok(())
    }

    async fn check_target(
        &self,
        target: &target::Model,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let expiry = match self.kind {
            ExpiryKind::Domain => target.domain_expiry_date,
            ExpiryKind::Ssl => target.ssl_expiry_date,
        };
        let Some(expiry) = expiry else {
            return Ok(());
        };
        let days = days_until(expiry, now);

        // Audit trail first; its failure never blocks the check itself.
        self.append_audit_entry(target, expiry, days).await;

        if days > self.warning_days {
            return Ok(());
        }

        let noun = self.kind.noun();
        self.store
            .append_check_result(NewCheckResult {
                target_id: target.id,
                check_type: self.kind.check_type(),
                status: CheckStatus::Warning,
                response_time_ms: None,
                message: format!("{noun} will expire in {days} days"),
                raw_data: Some(serde_json::json!({
                    "days": days,
                    "expiresAt": expiry,
                })),
                checked_at: now,
            })
            .await?;

        let alert_message = format!("{noun} {} will expire in {days} days", target.domain);
        escalate(
            self.store.as_ref(),
            target,
            Escalation {
                alert_type: self.kind.alert_type(),
                alert_message: alert_message.clone(),
                email_subject: format!("[Website Manager] {noun} expiring: {}", target.domain),
                system_payload: serde_json::json!({
                    "domain": target.domain,
                    "days": days,
                }),
                webhook_payload: serde_json::json!({
                    "domain": target.domain,
                    "days": days,
                }),
            },
            self.renotify_while_open,
        )
        .await?;
        Ok(())
    }

    async fn append_audit_entry(&self, target: &target::Model, expiry: DateTime<Utc>, days: i64) {
        let mut payload = serde_json::json!({
            "domain": target.domain,
            "days": days,
            "expiresAt": expiry,
        })
        .to_string();
        if payload.len() > ACTIVITY_PAYLOAD_MAX_CHARS {
            payload = payload.chars().take(ACTIVITY_PAYLOAD_MAX_CHARS).collect();
        }
        let result = self
            .store
            .append_activity_log(NewActivityLog {
                endpoint: self.audit_endpoint().to_string(),
                method: "SYSTEM".to_string(),
                payload,
                user_agent: "cron-job".to_string(),
            })
            .await;
        if let Err(e) = result {
            warn!(
                target_id = target.id,
                error = %e,
                "Failed to append expiry audit entry."
            );
        }
    }
}
