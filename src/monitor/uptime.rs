//! Uptime check executor: probes every monitored target, records the
//! outcome, stamps target status, and escalates after consecutive failures.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::db::enums::{AlertType, CheckStatus, CheckType, TargetStatus};
use crate::db::entities::target;
use crate::db::models::NewCheckResult;
use crate::db::store::{MonitorStore, StoreError};
use crate::monitor::escalation::{escalate, Escalation};
use crate::monitor::probe::Prober;

pub struct UptimeCheckService {
    store: Arc<dyn MonitorStore>,
    prober: Arc<dyn Prober>,
    down_threshold: usize,
    renotify_while_open: bool,
}

impl UptimeCheckService {
    pub fn new(
        store: Arc<dyn MonitorStore>,
        prober: Arc<dyn Prober>,
        down_threshold: usize,
        renotify_while_open: bool,
    ) -> Self {
        Self {
            store,
            prober,
            down_threshold,
            renotify_while_open,
        }
    }

    /// Runs uptime sweeps forever on a fixed cadence. The sweep body is
    /// awaited before the next tick, so a kind never overlaps itself.
    pub async fn start_periodic_sweeps(self: Arc<Self>, period: Duration) {
        info!(
            interval_seconds = period.as_secs(),
            "Uptime check service started."
        );
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = self.run_sweep().await {
                error!(error = %e, "Error during uptime sweep.");
            }
        }
    }

    /// One pass over all monitored targets. Per-target failures are logged
    /// and do not stop the sweep.
    pub async fn run_sweep(&self) -> Result<(), StoreError> {
        let targets = self.store.list_monitored_targets().await?;
        debug!(count = targets.len(), "Running uptime sweep.");
        for target in targets {
            if let Err(e) = self.check_target(&target).await {
                error!(
                    target_id = target.id,
                    domain = %target.domain,
                    error = %e,
                    "Uptime check failed for target; continuing sweep."
                );
            }
        }
        Ok(())
    }

    async fn check_target(&self, target: &target::Model) -> Result<(), StoreError> {
        if target.domain.is_empty() {
            return Ok(());
        }
        let url = if target.domain.starts_with("http") {
            target.domain.clone()
        } else {
            format!("https://{}", target.domain)
        };

        let now = Utc::now();
        let outcome = self.prober.probe(&url).await;

        let (status, message) = if outcome.ok {
            (CheckStatus::Ok, "Uptime OK".to_string())
        } else {
            let reason = outcome.error.clone().unwrap_or_else(|| {
                outcome
                    .status_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "unknown".to_string())
            });
            (CheckStatus::Error, format!("Uptime check failed: {reason}"))
        };

        self.store
            .append_check_result(NewCheckResult {
                target_id: target.id,
                check_type: CheckType::Uptime,
                status,
                response_time_ms: Some(outcome.response_time_ms),
                message,
                raw_data: Some(serde_json::json!({
                    "statusCode": outcome.status_code,
                    "error": outcome.error,
                })),
                checked_at: now,
            })
            .await?;

        let target_status = if outcome.ok {
            TargetStatus::Online
        } else {
            TargetStatus::Offline
        };
        self.store
            .update_target_status(target.id, target_status)
            .await?;

        if status == CheckStatus::Error {
            self.escalate_if_threshold_met(target).await?;
        }
        Ok(())
    }

    /// Re-reads the latest results (including the one just written) and
    /// escalates when exactly `down_threshold` results exist and all are
    /// errors.
    async fn escalate_if_threshold_met(&self, target: &target::Model) -> Result<(), StoreError> {
        let recent = self
            .store
            .recent_check_results(target.id, CheckType::Uptime, self.down_threshold as u64)
            .await?;

        let threshold_met = recent.len() == self.down_threshold
            && recent
                .iter()
                .all(|c| c.status == CheckStatus::Error.as_str());
        if !threshold_met {
            return Ok(());
        }

        let alert_message = format!(
            "Website {} is down {} times in a row",
            target.domain, self.down_threshold
        );
        escalate(
            self.store.as_ref(),
            target,
            Escalation {
                alert_type: AlertType::UptimeDown,
                alert_message: alert_message.clone(),
                email_subject: format!("[Website Manager] Website down: {}", target.domain),
                system_payload: serde_json::json!({
                    "domain": target.domain,
                    "message": alert_message,
                }),
                webhook_payload: serde_json::json!({
                    "domain": target.domain,
                    "message": alert_message,
                }),
            },
            self.renotify_while_open,
        )
        .await?;
        Ok(())
    }
}
