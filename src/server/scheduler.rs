//! Spawns the periodic services. Each service owns its own interval loop and
//! awaits the sweep body before the next tick, so no sweep kind ever
//! overlaps itself.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

use crate::db::enums::ExpiryKind;
use crate::db::store::{AlertSettingsStore, MonitorStore};
use crate::monitor::expiry::ExpiryCheckService;
use crate::monitor::probe::Prober;
use crate::monitor::uptime::UptimeCheckService;
use crate::notifications::dispatcher::EmailDispatchService;
use crate::notifications::mailer::Mailer;
use crate::server::config::EngineConfig;

pub struct Scheduler {
    uptime: Arc<UptimeCheckService>,
    domain_expiry: Arc<ExpiryCheckService>,
    ssl_expiry: Arc<ExpiryCheckService>,
    dispatcher: Arc<EmailDispatchService>,
    uptime_interval: Duration,
    expiry_interval: Duration,
    dispatch_interval: Duration,
}

impl Scheduler {
    pub fn new(
        config: &EngineConfig,
        store: Arc<dyn MonitorStore>,
        settings: Arc<dyn AlertSettingsStore>,
        prober: Arc<dyn Prober>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let uptime = Arc::new(UptimeCheckService::new(
            store.clone(),
            prober,
            config.consecutive_down_threshold,
            config.renotify_while_open,
        ));
        let domain_expiry = Arc::new(ExpiryCheckService::new(
            store.clone(),
            ExpiryKind::Domain,
            config.expiry_warning_days,
            config.renotify_while_open,
        ));
        let ssl_expiry = Arc::new(ExpiryCheckService::new(
            store.clone(),
            ExpiryKind::Ssl,
            config.expiry_warning_days,
            config.renotify_while_open,
        ));
        let dispatcher = Arc::new(EmailDispatchService::new(
            store,
            settings,
            mailer,
            config.dispatch_batch_size,
            config.alert_email.clone(),
        ));
        Self {
            uptime,
            domain_expiry,
            ssl_expiry,
            dispatcher,
            uptime_interval: Duration::from_secs(config.uptime_check_interval_secs),
            expiry_interval: Duration::from_secs(config.expiry_check_interval_secs),
            dispatch_interval: Duration::from_secs(config.notification_dispatch_interval_secs),
        }
    }

    /// Spawns every periodic service and returns the task handles.
    pub fn spawn(&self) -> Vec<JoinHandle<()>> {
        info!("Starting monitoring engine background services.");
        vec![
            tokio::spawn(
                self.uptime
                    .clone()
                    .start_periodic_sweeps(self.uptime_interval),
            ),
            tokio::spawn(
                self.domain_expiry
                    .clone()
                    .start_periodic_sweeps(self.expiry_interval),
            ),
            tokio::spawn(
                self.ssl_expiry
                    .clone()
                    .start_periodic_sweeps(self.expiry_interval),
            ),
            tokio::spawn(
                self.dispatcher
                    .clone()
                    .start_periodic_dispatch(self.dispatch_interval),
            ),
        ]
    }
}
