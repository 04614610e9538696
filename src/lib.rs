//! Monitoring engine for websites and domains: periodic uptime, domain
//! expiry, and TLS certificate expiry sweeps, deduplicated alerting, and
//! queued notification delivery.

pub mod db;
pub mod monitor;
pub mod notifications;
pub mod server;
