//! Check executors: the uptime prober and the parameterized expiry sweeps,
//! plus the shared escalation path that opens alerts and enqueues
//! notifications.

pub mod escalation;
pub mod expiry;
pub mod probe;
pub mod uptime;
