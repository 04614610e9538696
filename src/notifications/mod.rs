//! Outbound notification delivery: the mail transport seam and the periodic
//! dispatcher that drains the pending email queue.

pub mod dispatcher;
pub mod mailer;
