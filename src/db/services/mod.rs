//! The `services` module provides a high-level API for interacting with the
//! database. It encapsulates the query logic so the monitoring engine can
//! work with domain models without knowing the underlying schema.
//!
//! Each sub-module covers one domain entity. Public functions are re-exported
//! here for convenient access under `crate::db::services::`.

pub mod activity_log_service;
pub mod alert_service;
pub mod check_result_service;
pub mod notification_service;
pub mod settings_service;
pub mod target_service;
pub mod webhook_service;

pub use activity_log_service::*;
pub use alert_service::*;
pub use check_result_service::*;
pub use notification_service::*;
pub use settings_service::*;
pub use target_service::*;
pub use webhook_service::*;
