//! SeaORM entities mapping the monitoring tables.
//!
//! Each entity lives in its own module. The engine never deletes targets or
//! rewrites check results; mutation surfaces are limited to what the store
//! services expose.

pub mod activity_log;
pub mod alert;
pub mod check_result;
pub mod notification;
pub mod setting;
pub mod target;
pub mod user;
pub mod webhook;

pub mod prelude {
    pub use super::activity_log::Entity as ActivityLog;
    pub use super::alert::Entity as Alert;
    pub use super::check_result::Entity as CheckResult;
    pub use super::notification::Entity as Notification;
    pub use super::setting::Entity as Setting;
    pub use super::target::Entity as Target;
    pub use super::user::Entity as User;
    pub use super::webhook::Entity as Webhook;
}
