use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};

use crate::db::entities::activity_log;
use crate::db::models::NewActivityLog;

/// Appends one audit trail entry. Callers treat this as fire-and-forget.
pub async fn append_activity_log(
    db: &DatabaseConnection,
    input: NewActivityLog,
) -> Result<(), DbErr> {
    let active = activity_log::ActiveModel {
        endpoint: Set(input.endpoint),
        method: Set(input.method),
        payload: Set(input.payload),
        user_agent: Set(input.user_agent),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    active.insert(db).await?;
    Ok(())
}
