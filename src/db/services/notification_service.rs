use chrono::{DateTime, Utc};
use sea_orm::{
    prelude::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::db::entities::notification;
use crate::db::enums::{NotificationChannel, NotificationStatus};
use crate::db::models::NewNotification;

/// Enqueues one pending notification.
pub async fn create_notification(
    db: &DatabaseConnection,
    input: NewNotification,
) -> Result<notification::Model, DbErr> {
    let active = notification::ActiveModel {
        target_id: Set(input.target_id),
        alert_type: Set(input.alert_type.as_str().to_string()),
        channel: Set(input.channel.as_str().to_string()),
        payload: Set(input.payload),
        status: Set(NotificationStatus::Pending.as_str().to_string()),
        created_at: Set(Utc::now()),
        sent_at: Set(None),
        ..Default::default()
    };
    active.insert(db).await
}

/// Fetches up to `limit` pending notifications for one channel, oldest first.
pub async fn list_pending_notifications(
    db: &DatabaseConnection,
    channel: NotificationChannel,
    limit: u64,
) -> Result<Vec<notification::Model>, DbErr> {
    notification::Entity::find()
        .filter(notification::Column::Channel.eq(channel.as_str()))
        .filter(notification::Column::Status.eq(NotificationStatus::Pending.as_str()))
        .order_by_asc(notification::Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await
}

/// Moves a pending notification into a terminal state. The pending filter
/// guarantees the terminal transition happens at most once.
pub async fn mark_notification(
    db: &DatabaseConnection,
    id: i32,
    status: NotificationStatus,
    sent_at: Option<DateTime<Utc>>,
) -> Result<u64, DbErr> {
    let result = notification::Entity::update_many()
        .col_expr(
            notification::Column::Status,
            Expr::value(sea_orm::Value::String(Some(Box::new(
                status.as_str().to_string(),
            )))),
        )
        .col_expr(
            notification::Column::SentAt,
            Expr::value(sea_orm::Value::ChronoDateTimeUtc(sent_at.map(Box::new))),
        )
        .filter(notification::Column::Id.eq(id))
        .filter(notification::Column::Status.eq(NotificationStatus::Pending.as_str()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
