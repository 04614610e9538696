use chrono::Utc;
use sea_orm::{
    prelude::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set,
};

use crate::db::entities::alert;
use crate::db::enums::{AlertStatus, AlertType};

/// Finds the open alert for (target, type), if one exists. This is the
/// dedup read of the escalation path.
pub async fn find_open_alert(
    db: &DatabaseConnection,
    target_id: i32,
    alert_type: AlertType,
) -> Result<Option<alert::Model>, DbErr> {
    alert::Entity::find()
        .filter(alert::Column::TargetId.eq(target_id))
        .filter(alert::Column::AlertType.eq(alert_type.as_str()))
        .filter(alert::Column::Status.eq(AlertStatus::Open.as_str()))
        .one(db)
        .await
}

/// Opens a new alert row. Callers must have checked `find_open_alert` first;
/// sweeps are single-flight per kind, so the read-then-create pair cannot
/// race itself.
pub async fn create_alert(
    db: &DatabaseConnection,
    target_id: i32,
    alert_type: AlertType,
    message: &str,
) -> Result<alert::Model, DbErr> {
    let active = alert::ActiveModel {
        target_id: Set(target_id),
        alert_type: Set(alert_type.as_str().to_string()),
        status: Set(AlertStatus::Open.as_str().to_string()),
        message: Set(message.to_string()),
        opened_at: Set(Utc::now()),
        closed_at: Set(None),
        ..Default::default()
    };
    active.insert(db).await
}

/// Closes an open alert. Exposed for external acknowledgement flows; the
/// engine itself never calls this.
pub async fn close_alert(db: &DatabaseConnection, alert_id: i32) -> Result<u64, DbErr> {
    let now = Utc::now();
    let result = alert::Entity::update_many()
        .col_expr(
            alert::Column::Status,
            Expr::value(sea_orm::Value::String(Some(Box::new(
                AlertStatus::Closed.as_str().to_string(),
            )))),
        )
        .col_expr(
            alert::Column::ClosedAt,
            Expr::value(sea_orm::Value::ChronoDateTimeUtc(Some(Box::new(now)))),
        )
        .filter(alert::Column::Id.eq(alert_id))
        .filter(alert::Column::Status.eq(AlertStatus::Open.as_str()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
