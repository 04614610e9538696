use chrono::Utc;
use sea_orm::{
    prelude::Expr, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};

use crate::db::entities::{target, user};
use crate::db::enums::{ExpiryKind, TargetStatus};

/// Lists all targets with monitoring enabled.
pub async fn list_monitored_targets(
    db: &DatabaseConnection,
) -> Result<Vec<target::Model>, DbErr> {
    target::Entity::find()
        .filter(target::Column::MonitoringEnabled.eq(true))
        .all(db)
        .await
}

/// Lists monitored targets that carry the expiry date relevant to `kind`.
pub async fn list_monitored_targets_with_expiry(
    db: &DatabaseConnection,
    kind: ExpiryKind,
) -> Result<Vec<target::Model>, DbErr> {
    let expiry_column = match kind {
        ExpiryKind::Domain => target::Column::DomainExpiryDate,
        ExpiryKind::Ssl => target::Column::SslExpiryDate,
    };
    target::Entity::find()
        .filter(target::Column::MonitoringEnabled.eq(true))
        .filter(expiry_column.is_not_null())
        .all(db)
        .await
}

/// Stamps the availability status of a target.
pub async fn update_target_status(
    db: &DatabaseConnection,
    target_id: i32,
    status: TargetStatus,
) -> Result<u64, DbErr> {
    let now = Utc::now();
    let result = target::Entity::update_many()
        .col_expr(
            target::Column::Status,
            Expr::value(sea_orm::Value::String(Some(Box::new(
                status.as_str().to_string(),
            )))),
        )
        .col_expr(
            target::Column::UpdatedAt,
            Expr::value(sea_orm::Value::ChronoDateTimeUtc(Some(Box::new(now)))),
        )
        .filter(target::Column::Id.eq(target_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Resolves the email of the target's registered owner, if any.
pub async fn get_owner_email(
    db: &DatabaseConnection,
    target_id: i32,
) -> Result<Option<String>, DbErr> {
    let target_model = target::Entity::find_by_id(target_id).one(db).await?;
    let Some(owner_id) = target_model.and_then(|t| t.owner_id) else {
        return Ok(None);
    };
    let owner = user::Entity::find_by_id(owner_id).one(db).await?;
    Ok(owner.map(|u| u.email))
}
