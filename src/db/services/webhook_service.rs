use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

use crate::db::entities::webhook;
use crate::db::enums::AlertType;

/// Lists the active webhook subscriptions registered for one event.
pub async fn list_active_webhooks(
    db: &DatabaseConnection,
    event: AlertType,
) -> Result<Vec<webhook::Model>, DbErr> {
    webhook::Entity::find()
        .filter(webhook::Column::IsActive.eq(true))
        .filter(webhook::Column::Event.eq(event.as_str()))
        .all(db)
        .await
}
