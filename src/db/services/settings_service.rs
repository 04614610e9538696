use chrono::Utc;
use sea_orm::{
    sea_query::OnConflict, DatabaseConnection, DbErr, EntityTrait, Set,
};

use crate::db::entities::setting;
use crate::db::models::AlertSettings;

/// Settings table key under which the alert settings document lives.
pub const ALERT_SETTINGS_KEY: &str = "alert_settings";

/// Reads the alert settings singleton. A missing or malformed document is
/// treated as empty settings so a bad write can never wedge the dispatcher.
pub async fn get_alert_settings(db: &DatabaseConnection) -> Result<AlertSettings, DbErr> {
    let row = setting::Entity::find_by_id(ALERT_SETTINGS_KEY.to_owned())
        .one(db)
        .await?;
    Ok(row
        .map(|s| serde_json::from_value(s.value).unwrap_or_default())
        .unwrap_or_default())
}

/// Creates or replaces the alert settings document.
pub async fn update_alert_settings(
    db: &DatabaseConnection,
    settings: AlertSettings,
) -> Result<AlertSettings, DbErr> {
    let value = serde_json::to_value(&settings)
        .map_err(|e| DbErr::Custom(format!("failed to serialize alert settings: {e}")))?;
    let active = setting::ActiveModel {
        key: Set(ALERT_SETTINGS_KEY.to_owned()),
        value: Set(value),
        updated_at: Set(Utc::now()),
    };
    setting::Entity::insert(active)
        .on_conflict(
            OnConflict::column(setting::Column::Key)
                .update_columns([setting::Column::Value, setting::Column::UpdatedAt])
                .to_owned(),
        )
        .exec(db)
        .await?;
    Ok(settings)
}
