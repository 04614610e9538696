use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::db::entities::check_result;
use crate::db::enums::CheckType;
use crate::db::models::NewCheckResult;

/// Appends one immutable check result row and returns its id.
pub async fn append_check_result(
    db: &DatabaseConnection,
    input: NewCheckResult,
) -> Result<i32, DbErr> {
    let active = check_result::ActiveModel {
        target_id: Set(input.target_id),
        check_type: Set(input.check_type.as_str().to_string()),
        status: Set(input.status.as_str().to_string()),
        response_time_ms: Set(input.response_time_ms),
        message: Set(input.message),
        raw_data: Set(input.raw_data),
        checked_at: Set(input.checked_at),
        ..Default::default()
    };
    let model = active.insert(db).await?;
    Ok(model.id)
}

/// Fetches the most recent results of one check type for a target, newest
/// first by `checked_at`.
pub async fn recent_check_results(
    db: &DatabaseConnection,
    target_id: i32,
    check_type: CheckType,
    limit: u64,
) -> Result<Vec<check_result::Model>, DbErr> {
    check_result::Entity::find()
        .filter(check_result::Column::TargetId.eq(target_id))
        .filter(check_result::Column::CheckType.eq(check_type.as_str()))
        .order_by_desc(check_result::Column::CheckedAt)
        .limit(limit)
        .all(db)
        .await
}
