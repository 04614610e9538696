use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fire-and-forget audit trail entry for operational traceability.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub endpoint: String,
    pub method: String,
    #[sea_orm(column_type = "Text")]
    pub payload: String,
    pub user_agent: String,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
