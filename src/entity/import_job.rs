//! CSV import job entity for SeaORM.

use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "import_jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// pending, processing, completed, failed
    pub status: String,
    pub total_rows: i64,
    pub processed_rows: i64,
    pub failed_rows: i64,
    /// Ordered list of row errors: [{row, message, data}]
    #[sea_orm(column_type = "Json")]
    pub errors: JsonValue,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
