//! Impact report entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Natural key part 1, unique together with `month`
    #[sea_orm(column_type = "Text")]
    pub ngo_id: String,
    /// Natural key part 2, conventionally YYYY-MM but not enforced
    #[sea_orm(column_type = "Text")]
    pub month: String,
    pub people_helped: i64,
    pub events_conducted: i64,
    #[sea_orm(column_type = "Double")]
    pub funds_utilized: f64,
    /// One of North, South, East, West, All
    pub region: String,
    /// Import job that last wrote this report. Not a foreign key: jobs never own reports.
    pub job_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
