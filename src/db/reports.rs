//! Database queries for impact reports.

use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::report::{self, ActiveModel, Entity as Report};
use crate::error::{AppError, AppResult};
use crate::models::{DashboardStats, NewReport, Region};

use super::DbPool;

/// Aggregate row for the dashboard query.
#[derive(Debug, FromQueryResult)]
struct DashboardRow {
    total_ngos: i64,
    total_people_helped: i64,
    total_events_conducted: i64,
    total_funds_utilized: f64,
}

impl DbPool {
    /// Insert or update the report for `(ngo_id, month)` in a single statement.
    ///
    /// An existing report keeps its id and `created_at`; counts, region and
    /// `updated_at` are overwritten. `job_id` is only overwritten when given, so
    /// a manual resubmission does not erase the import that last touched it.
    pub async fn upsert_report(
        &self,
        new_report: &NewReport,
        job_id: Option<Uuid>,
    ) -> AppResult<report::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            ngo_id: Set(new_report.ngo_id.clone()),
            month: Set(new_report.month.clone()),
            people_helped: Set(new_report.people_helped),
            events_conducted: Set(new_report.events_conducted),
            funds_utilized: Set(new_report.funds_utilized),
            region: Set(new_report.region.as_str().to_string()),
            job_id: Set(job_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let mut update_columns = vec![
            report::Column::PeopleHelped,
            report::Column::EventsConducted,
            report::Column::FundsUtilized,
            report::Column::Region,
            report::Column::UpdatedAt,
        ];
        if job_id.is_some() {
            update_columns.push(report::Column::JobId);
        }

        Report::insert(model)
            .on_conflict(
                OnConflict::columns([report::Column::NgoId, report::Column::Month])
                    .update_columns(update_columns)
                    .to_owned(),
            )
            .exec_without_returning(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to upsert report: {}", e)))?;

        self.get_report_by_key(&new_report.ngo_id, &new_report.month)
            .await?
            .ok_or_else(|| {
                AppError::Database(format!(
                    "Report {}/{} missing after upsert",
                    new_report.ngo_id, new_report.month
                ))
            })
    }

    /// Get a report by its natural key.
    pub async fn get_report_by_key(
        &self,
        ngo_id: &str,
        month: &str,
    ) -> AppResult<Option<report::Model>> {
        let result = Report::find()
            .filter(report::Column::NgoId.eq(ngo_id))
            .filter(report::Column::Month.eq(month))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get report: {}", e)))?;

        Ok(result)
    }

    /// Most recently created reports last written by an import job.
    pub async fn get_reports_by_job_id(
        &self,
        job_id: Uuid,
        limit: u64,
    ) -> AppResult<Vec<report::Model>> {
        let result = Report::find()
            .filter(report::Column::JobId.eq(job_id))
            .order_by_desc(report::Column::CreatedAt)
            .order_by_desc(report::Column::Id)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get reports for job: {}", e)))?;

        Ok(result)
    }

    /// Aggregate totals for the dashboard.
    ///
    /// `region == Some(Region::All)` is treated the same as no region filter.
    pub async fn dashboard_stats(
        &self,
        month: Option<&str>,
        region: Option<Region>,
    ) -> AppResult<DashboardStats> {
        let mut select = Report::find().select_only();

        if let Some(month) = month {
            select = select.filter(report::Column::Month.eq(month));
        }

        if let Some(region) = region
            && region != Region::All
        {
            select = select.filter(report::Column::Region.eq(region.as_str()));
        }

        // SUM over BIGINT is NUMERIC on PostgreSQL, so cast back for decoding
        let row = select
            .column_as(Expr::cust("COUNT(*)"), "total_ngos")
            .column_as(
                Expr::cust("CAST(COALESCE(SUM(people_helped), 0) AS BIGINT)"),
                "total_people_helped",
            )
            .column_as(
                Expr::cust("CAST(COALESCE(SUM(events_conducted), 0) AS BIGINT)"),
                "total_events_conducted",
            )
            .column_as(
                Expr::cust("CAST(COALESCE(SUM(funds_utilized), 0) AS DOUBLE PRECISION)"),
                "total_funds_utilized",
            )
            .into_model::<DashboardRow>()
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to aggregate reports: {}", e)))?;

        Ok(row
            .map(|r| DashboardStats {
                total_ngos: r.total_ngos,
                total_people_helped: r.total_people_helped,
                total_events_conducted: r.total_events_conducted,
                total_funds_utilized: r.total_funds_utilized,
            })
            .unwrap_or_default())
    }

    /// Distinct regions present across all reports.
    pub async fn distinct_regions(&self) -> AppResult<Vec<String>> {
        let result = Report::find()
            .select_only()
            .column(report::Column::Region)
            .distinct()
            .order_by_asc(report::Column::Region)
            .into_tuple::<String>()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list regions: {}", e)))?;

        Ok(result)
    }

    /// Count reports for a natural key. Used to check the uniqueness invariant.
    pub async fn count_reports_by_key(&self, ngo_id: &str, month: &str) -> AppResult<u64> {
        use sea_orm::PaginatorTrait;

        let count = Report::find()
            .filter(report::Column::NgoId.eq(ngo_id))
            .filter(report::Column::Month.eq(month))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count reports: {}", e)))?;

        Ok(count)
    }
}
