//! Impact report domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::report;

/// Region an NGO reports for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Region {
    North,
    #[default]
    South,
    East,
    West,
    All,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
            Self::All => "All",
        }
    }

    /// Parse a region name, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "north" => Some(Self::North),
            "south" => Some(Self::South),
            "east" => Some(Self::East),
            "west" => Some(Self::West),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated report ready to be written, keyed by `(ngo_id, month)`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub ngo_id: String,
    pub month: String,
    pub people_helped: i64,
    pub events_conducted: i64,
    pub funds_utilized: f64,
    pub region: Region,
}

/// Stored report as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Report UUID.
    pub id: Uuid,
    /// NGO identifier.
    pub ngo_id: String,
    /// Reporting month (YYYY-MM).
    pub month: String,
    pub people_helped: i64,
    pub events_conducted: i64,
    pub funds_utilized: f64,
    /// Region name (North, South, East, West, All).
    pub region: String,
    /// Import job that last wrote this report, if any.
    pub job_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<report::Model> for Report {
    fn from(m: report::Model) -> Self {
        Self {
            id: m.id,
            ngo_id: m.ngo_id,
            month: m.month,
            people_helped: m.people_helped,
            events_conducted: m.events_conducted,
            funds_utilized: m.funds_utilized,
            region: m.region,
            job_id: m.job_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Request body for submitting a single report.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportRequest {
    pub ngo_id: Option<String>,
    pub month: Option<String>,
    #[serde(default)]
    pub people_helped: Option<i64>,
    #[serde(default)]
    pub events_conducted: Option<i64>,
    #[serde(default)]
    pub funds_utilized: Option<f64>,
    #[serde(default)]
    pub region: Option<String>,
}

/// Response after submitting a single report.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitReportResponse {
    pub message: String,
    pub report: Report,
}

/// Dashboard filter parameters.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DashboardQuery {
    /// Only include reports for this month (YYYY-MM).
    #[serde(default)]
    pub month: Option<String>,
    /// Only include reports for this region. `All` disables the filter.
    #[serde(default)]
    pub region: Option<String>,
}

/// Aggregated totals across matching reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Number of matching reports.
    #[serde(rename = "totalNGOs")]
    pub total_ngos: i64,
    pub total_people_helped: i64,
    pub total_events_conducted: i64,
    pub total_funds_utilized: f64,
}

/// Dashboard response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    /// Distinct regions present across all reports, for filter menus.
    pub regions: Vec<String>,
}
