use importer::{IngestionReport, IngestionTarget, TargetReport};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct RunIngestionRequest {
    /// Any of `historical`, `drivers`, `constructors`. Empty or absent runs all three.
    #[serde(default)]
    #[schema(value_type = Vec<String>, example = json!(["drivers", "constructors"]))]
    pub targets: Vec<IngestionTarget>,

    /// Season to fetch, defaults to the configured one
    #[validate(range(min = 1950, max = 2100, message = "season must be between 1950 and 2100"))]
    pub season: Option<i32>,

    #[serde(default)]
    pub dry_run: bool,
}

impl RunIngestionRequest {
    pub fn targets(&self) -> Vec<IngestionTarget> {
        if self.targets.is_empty() {
            IngestionTarget::ALL.to_vec()
        } else {
            self.targets.clone()
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TargetReportResponse {
    pub target: String,
    pub inserted: usize,
    pub updated: usize,
    pub deactivated: usize,
    pub unchanged: usize,
    pub error: Option<String>,
}

impl From<TargetReport> for TargetReportResponse {
    fn from(report: TargetReport) -> Self {
        Self {
            target: report.target.to_string(),
            inserted: report.summary.inserted,
            updated: report.summary.updated,
            deactivated: report.summary.deactivated,
            unchanged: report.summary.unchanged,
            error: report.error,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IngestionReportResponse {
    pub season: i32,
    pub dry_run: bool,
    pub success: bool,
    pub targets: Vec<TargetReportResponse>,
}

impl From<IngestionReport> for IngestionReportResponse {
    fn from(report: IngestionReport) -> Self {
        Self {
            success: report.is_success(),
            season: report.season,
            dry_run: report.dry_run,
            targets: report.targets.into_iter().map(TargetReportResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IngestionStatusResponse {
    pub running: bool,
    pub default_season: i32,
}
