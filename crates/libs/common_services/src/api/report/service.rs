use crate::api::report::error::ReportError;
use crate::api::report::interfaces::CreateReportRequest;
use crate::database::report::Report;
use crate::database::report_store::ReportStore;
use sqlx::PgPool;
use tracing::{info, instrument};

/// File a moderation ticket against an album. Reports are accepted even for
/// albums that no longer resolve, so evidence of removed content survives.
#[instrument(skip(pool))]
pub async fn create_report(
    pool: &PgPool,
    payload: CreateReportRequest,
) -> Result<Report, ReportError> {
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err(ReportError::BadRequest(
            "A contact email is required.".to_owned(),
        ));
    }
    if payload.description.trim().is_empty() {
        return Err(ReportError::BadRequest(
            "A description is required.".to_owned(),
        ));
    }

    let report = ReportStore::create(
        pool,
        &payload.album_id,
        payload.email.trim(),
        payload.description.trim(),
    )
    .await?;

    info!("Created report {} for album {}", report.id, report.album_id);
    Ok(report)
}
