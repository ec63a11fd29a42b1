use crate::api_state::ApiContext;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use common_services::api::report::error::ReportError;
use common_services::api::report::interfaces::CreateReportRequest;
use common_services::api::report::service::create_report;
use common_services::database::report::Report;

/// File a moderation report against an album. No login required; reporters
/// leave a contact address for follow-up.
#[utoipa::path(
    post,
    path = "/report",
    tag = "Moderation",
    request_body = CreateReportRequest,
    responses(
        (status = 201, description = "Report created.", body = Report),
        (status = 400, description = "Missing contact email or description."),
        (status = 500, description = "A database error occurred."),
    )
)]
pub async fn create_report_handler(
    State(context): State<ApiContext>,
    Json(payload): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<Report>), ReportError> {
    let report = create_report(&context.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(report)))
}
