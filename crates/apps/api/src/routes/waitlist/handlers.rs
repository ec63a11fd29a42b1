use crate::api_state::ApiContext;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use common_services::api::waitlist::error::WaitlistError;
use common_services::api::waitlist::interfaces::JoinWaitlistRequest;
use common_services::api::waitlist::service::join_waitlist;
use common_services::database::waitlist::WaitlistEntry;

/// Sign up for the waitlist, optionally noting which lobby the visitor came
/// from.
#[utoipa::path(
    post,
    path = "/waitlist",
    tag = "Waitlist",
    request_body = JoinWaitlistRequest,
    responses(
        (status = 201, description = "Signed up.", body = WaitlistEntry),
        (status = 400, description = "Missing email."),
        (status = 500, description = "A database error occurred."),
    )
)]
pub async fn join_waitlist_handler(
    State(context): State<ApiContext>,
    Json(payload): Json<JoinWaitlistRequest>,
) -> Result<(StatusCode, Json<WaitlistEntry>), WaitlistError> {
    let entry = join_waitlist(&context.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
