use crate::api_state::ApiContext;
use crate::routes::report::handlers::create_report_handler;
use axum::Router;
use axum::routing::post;

pub fn report_router() -> Router<ApiContext> {
    Router::new().route("/report", post(create_report_handler))
}
