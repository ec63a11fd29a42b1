use crate::api_state::ApiContext;
use crate::routes::waitlist::handlers::join_waitlist_handler;
use axum::Router;
use axum::routing::post;

pub fn waitlist_router() -> Router<ApiContext> {
    Router::new().route("/waitlist", post(join_waitlist_handler))
}
