pub mod album;
mod api_doc;
pub mod auth;
pub mod media;
pub mod report;
pub mod root;
pub mod upload;
pub mod user;
pub mod waitlist;

use crate::api_state::ApiContext;
use crate::routes::album::router::{album_protected_router, album_public_router};
use crate::routes::api_doc::openapi_json;
use crate::routes::media::router::media_router;
use crate::routes::report::router::report_router;
use crate::routes::root::router::root_public_router;
use crate::routes::upload::router::upload_router;
use crate::routes::user::router::user_router;
use crate::routes::waitlist::router::waitlist_router;
use axum::Router;
use axum::routing::get;

// --- Router Construction ---
pub fn create_router(api_state: ApiContext) -> Router {
    Router::new()
        .route("/openapi.json", get(openapi_json))
        .merge(public_routes())
        .merge(protected_routes())
        .with_state(api_state)
}

/// Routes anyone can hit: the lobby view behind its join code, media blobs,
/// moderation reports, waitlist signups, and the upload endpoints (which do
/// their own per-album authorization).
fn public_routes() -> Router<ApiContext> {
    Router::new()
        .merge(root_public_router())
        .merge(album_public_router())
        .merge(media_router())
        .merge(report_router())
        .merge(waitlist_router())
        .merge(upload_router())
}

/// Routes that only make sense with a verified caller identity.
fn protected_routes() -> Router<ApiContext> {
    Router::new()
        .merge(album_protected_router())
        .merge(user_router())
}
