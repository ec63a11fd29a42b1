use crate::api_state::ApiContext;
use crate::routes::upload::handlers::{upload_handler, upload_to_album_handler};
use axum::Router;
use axum::routing::post;

pub fn upload_router() -> Router<ApiContext> {
    Router::new()
        .route("/api/upload", post(upload_handler))
        .route("/api/upload-to-album", post(upload_to_album_handler))
}
