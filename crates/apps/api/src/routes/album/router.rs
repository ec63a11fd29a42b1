use crate::api_state::ApiContext;
use crate::routes::album::handlers::{
    delete_album_handler, edit_images_handler, get_album_handler, join_album_handler,
    leave_album_handler, react_handler, update_album_handler,
};
use axum::Router;
use axum::routing::{get, patch, post, put};

pub fn album_public_router() -> Router<ApiContext> {
    Router::new().route("/album/{album_id}", get(get_album_handler))
}

pub fn album_protected_router() -> Router<ApiContext> {
    Router::new()
        .route(
            "/album/{album_id}",
            patch(update_album_handler).delete(delete_album_handler),
        )
        .route("/album/{album_id}/images", put(edit_images_handler))
        .route(
            "/album/{album_id}/images/{index}/reaction",
            post(react_handler),
        )
        .route(
            "/album/{album_id}/join",
            post(join_album_handler).delete(leave_album_handler),
        )
}
