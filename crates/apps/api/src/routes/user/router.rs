use crate::api_state::ApiContext;
use crate::routes::user::handlers::{get_joined_albums_handler, get_my_albums_handler};
use axum::Router;
use axum::routing::get;

pub fn user_router() -> Router<ApiContext> {
    Router::new()
        .route("/user/albums", get(get_my_albums_handler))
        .route("/user/joined-albums", get(get_joined_albums_handler))
}
