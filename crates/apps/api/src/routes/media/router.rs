use crate::api_state::ApiContext;
use crate::routes::media::handlers::download_media_handler;
use axum::Router;
use axum::routing::get;

pub fn media_router() -> Router<ApiContext> {
    Router::new().route(
        "/media/albums/{album_id}/{file_name}",
        get(download_media_handler),
    )
}
