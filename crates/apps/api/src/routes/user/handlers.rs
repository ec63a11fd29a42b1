use crate::api_state::ApiContext;
use crate::routes::auth::middleware::ApiUser;
use axum::Json;
use axum::extract::State;
use chrono::Utc;
use common_services::api::album::error::AlbumError;
use common_services::api::album::interfaces::AlbumSummary;
use common_services::api::album::service::{list_joined, list_owned};

/// List the caller's own lobbies, newest first. Expired lobbies are gone.
#[utoipa::path(
    get,
    path = "/user/albums",
    tag = "User",
    responses(
        (status = 200, description = "The caller's albums.", body = Vec<AlbumSummary>),
        (status = 401, description = "Missing or invalid bearer token."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_my_albums_handler(
    State(context): State<ApiContext>,
    ApiUser(session): ApiUser,
) -> Result<Json<Vec<AlbumSummary>>, AlbumError> {
    let albums = list_owned(&context.pool, &context.policy, &session, Utc::now()).await?;
    Ok(Json(albums))
}

/// List the lobbies the caller has joined. Expired and deleted lobbies drop
/// out of the list silently.
#[utoipa::path(
    get,
    path = "/user/joined-albums",
    tag = "User",
    responses(
        (status = 200, description = "The caller's joined albums.", body = Vec<AlbumSummary>),
        (status = 401, description = "Missing or invalid bearer token."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_joined_albums_handler(
    State(context): State<ApiContext>,
    ApiUser(session): ApiUser,
) -> Result<Json<Vec<AlbumSummary>>, AlbumError> {
    let albums = list_joined(&context.pool, &context.policy, &session, Utc::now()).await?;
    Ok(Json(albums))
}
