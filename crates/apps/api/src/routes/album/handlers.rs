use crate::api_state::ApiContext;
use crate::routes::auth::middleware::ApiUser;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use common_services::api::album::error::AlbumError;
use common_services::api::album::interfaces::{
    AlbumDetailsResponse, EditImagesRequest, ReactionRequest, ReactionResponse,
    UpdateAlbumRequest,
};
use common_services::api::album::service::{
    delete_album, edit_images, get_album, join_album, leave_album, react, update_album,
};
use common_services::database::album::ImageRecord;
use tracing::instrument;

/// Get a lobby by its join code.
///
/// Anyone holding the code (typically via the QR deep link) can view; an
/// expired lobby is indistinguishable from a missing one.
#[utoipa::path(
    get,
    path = "/album/{album_id}",
    tag = "Album",
    params(
        ("album_id" = String, Path, description = "The lobby's join code.")
    ),
    responses(
        (status = 200, description = "Album details with its image list.", body = AlbumDetailsResponse),
        (status = 404, description = "Album missing or past its retention window."),
        (status = 500, description = "A database or internal error occurred."),
    )
)]
pub async fn get_album_handler(
    State(context): State<ApiContext>,
    Path(album_id): Path<String>,
) -> Result<Json<AlbumDetailsResponse>, AlbumError> {
    let details = get_album(&context.pool, &context.policy, &album_id, Utc::now()).await?;
    Ok(Json(details))
}

/// Rename an album or toggle whether viewers can add photos. Owner only.
#[utoipa::path(
    patch,
    path = "/album/{album_id}",
    tag = "Album",
    params(
        ("album_id" = String, Path, description = "The lobby's join code.")
    ),
    request_body = UpdateAlbumRequest,
    responses(
        (status = 200, description = "Album updated successfully.", body = AlbumDetailsResponse),
        (status = 403, description = "Caller is not the album owner."),
        (status = 404, description = "Album missing or past its retention window."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_album_handler(
    State(context): State<ApiContext>,
    ApiUser(session): ApiUser,
    Path(album_id): Path<String>,
    Json(payload): Json<UpdateAlbumRequest>,
) -> Result<Json<AlbumDetailsResponse>, AlbumError> {
    let album = update_album(
        &context.pool,
        &context.policy,
        &album_id,
        &session,
        payload,
        Utc::now(),
    )
    .await?;
    Ok(Json(album))
}

/// Delete an album and every stored image blob. Owner only.
#[utoipa::path(
    delete,
    path = "/album/{album_id}",
    tag = "Album",
    params(
        ("album_id" = String, Path, description = "The lobby's join code.")
    ),
    responses(
        (status = 204, description = "Album deleted."),
        (status = 403, description = "Caller is not the album owner."),
        (status = 404, description = "Album not found."),
    ),
    security(("bearer_auth" = []))
)]
#[instrument(skip(context, session))]
pub async fn delete_album_handler(
    State(context): State<ApiContext>,
    ApiUser(session): ApiUser,
    Path(album_id): Path<String>,
) -> Result<StatusCode, AlbumError> {
    delete_album(&context.pool, &context.media, &album_id, &session).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reorder and/or remove images. Owner only.
///
/// The new order must name every surviving image exactly once; removed
/// images lose their blobs.
#[utoipa::path(
    put,
    path = "/album/{album_id}/images",
    tag = "Album",
    params(
        ("album_id" = String, Path, description = "The lobby's join code.")
    ),
    request_body = EditImagesRequest,
    responses(
        (status = 200, description = "The new image list, in display order.", body = Vec<ImageRecord>),
        (status = 400, description = "The order is not a permutation of the remaining images."),
        (status = 403, description = "Caller is not the album owner."),
        (status = 404, description = "Album missing or past its retention window."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn edit_images_handler(
    State(context): State<ApiContext>,
    ApiUser(session): ApiUser,
    Path(album_id): Path<String>,
    Json(payload): Json<EditImagesRequest>,
) -> Result<Json<Vec<ImageRecord>>, AlbumError> {
    let images = edit_images(
        &context.pool,
        &context.policy,
        &context.media,
        &album_id,
        &session,
        payload,
        Utc::now(),
    )
    .await?;
    Ok(Json(images))
}

/// Toggle the caller's reaction on one image.
///
/// Re-sending the held symbol, or sending "like", clears it; any other
/// symbol replaces it. Returns the digest shown under the image.
#[utoipa::path(
    post,
    path = "/album/{album_id}/images/{index}/reaction",
    tag = "Album",
    params(
        ("album_id" = String, Path, description = "The lobby's join code."),
        ("index" = usize, Path, description = "Position of the image in the display order.")
    ),
    request_body = ReactionRequest,
    responses(
        (status = 200, description = "The updated reaction digest.", body = ReactionResponse),
        (status = 404, description = "Album or image index not found."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn react_handler(
    State(context): State<ApiContext>,
    ApiUser(session): ApiUser,
    Path((album_id, index)): Path<(String, usize)>,
    Json(payload): Json<ReactionRequest>,
) -> Result<Json<ReactionResponse>, AlbumError> {
    let response = react(
        &context.pool,
        &context.policy,
        &album_id,
        index,
        &session,
        &payload.reaction,
        Utc::now(),
    )
    .await?;
    Ok(Json(response))
}

/// Bookmark a lobby for the caller. Scanning the QR deep link lands here.
#[utoipa::path(
    post,
    path = "/album/{album_id}/join",
    tag = "Album",
    params(
        ("album_id" = String, Path, description = "The lobby's join code.")
    ),
    responses(
        (status = 204, description = "Album joined (idempotent)."),
        (status = 404, description = "Album missing or past its retention window."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn join_album_handler(
    State(context): State<ApiContext>,
    ApiUser(session): ApiUser,
    Path(album_id): Path<String>,
) -> Result<StatusCode, AlbumError> {
    join_album(&context.pool, &context.policy, &session, &album_id, Utc::now()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Drop a lobby from the caller's joined list.
#[utoipa::path(
    delete,
    path = "/album/{album_id}/join",
    tag = "Album",
    params(
        ("album_id" = String, Path, description = "The lobby's join code.")
    ),
    responses(
        (status = 204, description = "Album removed from the joined list."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn leave_album_handler(
    State(context): State<ApiContext>,
    ApiUser(session): ApiUser,
    Path(album_id): Path<String>,
) -> Result<StatusCode, AlbumError> {
    leave_album(&context.pool, &session, &album_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
