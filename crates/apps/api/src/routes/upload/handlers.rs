use crate::api_state::ApiContext;
use crate::routes::auth::middleware::{ApiUser, OptionalUser};
use app_state::constants;
use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use common_services::api::upload::error::UploadError;
use common_services::api::upload::interfaces::{
    AppendImagesResponse, CreateAlbumInfo, CreatedAlbumResponse, UploadFile,
};
use common_services::api::upload::progress::BatchProgress;
use common_services::api::upload::service::{add_to_album, create_album};
use tracing::debug;

/// Everything pulled out of a multipart upload body: the image files plus
/// any plain-text fields keyed by name.
struct UploadForm {
    files: Vec<UploadFile>,
    info: Option<String>,
    album_id: Option<String>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, UploadError> {
    let mut form = UploadForm {
        files: Vec::new(),
        info: None,
        album_id: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "image" => {
                let file_name = field.file_name().unwrap_or("image").to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| UploadError::BadRequest(format!("Truncated upload: {e}")))?;
                form.files.push(UploadFile {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            "info" => {
                form.info = Some(field.text().await.map_err(|e| {
                    UploadError::BadRequest(format!("Unreadable info field: {e}"))
                })?);
            }
            "albumId" => {
                form.album_id = Some(field.text().await.map_err(|e| {
                    UploadError::BadRequest(format!("Unreadable albumId field: {e}"))
                })?);
            }
            other => {
                debug!("Ignoring unexpected multipart field {other}");
            }
        }
    }

    Ok(form)
}

fn batch_progress(files: &[UploadFile]) -> BatchProgress {
    let sizes: Vec<u64> = files.iter().map(UploadFile::size).collect();
    BatchProgress::new(
        &sizes,
        Box::new(|percent| debug!("Upload batch at {percent}%")),
    )
}

/// Create a new album lobby from a batch of images.
///
/// Multipart body: repeated `image` fields plus an `info` field carrying
/// `{albumName, viewersCanEdit, isFullQuality}` as JSON. Files that fail are
/// reported individually; the ones that succeed are stored in send order.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "Upload",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Album created.", body = CreatedAlbumResponse),
        (status = 400, description = "No usable image, a malformed info field, or too many images."),
        (status = 401, description = "Missing or invalid bearer token."),
        (status = 500, description = "A database or storage error occurred."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_handler(
    State(context): State<ApiContext>,
    ApiUser(session): ApiUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreatedAlbumResponse>), UploadError> {
    let form = read_upload_form(multipart).await?;
    let info: CreateAlbumInfo = match form.info {
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|e| UploadError::BadRequest(format!("Malformed info field: {e}")))?,
        None => return Err(UploadError::BadRequest("Missing info field.".into())),
    };

    let progress = batch_progress(&form.files);
    let created = create_album(
        &context.pool,
        &context.media,
        &constants().uploads,
        constants().database.album_id_length,
        &session,
        info,
        form.files,
        &progress,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Append images to an existing album lobby.
///
/// Multipart body: repeated `image` fields plus an `albumId` field. The
/// owner can always upload; anyone else only while the album allows viewer
/// edits, checked here regardless of what the client already decided. An
/// anonymous upload is accepted under the same policy and recorded without
/// an uploader.
#[utoipa::path(
    post,
    path = "/api/upload-to-album",
    tag = "Upload",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Per-file results.", body = AppendImagesResponse),
        (status = 400, description = "Missing file or albumId, or too many images."),
        (status = 401, description = "Caller may not upload to this album."),
        (status = 403, description = "The album's upload window has closed."),
        (status = 404, description = "Album missing or past its retention window."),
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_to_album_handler(
    State(context): State<ApiContext>,
    OptionalUser(session): OptionalUser,
    multipart: Multipart,
) -> Result<Json<AppendImagesResponse>, UploadError> {
    let form = read_upload_form(multipart).await?;
    let album_id = form
        .album_id
        .ok_or_else(|| UploadError::BadRequest("Missing file or albumId".into()))?;

    let progress = batch_progress(&form.files);
    let appended = add_to_album(
        &context.pool,
        &context.media,
        &context.policy,
        &constants().uploads,
        session.as_ref(),
        &album_id,
        form.files,
        &progress,
    )
    .await?;

    Ok(Json(appended))
}
