use crate::api_state::ApiContext;
use axum::body::Body;
use axum::extract::{Path, State};
use color_eyre::eyre::Report;
use http::{Response, StatusCode, header};
use common_services::api::album::error::AlbumError;
use tokio::fs::File;
use tokio_util::codec::{BytesCodec, FramedRead};
use tracing::{debug, warn};

/// Stream a stored album image.
///
/// Blob names are immutable, so responses carry a long-lived cache header.
#[utoipa::path(
    get,
    path = "/media/albums/{album_id}/{file_name}",
    tag = "Media",
    params(
        ("album_id" = String, Path, description = "The lobby's join code."),
        ("file_name" = String, Path, description = "The stored blob name, e.g. `<image_id>.jpg`.")
    ),
    responses(
        (status = 200, description = "The image bytes."),
        (status = 400, description = "The path escapes the media root."),
        (status = 404, description = "No such blob."),
    )
)]
pub async fn download_media_handler(
    State(context): State<ApiContext>,
    Path((album_id, file_name)): Path<(String, String)>,
) -> Result<Response<Body>, AlbumError> {
    // Path extraction already splits on '/', but reject anything that could
    // still walk out of the media root.
    if !is_safe_segment(&album_id) || !is_safe_segment(&file_name) {
        warn!("Blocked traversal attempt: {album_id}/{file_name}");
        return Err(AlbumError::BadRequest("Invalid media path.".to_owned()));
    }

    let file_path = context
        .media
        .media_root()
        .join("albums")
        .join(&album_id)
        .join(&file_name);

    let file = match File::open(&file_path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Blob not found: {}", file_path.display());
            return Err(AlbumError::NotFound(format!("{album_id}/{file_name}")));
        }
        Err(e) => {
            return Err(AlbumError::Internal(
                Report::new(e).wrap_err("Failed to open media file"),
            ));
        }
    };

    let stream = FramedRead::new(file, BytesCodec::new());
    let body = Body::from_stream(stream);
    let mime_type = mime_guess::from_path(&file_path).first_or_octet_stream();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime_type.as_ref())
        .header(
            header::CACHE_CONTROL,
            "public, max-age=31536000, immutable",
        )
        .body(body)
        .map_err(|e| AlbumError::Internal(Report::new(e).wrap_err("Failed to build response")))
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\'])
        && !segment.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::is_safe_segment;

    #[test]
    fn rejects_traversal_segments() {
        assert!(is_safe_segment("a1b2c3"));
        assert!(is_safe_segment("0b69bd7e-3f1a-4f6e-9c27-5a1a.jpg"));
        assert!(!is_safe_segment(".."));
        assert!(!is_safe_segment("."));
        assert!(!is_safe_segment(""));
        assert!(!is_safe_segment("a/b"));
        assert!(!is_safe_segment("a\\b"));
        assert!(!is_safe_segment("a\0b"));
    }
}
