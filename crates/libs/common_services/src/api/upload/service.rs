use crate::api::auth::interfaces::AuthSession;
use crate::api::upload::error::UploadError;
use crate::api::upload::interfaces::{
    AppendImagesResponse, CreateAlbumInfo, CreatedAlbumResponse, UploadFailure, UploadFile,
    UploadProfile,
};
use crate::api::upload::progress::BatchProgress;
use crate::database::album::{Album, ImageRecord};
use crate::database::album_store::AlbumStore;
use crate::media_store::MediaStore;
use crate::retention::RetentionPolicy;
use crate::utils::nice_id;
use app_state::UploadConstants;
use chrono::Utc;
use color_eyre::eyre::eyre;
use futures_util::future::join_all;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Decode, optionally downscale, and re-encode an incoming image as JPEG.
pub fn process_image(file: &UploadFile, profile: &UploadProfile) -> Result<Vec<u8>, UploadError> {
    let decoded =
        image::load_from_memory(&file.bytes).map_err(|e| UploadError::InvalidImage {
            name: file.file_name.clone(),
            reason: e.to_string(),
        })?;

    let scaled = match profile.max_dimension {
        Some(max) if decoded.width().max(decoded.height()) > max => {
            decoded.resize(max, max, FilterType::Lanczos3)
        }
        _ => decoded,
    };

    // JPEG has no alpha channel.
    let rgb = scaled.to_rgb8();
    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, profile.quality);
    encoder
        .encode_image(&rgb)
        .map_err(|e| UploadError::Internal(eyre!("JPEG encoding failed: {e}")))?;
    Ok(out)
}

/// Re-encode and store a batch of files, one result per input file, in input
/// order no matter which uploads finish first. A file failing does not stop
/// the others.
#[instrument(skip_all, fields(album_id = %album_id, files = files.len()))]
pub async fn upload_batch(
    media: &MediaStore,
    album_id: &str,
    uploader_id: Option<&str>,
    files: Vec<UploadFile>,
    profile: UploadProfile,
    progress: &BatchProgress,
) -> Vec<(String, Result<ImageRecord, UploadError>)> {
    let tasks = files.into_iter().enumerate().map(|(index, file)| {
        let file_name = file.file_name.clone();
        async move {
            let result = upload_one(media, album_id, uploader_id, index, file, profile, progress)
                .await;
            if result.is_ok() {
                progress.on_complete(index);
            }
            (file_name, result)
        }
    });

    join_all(tasks).await
}

async fn upload_one(
    media: &MediaStore,
    album_id: &str,
    uploader_id: Option<&str>,
    index: usize,
    file: UploadFile,
    profile: UploadProfile,
    progress: &BatchProgress,
) -> Result<ImageRecord, UploadError> {
    let input_size = file.size();
    if input_size > profile.max_file_bytes {
        return Err(UploadError::FileTooLarge(file.file_name));
    }

    // Decoding and re-encoding are CPU-bound.
    let encoded = tokio::task::spawn_blocking(move || process_image(&file, &profile))
        .await
        .map_err(|e| UploadError::Internal(eyre!("Image worker panicked: {e}")))??;

    let image_id = Uuid::new_v4().to_string();
    let image_url = media
        .save(album_id, &image_id, &encoded, |written, total| {
            // Progress is measured against the original file sizes, so scale
            // the encoded write position back onto the input size.
            let scaled = input_size * written / total.max(1);
            progress.on_progress(index, scaled);
        })
        .await
        .map_err(|e| {
            warn!("Failed to store blob for {album_id}: {e:?}");
            UploadError::Storage(image_id.clone())
        })?;

    Ok(ImageRecord {
        id: image_id,
        image_url,
        uploader_id: uploader_id.map(ToOwned::to_owned),
        uploaded_on: Utc::now(),
        reactions: Vec::new(),
        reaction_string: String::new(),
    })
}

fn split_results(
    results: Vec<(String, Result<ImageRecord, UploadError>)>,
) -> (Vec<ImageRecord>, Vec<UploadFailure>) {
    let mut images = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (file_name, result) in results {
        match result {
            Ok(record) => images.push(record),
            Err(error) => failures.push(UploadFailure {
                file_name,
                error: error.to_string(),
            }),
        }
    }
    (images, failures)
}

/// Create a new album from a batch of files.
///
/// The join code is regenerated until it is unique. Files that fail are
/// reported individually; the album is only created if at least one image
/// landed, and `first_upload_on` starts the retention clock at that moment.
#[instrument(skip(pool, media, uploads, session, files, progress))]
pub async fn create_album(
    pool: &PgPool,
    media: &MediaStore,
    uploads: &UploadConstants,
    album_id_length: usize,
    session: &AuthSession,
    info: CreateAlbumInfo,
    files: Vec<UploadFile>,
    progress: &BatchProgress,
) -> Result<CreatedAlbumResponse, UploadError> {
    if info.album_name.trim().is_empty() {
        return Err(UploadError::BadRequest("Album name is required.".into()));
    }
    if files.is_empty() {
        return Err(UploadError::BadRequest(
            "Please select images to upload.".into(),
        ));
    }
    if files.len() > uploads.max_album_images {
        return Err(UploadError::TooManyImages(uploads.max_album_images));
    }

    let album_id = loop {
        let candidate = nice_id(album_id_length);
        if !AlbumStore::exists(pool, &candidate).await? {
            break candidate;
        }
    };

    let profile = UploadProfile::for_create(uploads, info.is_full_quality);
    let results = upload_batch(
        media,
        &album_id,
        Some(&session.user_id),
        files,
        profile,
        progress,
    )
    .await;
    let (images, failures) = split_results(results);

    if images.is_empty() {
        return Err(UploadError::BadRequest(format!(
            "No image could be uploaded ({} failed).",
            failures.len()
        )));
    }

    let now = Utc::now();
    let album = Album {
        id: album_id,
        owner_id: session.user_id.clone(),
        name: info.album_name.trim().to_owned(),
        viewers_can_edit: info.viewers_can_edit,
        is_full_quality: info.is_full_quality,
        created_on: now,
        first_upload_on: Some(now),
        image_list: images,
    };
    AlbumStore::create(pool, &album).await?;

    info!(
        "Created album {} with {} images ({} failed)",
        album.id,
        album.image_list.len(),
        failures.len()
    );

    Ok(CreatedAlbumResponse {
        album_id: album.id,
        image_list: album.image_list,
        failures,
    })
}

/// Append a batch of files to an existing album.
///
/// The owner can always upload; anyone else only while the album allows
/// viewer edits. The endpoint re-checks this server-side regardless of what
/// the client already verified. Appending is a locked read-modify-write, and
/// the first successful upload starts the retention clock.
#[instrument(skip(pool, media, policy, uploads, session, files, progress))]
pub async fn add_to_album(
    pool: &PgPool,
    media: &MediaStore,
    policy: &RetentionPolicy,
    uploads: &UploadConstants,
    session: Option<&AuthSession>,
    album_id: &str,
    files: Vec<UploadFile>,
    progress: &BatchProgress,
) -> Result<AppendImagesResponse, UploadError> {
    let album = AlbumStore::find_by_id(pool, album_id)
        .await?
        .ok_or_else(|| UploadError::NotFound(album_id.to_owned()))?;

    let now = Utc::now();
    let window = policy.window(
        now.timestamp_millis(),
        album.created_on.timestamp_millis(),
        album.first_upload_on.map(|t| t.timestamp_millis()),
    );
    if window.expired {
        return Err(UploadError::NotFound(album_id.to_owned()));
    }
    if window.locked {
        return Err(UploadError::WindowClosed(album_id.to_owned()));
    }

    let is_owner = session.is_some_and(|s| s.user_id == album.owner_id);
    if !is_owner && !album.viewers_can_edit {
        return Err(UploadError::Unauthorized(
            "Unauthorized to upload photos".into(),
        ));
    }

    if files.is_empty() {
        return Err(UploadError::BadRequest(
            "Please select images to upload.".into(),
        ));
    }
    if album.image_list.len() + files.len() > uploads.max_album_images {
        return Err(UploadError::TooManyImages(uploads.max_album_images));
    }

    let profile = UploadProfile::for_append(uploads, album.is_full_quality);
    let uploader_id = session.map(|s| s.user_id.as_str());
    let results = upload_batch(media, album_id, uploader_id, files, profile, progress).await;
    let (images, failures) = split_results(results);

    if !images.is_empty() {
        let mut tx = pool.begin().await?;
        let Some(current) = AlbumStore::find_by_id_for_update(&mut *tx, album_id).await? else {
            // The album vanished while blobs were landing; don't leave them.
            drop(tx);
            for image in &images {
                if let Err(e) = media.delete(album_id, &image.id).await {
                    warn!("Failed to clean up orphaned blob {}: {e:?}", image.id);
                }
            }
            return Err(UploadError::NotFound(album_id.to_owned()));
        };

        let mut new_list = current.image_list;
        new_list.extend(images.iter().cloned());
        AlbumStore::set_image_list(&mut *tx, album_id, &new_list).await?;
        AlbumStore::set_first_upload_on_if_unset(&mut *tx, album_id, now).await?;
        tx.commit().await?;
    }

    info!(
        "Appended {} images to album {album_id} ({} failed)",
        images.len(),
        failures.len()
    );

    Ok(AppendImagesResponse { images, failures })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::upload::progress::ProgressCallback;
    use image::{Rgb, RgbImage};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU8, Ordering};

    fn png_file(name: &str, width: u32, height: u32) -> UploadFile {
        let mut img = RgbImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = Rgb([120, 40, 200]);
        }
        let mut bytes = std::io::Cursor::new(Vec::new());
        img.write_to(&mut bytes, image::ImageFormat::Png)
            .expect("encode test png");
        UploadFile {
            file_name: name.to_owned(),
            bytes: bytes.into_inner(),
        }
    }

    fn profile() -> UploadProfile {
        UploadProfile {
            quality: 80,
            max_dimension: Some(16),
            max_file_bytes: 1024 * 1024,
        }
    }

    #[test]
    fn process_image_downscales_and_reencodes() {
        let file = png_file("big.png", 64, 32);
        let jpeg = process_image(&file, &profile()).expect("process");
        let reloaded = image::load_from_memory(&jpeg).expect("reload");
        assert_eq!(reloaded.width().max(reloaded.height()), 16);
    }

    #[test]
    fn process_image_keeps_dimensions_at_full_quality() {
        let file = png_file("big.png", 64, 32);
        let full = UploadProfile {
            max_dimension: None,
            ..profile()
        };
        let jpeg = process_image(&file, &full).expect("process");
        let reloaded = image::load_from_memory(&jpeg).expect("reload");
        assert_eq!((reloaded.width(), reloaded.height()), (64, 32));
    }

    #[test]
    fn process_image_rejects_garbage() {
        let file = UploadFile {
            file_name: "notes.txt".into(),
            bytes: b"definitely not an image".to_vec(),
        };
        assert!(matches!(
            process_image(&file, &profile()),
            Err(UploadError::InvalidImage { .. })
        ));
    }

    #[tokio::test]
    async fn batch_results_keep_input_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let media = MediaStore::new(dir.path().to_path_buf(), "https://plurr.app");

        // Wildly different sizes so completion order differs from input order.
        let files = vec![
            png_file("a.png", 256, 256),
            png_file("b.png", 4, 4),
            png_file("c.png", 128, 128),
        ];
        let sizes: Vec<u64> = files.iter().map(UploadFile::size).collect();
        let progress = BatchProgress::new(&sizes, Box::new(|_| {}));

        let results = upload_batch(
            &media,
            "album1",
            Some("user-1"),
            files,
            UploadProfile {
                quality: 80,
                max_dimension: None,
                max_file_bytes: 10 * 1024 * 1024,
            },
            &progress,
        )
        .await;

        let names: Vec<&str> = results.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["a.png", "b.png", "c.png"]);
        for (_, result) in &results {
            let record = result.as_ref().expect("upload ok");
            assert!(record.image_url.contains("/media/albums/album1/"));
            assert_eq!(record.uploader_id.as_deref(), Some("user-1"));
        }
    }

    #[tokio::test]
    async fn batch_progress_converges_to_100() {
        let dir = tempfile::tempdir().expect("tempdir");
        let media = MediaStore::new(dir.path().to_path_buf(), "https://plurr.app");

        let files = vec![png_file("a.png", 64, 64), png_file("b.png", 32, 32)];
        let sizes: Vec<u64> = files.iter().map(UploadFile::size).collect();
        let last = Arc::new(AtomicU8::new(0));
        let observer = Arc::clone(&last);
        let callback: ProgressCallback =
            Box::new(move |p| observer.store(p, Ordering::SeqCst));
        let progress = BatchProgress::new(&sizes, callback);

        let results = upload_batch(
            &media,
            "album1",
            None,
            files,
            UploadProfile {
                quality: 50,
                max_dimension: None,
                max_file_bytes: 10 * 1024 * 1024,
            },
            &progress,
        )
        .await;

        assert!(results.iter().all(|(_, r)| r.is_ok()));
        assert_eq!(last.load(Ordering::SeqCst), 100);
    }

    #[tokio::test]
    async fn one_bad_file_does_not_sink_the_batch() {
        let dir = tempfile::tempdir().expect("tempdir");
        let media = MediaStore::new(dir.path().to_path_buf(), "https://plurr.app");

        let files = vec![
            png_file("ok.png", 8, 8),
            UploadFile {
                file_name: "broken.bin".into(),
                bytes: vec![0u8; 32],
            },
        ];
        let sizes: Vec<u64> = files.iter().map(UploadFile::size).collect();
        let progress = BatchProgress::new(&sizes, Box::new(|_| {}));

        let results = upload_batch(
            &media,
            "album1",
            None,
            files,
            UploadProfile {
                quality: 80,
                max_dimension: None,
                max_file_bytes: 1024,
            },
            &progress,
        )
        .await;

        let (images, failures) = split_results(results);
        assert_eq!(images.len(), 1);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].file_name, "broken.bin");
    }

    #[tokio::test]
    async fn oversized_file_fails_before_decoding() {
        let dir = tempfile::tempdir().expect("tempdir");
        let media = MediaStore::new(dir.path().to_path_buf(), "https://plurr.app");

        let files = vec![png_file("huge.png", 32, 32)];
        let sizes: Vec<u64> = files.iter().map(UploadFile::size).collect();
        let progress = BatchProgress::new(&sizes, Box::new(|_| {}));

        let results = upload_batch(
            &media,
            "album1",
            None,
            files,
            UploadProfile {
                quality: 80,
                max_dimension: None,
                max_file_bytes: 10,
            },
            &progress,
        )
        .await;

        assert!(matches!(
            results[0].1,
            Err(UploadError::FileTooLarge(_))
        ));
    }
}
