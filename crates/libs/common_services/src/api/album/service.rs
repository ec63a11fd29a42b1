use crate::api::album::error::AlbumError;
use crate::api::album::interfaces::{
    AlbumDetailsResponse, AlbumSummary, EditImagesRequest, ReactionResponse, UpdateAlbumRequest,
};
use crate::api::album::reactions::apply_reaction;
use crate::api::auth::interfaces::AuthSession;
use crate::database::album_store::AlbumStore;
use crate::database::album::{Album, ImageRecord};
use crate::database::user_store::UserStore;
use crate::media_store::MediaStore;
use crate::retention::{AlbumWindow, RetentionPolicy};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashSet;
use tracing::{info, instrument, warn};

fn window_of(policy: &RetentionPolicy, album: &Album, now: DateTime<Utc>) -> AlbumWindow {
    policy.window(
        now.timestamp_millis(),
        album.created_on.timestamp_millis(),
        album.first_upload_on.map(|t| t.timestamp_millis()),
    )
}

/// Fetch an album, treating one past its deletion threshold as gone.
async fn find_active_album(
    pool: &PgPool,
    policy: &RetentionPolicy,
    album_id: &str,
    now: DateTime<Utc>,
) -> Result<(Album, AlbumWindow), AlbumError> {
    let album = AlbumStore::find_by_id(pool, album_id)
        .await?
        .ok_or_else(|| AlbumError::NotFound(album_id.to_owned()))?;
    let window = window_of(policy, &album, now);
    if window.expired {
        return Err(AlbumError::NotFound(album_id.to_owned()));
    }
    Ok((album, window))
}

/// Full album view. Expired albums are indistinguishable from missing ones.
#[instrument(skip(pool, policy))]
pub async fn get_album(
    pool: &PgPool,
    policy: &RetentionPolicy,
    album_id: &str,
    now: DateTime<Utc>,
) -> Result<AlbumDetailsResponse, AlbumError> {
    let (album, window) = find_active_album(pool, policy, album_id, now).await?;
    Ok(AlbumDetailsResponse::from_album(album, &window))
}

/// Albums owned by the caller, newest first, expired ones excluded.
#[instrument(skip(pool, policy))]
pub async fn list_owned(
    pool: &PgPool,
    policy: &RetentionPolicy,
    session: &AuthSession,
    now: DateTime<Utc>,
) -> Result<Vec<AlbumSummary>, AlbumError> {
    let albums = AlbumStore::list_by_owner(pool, &session.user_id).await?;
    Ok(summarize_active(policy, &albums, now))
}

/// The caller's joined-lobby bookmarks, expired ones excluded. Bookmarks
/// pointing at albums that no longer exist simply drop out of the result.
#[instrument(skip(pool, policy))]
pub async fn list_joined(
    pool: &PgPool,
    policy: &RetentionPolicy,
    session: &AuthSession,
    now: DateTime<Utc>,
) -> Result<Vec<AlbumSummary>, AlbumError> {
    let Some(user) = UserStore::find_by_id(pool, &session.user_id).await? else {
        return Ok(Vec::new());
    };
    if user.joined_albums.is_empty() {
        return Ok(Vec::new());
    }
    let albums = AlbumStore::list_by_ids(pool, &user.joined_albums).await?;
    Ok(summarize_active(policy, &albums, now))
}

fn summarize_active(
    policy: &RetentionPolicy,
    albums: &[Album],
    now: DateTime<Utc>,
) -> Vec<AlbumSummary> {
    albums
        .iter()
        .filter(|album| !window_of(policy, album, now).expired)
        .map(AlbumSummary::from)
        .collect()
}

/// Bookmark an album for the caller. Idempotent; the user record is created
/// on first use.
#[instrument(skip(pool, policy))]
pub async fn join_album(
    pool: &PgPool,
    policy: &RetentionPolicy,
    session: &AuthSession,
    album_id: &str,
    now: DateTime<Utc>,
) -> Result<(), AlbumError> {
    find_active_album(pool, policy, album_id, now).await?;
    UserStore::ensure_exists(pool, &session.user_id).await?;
    UserStore::add_joined_album(pool, &session.user_id, album_id).await?;
    Ok(())
}

#[instrument(skip(pool))]
pub async fn leave_album(
    pool: &PgPool,
    session: &AuthSession,
    album_id: &str,
) -> Result<(), AlbumError> {
    UserStore::remove_joined_album(pool, &session.user_id, album_id).await?;
    Ok(())
}

/// Rename the album and/or toggle whether viewers can add photos. Owner only.
#[instrument(skip(pool, policy))]
pub async fn update_album(
    pool: &PgPool,
    policy: &RetentionPolicy,
    album_id: &str,
    session: &AuthSession,
    payload: UpdateAlbumRequest,
    now: DateTime<Utc>,
) -> Result<AlbumDetailsResponse, AlbumError> {
    let (album, _) = find_active_album(pool, policy, album_id, now).await?;
    if album.owner_id != session.user_id {
        return Err(AlbumError::Forbidden(
            "Only the album owner can edit it.".to_owned(),
        ));
    }

    if let Some(name) = &payload.album_name
        && name.trim().is_empty()
    {
        return Err(AlbumError::BadRequest(
            "Album name cannot be empty.".to_owned(),
        ));
    }

    let updated = AlbumStore::update_fields(
        pool,
        album_id,
        payload.album_name,
        payload.viewers_can_edit,
    )
    .await?
    .ok_or_else(|| AlbumError::NotFound(album_id.to_owned()))?;

    let window = window_of(policy, &updated, now);
    Ok(AlbumDetailsResponse::from_album(updated, &window))
}

/// Reorder and/or remove images. Owner only. The new order must be a
/// permutation of the images that survive removal; removed images lose their
/// blobs once the record change has committed.
#[instrument(skip(pool, policy, media))]
pub async fn edit_images(
    pool: &PgPool,
    policy: &RetentionPolicy,
    media: &MediaStore,
    album_id: &str,
    session: &AuthSession,
    payload: EditImagesRequest,
    now: DateTime<Utc>,
) -> Result<Vec<ImageRecord>, AlbumError> {
    let mut tx = pool.begin().await?;

    let album = AlbumStore::find_by_id_for_update(&mut *tx, album_id)
        .await?
        .ok_or_else(|| AlbumError::NotFound(album_id.to_owned()))?;
    if window_of(policy, &album, now).expired {
        return Err(AlbumError::NotFound(album_id.to_owned()));
    }
    if album.owner_id != session.user_id {
        return Err(AlbumError::Forbidden(
            "Only the album owner can edit images.".to_owned(),
        ));
    }

    let new_list = reorder_images(&album.image_list, &payload.ordered_ids, &payload.removed_ids)?;

    AlbumStore::set_image_list(&mut *tx, album_id, &new_list).await?;
    tx.commit().await?;

    // Blobs go after the commit; a stray blob is better than a dangling record.
    for image_id in &payload.removed_ids {
        if let Err(e) = media.delete(album_id, image_id).await {
            warn!("Failed to delete blob {album_id}/{image_id}: {e:?}");
        }
    }

    Ok(new_list)
}

/// Pure reorder/remove. `ordered_ids` must name every surviving image exactly
/// once; anything else is rejected before any mutation happens.
fn reorder_images(
    existing: &[ImageRecord],
    ordered_ids: &[String],
    removed_ids: &[String],
) -> Result<Vec<ImageRecord>, AlbumError> {
    let existing_ids: HashSet<&str> = existing.iter().map(|image| image.id.as_str()).collect();
    let removed: HashSet<&str> = removed_ids.iter().map(String::as_str).collect();

    if let Some(unknown) = removed.iter().find(|id| !existing_ids.contains(*id)) {
        return Err(AlbumError::BadRequest(format!(
            "Cannot remove unknown image {unknown}"
        )));
    }

    let surviving: Vec<&ImageRecord> = existing
        .iter()
        .filter(|image| !removed.contains(image.id.as_str()))
        .collect();

    if ordered_ids.len() != surviving.len() {
        return Err(AlbumError::BadRequest(
            "New order must list every remaining image exactly once.".to_owned(),
        ));
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(ordered_ids.len());
    let mut new_list = Vec::with_capacity(surviving.len());
    for id in ordered_ids {
        if !seen.insert(id.as_str()) {
            return Err(AlbumError::BadRequest(format!("Duplicate image id {id}")));
        }
        let record = surviving
            .iter()
            .find(|image| image.id == *id)
            .ok_or_else(|| AlbumError::BadRequest(format!("Unknown image id {id}")))?;
        new_list.push((*record).clone());
    }

    Ok(new_list)
}

/// Delete an album, its blobs included. Owner only.
#[instrument(skip(pool, media))]
pub async fn delete_album(
    pool: &PgPool,
    media: &MediaStore,
    album_id: &str,
    session: &AuthSession,
) -> Result<(), AlbumError> {
    let album = AlbumStore::find_by_id(pool, album_id)
        .await?
        .ok_or_else(|| AlbumError::NotFound(album_id.to_owned()))?;
    if album.owner_id != session.user_id {
        return Err(AlbumError::Forbidden(
            "Only the album owner can delete it.".to_owned(),
        ));
    }

    media
        .delete_album(album_id)
        .await
        .map_err(AlbumError::Internal)?;
    AlbumStore::delete(pool, album_id).await?;

    info!(
        "Deleted album {album_id} with {} images",
        album.image_list.len()
    );
    Ok(())
}

/// Toggle the caller's reaction on one image and persist the new digest.
///
/// Runs as a locked read-modify-write so two simultaneous reactions both
/// land; an out-of-range index or missing album changes nothing.
#[instrument(skip(pool, policy, session))]
pub async fn react(
    pool: &PgPool,
    policy: &RetentionPolicy,
    album_id: &str,
    image_index: usize,
    session: &AuthSession,
    symbol: &str,
    now: DateTime<Utc>,
) -> Result<ReactionResponse, AlbumError> {
    if symbol.is_empty() {
        return Err(AlbumError::BadRequest("Reaction cannot be empty.".to_owned()));
    }

    let mut tx = pool.begin().await?;

    let mut album = AlbumStore::find_by_id_for_update(&mut *tx, album_id)
        .await?
        .ok_or_else(|| AlbumError::NotFound(album_id.to_owned()))?;
    if window_of(policy, &album, now).expired {
        return Err(AlbumError::NotFound(album_id.to_owned()));
    }

    let Some(image) = album.image_list.get_mut(image_index) else {
        return Err(AlbumError::NotFound(format!(
            "Image {image_index} in album {album_id}"
        )));
    };

    let update = apply_reaction(&image.reactions, &session.user_id, symbol);
    image.reactions = update.reactions;
    image.reaction_string = update.digest.clone();
    let reaction_count = image.reactions.len();

    AlbumStore::set_image_list(&mut *tx, album_id, &album.image_list).await?;
    tx.commit().await?;

    Ok(ReactionResponse {
        reaction_string: update.digest,
        display_string: update.display_string,
        reaction_count,
    })
}

#[cfg(test)]
mod tests {
    use super::reorder_images;
    use crate::api::album::error::AlbumError;
    use crate::database::album::ImageRecord;
    use chrono::Utc;

    fn image(id: &str) -> ImageRecord {
        ImageRecord {
            id: id.to_owned(),
            image_url: format!("https://plurr.app/media/albums/a/{id}.jpg"),
            uploader_id: None,
            uploaded_on: Utc::now(),
            reactions: Vec::new(),
            reaction_string: String::new(),
        }
    }

    fn ids(records: &[ImageRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn reorder_is_a_pure_permutation() {
        let existing = vec![image("a"), image("b"), image("c")];
        let reordered = reorder_images(
            &existing,
            &["c".into(), "a".into(), "b".into()],
            &[],
        )
        .expect("valid permutation");
        assert_eq!(ids(&reordered), ["c", "a", "b"]);
    }

    #[test]
    fn removal_drops_records_and_keeps_order() {
        let existing = vec![image("a"), image("b"), image("c")];
        let reordered = reorder_images(
            &existing,
            &["a".into(), "c".into()],
            &["b".into()],
        )
        .expect("valid edit");
        assert_eq!(ids(&reordered), ["a", "c"]);
    }

    #[test]
    fn incomplete_order_is_rejected() {
        let existing = vec![image("a"), image("b")];
        let result = reorder_images(&existing, &["a".into()], &[]);
        assert!(matches!(result, Err(AlbumError::BadRequest(_))));
    }

    #[test]
    fn duplicate_and_unknown_ids_are_rejected() {
        let existing = vec![image("a"), image("b")];
        assert!(matches!(
            reorder_images(&existing, &["a".into(), "a".into()], &[]),
            Err(AlbumError::BadRequest(_))
        ));
        assert!(matches!(
            reorder_images(&existing, &["a".into(), "z".into()], &[]),
            Err(AlbumError::BadRequest(_))
        ));
        assert!(matches!(
            reorder_images(&existing, &["a".into(), "b".into()], &["z".into()]),
            Err(AlbumError::BadRequest(_))
        ));
    }
}
