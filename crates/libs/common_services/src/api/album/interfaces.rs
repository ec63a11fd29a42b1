use crate::database::album::{Album, ImageRecord};
use crate::retention::AlbumWindow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- Request Payloads ---

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlbumRequest {
    pub album_name: Option<String>,
    pub viewers_can_edit: Option<bool>,
}

/// Reorder and/or remove images. `ordered_ids` must list every surviving
/// image exactly once in the new display order.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EditImagesRequest {
    pub ordered_ids: Vec<String>,
    #[serde(default)]
    pub removed_ids: Vec<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReactionRequest {
    pub reaction: String,
}

// --- Response Payloads ---

/// Full details of an album, including its display-ordered image list and
/// where it sits on both retention clocks.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlbumDetailsResponse {
    pub id: String,
    pub album_name: String,
    pub owner_id: String,
    pub viewers_can_edit: bool,
    pub is_full_quality: bool,
    pub created_on: DateTime<Utc>,
    pub first_upload_on: Option<DateTime<Utc>>,
    pub hours_remaining: i64,
    pub days_remaining: Option<i64>,
    pub locked: bool,
    pub image_list: Vec<ImageRecord>,
}

impl AlbumDetailsResponse {
    #[must_use]
    pub fn from_album(album: Album, window: &AlbumWindow) -> Self {
        Self {
            id: album.id,
            album_name: album.name,
            owner_id: album.owner_id,
            viewers_can_edit: album.viewers_can_edit,
            is_full_quality: album.is_full_quality,
            created_on: album.created_on,
            first_upload_on: album.first_upload_on,
            hours_remaining: window.hours_remaining,
            days_remaining: window.days_remaining,
            locked: window.locked,
            image_list: album.image_list,
        }
    }
}

/// The listing shape: enough for a gallery card.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlbumSummary {
    pub id: String,
    pub album_name: String,
    pub owner_id: String,
    pub created_on: DateTime<Utc>,
    pub first_upload_on: Option<DateTime<Utc>>,
    pub thumbnail_image: Option<String>,
}

impl From<&Album> for AlbumSummary {
    fn from(album: &Album) -> Self {
        Self {
            id: album.id.clone(),
            album_name: album.name.clone(),
            owner_id: album.owner_id.clone(),
            created_on: album.created_on,
            first_upload_on: album.first_upload_on,
            thumbnail_image: album.thumbnail_url().map(ToOwned::to_owned),
        }
    }
}

/// What a reaction toggle leaves behind.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReactionResponse {
    /// The digest stored on the image (up to four distinct symbols).
    pub reaction_string: String,
    /// Digest plus total count, as shown under the image.
    pub display_string: String,
    pub reaction_count: usize,
}
