use crate::database::DbError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One user's reaction to one image. The aggregator keeps at most one entry
/// per user per image.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub user_id: String,
    pub reaction: String,
}

/// An image embedded in an album's ordered image list.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: String,
    pub image_url: String,
    pub uploader_id: Option<String>,
    pub uploaded_on: DateTime<Utc>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub reaction_string: String,
}

/// An album with its embedded, display-ordered image list.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub viewers_can_edit: bool,
    pub is_full_quality: bool,
    pub created_on: DateTime<Utc>,
    pub first_upload_on: Option<DateTime<Utc>>,
    pub image_list: Vec<ImageRecord>,
}

/// Raw album row; `image_list` is validated into typed records by
/// [`Album::try_from`].
#[derive(Debug, FromRow)]
pub struct AlbumRow {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub viewers_can_edit: bool,
    pub is_full_quality: bool,
    pub created_on: DateTime<Utc>,
    pub first_upload_on: Option<DateTime<Utc>>,
    pub image_list: serde_json::Value,
}

impl TryFrom<AlbumRow> for Album {
    type Error = DbError;

    fn try_from(row: AlbumRow) -> Result<Self, Self::Error> {
        let image_list: Vec<ImageRecord> = serde_json::from_value(row.image_list)?;
        Ok(Self {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            viewers_can_edit: row.viewers_can_edit,
            is_full_quality: row.is_full_quality,
            created_on: row.created_on,
            first_upload_on: row.first_upload_on,
            image_list,
        })
    }
}

impl Album {
    /// First image's URL, used as the listing thumbnail.
    #[must_use]
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.image_list.first().map(|image| image.image_url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(image_list: serde_json::Value) -> AlbumRow {
        AlbumRow {
            id: "a1b2c3".into(),
            owner_id: "user-1".into(),
            name: "Trip".into(),
            viewers_can_edit: true,
            is_full_quality: false,
            created_on: Utc::now(),
            first_upload_on: None,
            image_list,
        }
    }

    #[test]
    fn image_list_validates_at_the_boundary() {
        let album = Album::try_from(row(serde_json::json!([
            {
                "id": "img-1",
                "imageUrl": "https://plurr.app/media/albums/a1b2c3/img-1.jpg",
                "uploaderId": null,
                "uploadedOn": "2026-01-01T00:00:00Z",
                "reactions": [{"userId": "u1", "reaction": "😂"}],
                "reactionString": "😂"
            }
        ])))
        .expect("valid record");

        assert_eq!(album.image_list.len(), 1);
        assert_eq!(album.image_list[0].reactions[0].user_id, "u1");
        assert_eq!(album.thumbnail_url().expect("thumbnail"), album.image_list[0].image_url);
    }

    #[test]
    fn malformed_image_list_is_a_typed_error() {
        let result = Album::try_from(row(serde_json::json!([{"id": 42}])));
        assert!(matches!(result, Err(DbError::MalformedRecord(_))));
    }

    #[test]
    fn missing_reaction_fields_default_empty() {
        let album = Album::try_from(row(serde_json::json!([
            {
                "id": "img-1",
                "imageUrl": "u",
                "uploaderId": "user-1",
                "uploadedOn": "2026-01-01T00:00:00Z"
            }
        ])))
        .expect("valid record");
        assert!(album.image_list[0].reactions.is_empty());
        assert_eq!(album.image_list[0].reaction_string, "");
    }
}
