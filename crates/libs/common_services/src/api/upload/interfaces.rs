use crate::database::album::ImageRecord;
use app_state::UploadConstants;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One file pulled out of the multipart body.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// How an incoming image gets re-encoded before storage.
#[derive(Debug, Clone, Copy)]
pub struct UploadProfile {
    pub quality: u8,
    /// Longest edge after downscaling; `None` keeps the original dimensions.
    pub max_dimension: Option<u32>,
    pub max_file_bytes: u64,
}

impl UploadProfile {
    /// Profile for images uploaded while creating an album.
    #[must_use]
    pub fn for_create(uploads: &UploadConstants, is_full_quality: bool) -> Self {
        Self {
            quality: uploads.create_quality,
            max_dimension: (!is_full_quality).then_some(uploads.max_dimension),
            max_file_bytes: uploads.max_file_bytes,
        }
    }

    /// Profile for images appended to an existing album.
    #[must_use]
    pub fn for_append(uploads: &UploadConstants, is_full_quality: bool) -> Self {
        Self {
            quality: uploads.append_quality,
            max_dimension: (!is_full_quality).then_some(uploads.max_dimension),
            max_file_bytes: uploads.max_file_bytes,
        }
    }
}

/// The `info` form field sent along with an album-creating upload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlbumInfo {
    pub album_name: String,
    #[serde(default)]
    pub viewers_can_edit: bool,
    #[serde(default)]
    pub is_full_quality: bool,
}

/// A file that did not make it, reported alongside the ones that did.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadFailure {
    pub file_name: String,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAlbumResponse {
    pub album_id: String,
    pub image_list: Vec<ImageRecord>,
    pub failures: Vec<UploadFailure>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppendImagesResponse {
    /// Newly appended records, in the order the files were sent.
    pub images: Vec<ImageRecord>,
    pub failures: Vec<UploadFailure>,
}
