use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub media: MediaSettings,
    pub logging: LoggingSettings,
    pub api: ApiSettings,
    pub secrets: SecretSettings,
    pub constants: RawConstants,
}

/// Where re-encoded album images are stored on disk.
#[derive(Debug, Deserialize, Clone)]
pub struct MediaSettings {
    pub media_folder: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

/// Configuration for the API server.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub port: u32,
    pub allowed_origins: Vec<String>,
    /// Absolute base URL clients reach this server at; image URLs are built from it.
    pub public_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecretSettings {
    /// URL of the JSON Web Key Set the identity provider publishes.
    pub jwks_url: String,
    pub database_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawConstants {
    pub database: DatabaseConstants,
    pub retention: RetentionConstants,
    pub uploads: UploadConstants,
    pub auth: AuthConstants,
}

/// Database connection and related configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConstants {
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: u64,
    pub idle_timeout: u64,
    pub acquire_timeout: u64,
    /// Length of the generated album join code.
    pub album_id_length: usize,
}

/// Album lifetime budgets. Hours gate uploads, days gate existence.
#[derive(Debug, Deserialize, Clone)]
pub struct RetentionConstants {
    pub upload_window_hours: i64,
    pub lifetime_days: i64,
    /// How often the expiry sweeper wakes up.
    pub sweep_interval_minutes: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConstants {
    /// Hard cap on a single uploaded file, in bytes.
    pub max_file_bytes: u64,
    /// Maximum number of images an album may hold.
    pub max_album_images: usize,
    /// JPEG quality for images uploaded while creating an album.
    pub create_quality: u8,
    /// JPEG quality for images appended to an existing album.
    pub append_quality: u8,
    /// Longest edge after downscaling, unless the album is full quality.
    pub max_dimension: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConstants {
    /// How long a fetched key set may be reused before refetching.
    pub jwks_cache_minutes: u64,
}
