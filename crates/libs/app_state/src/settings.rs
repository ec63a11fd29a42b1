use crate::{ApiSettings, LoggingSettings, MediaSettings, RawSettings, SecretSettings};
use std::path::absolute;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub media: MediaSettings,
    pub logging: LoggingSettings,
    pub api: ApiSettings,
    pub secrets: SecretSettings,
}

impl From<RawSettings> for AppSettings {
    fn from(raw: RawSettings) -> Self {
        let media_root = absolute(&raw.media.media_folder).expect("Invalid media_folder");
        Self {
            media: MediaSettings {
                media_folder: media_root,
            },
            logging: raw.logging,
            api: raw.api,
            secrets: raw.secrets,
        }
    }
}

impl ApiSettings {
    /// Base URL without a trailing slash, for building absolute links.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.public_url.trim_end_matches('/')
    }
}
