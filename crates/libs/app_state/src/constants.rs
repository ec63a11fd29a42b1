use crate::{AuthConstants, DatabaseConstants, RawSettings, RetentionConstants, UploadConstants};

#[derive(Debug, Clone)]
pub struct AppConstants {
    pub database: DatabaseConstants,
    pub retention: RetentionConstants,
    pub uploads: UploadConstants,
    pub auth: AuthConstants,
}

impl From<RawSettings> for AppConstants {
    fn from(raw: RawSettings) -> Self {
        Self {
            database: raw.constants.database,
            retention: raw.constants.retention,
            uploads: raw.constants.uploads,
            auth: raw.constants.auth,
        }
    }
}
