use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinWaitlistRequest {
    pub email: String,
    pub phone_number: Option<String>,
    /// Album the visitor came from, carried through for attribution.
    pub from_album_id: Option<String>,
}
