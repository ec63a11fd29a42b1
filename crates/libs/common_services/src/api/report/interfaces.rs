use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub album_id: String,
    /// Contact address for follow-up on the ticket.
    pub email: String,
    pub description: String,
}
