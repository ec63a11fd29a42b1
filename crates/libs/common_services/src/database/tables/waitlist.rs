use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// One signup on the waitlist. Append-only.
#[derive(Debug, Serialize, FromRow, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    pub id: i64,
    pub email: String,
    pub phone_number: Option<String>,
    /// Album the visitor came from when they signed up, if any.
    pub from_album_id: Option<String>,
    pub created_on: DateTime<Utc>,
}
