use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// The bookmark record for an authenticated user. Identity itself lives with
/// the external token issuer; this row only tracks which lobbies the user
/// joined. Created lazily on first join.
#[derive(Debug, Serialize, FromRow, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppUser {
    pub id: String,
    pub joined_albums: Vec<String>,
    pub created_on: DateTime<Utc>,
}
