use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(sqlx::Error),

    /// A stored record did not match its expected shape. Reads validate at
    /// the boundary instead of propagating undefined fields.
    #[error("Malformed record: {0}")]
    MalformedRecord(#[from] serde_json::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        Self::Sqlx(err)
    }
}
