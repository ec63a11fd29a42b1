use crate::database::DbError;
use crate::database::report::{Report, ReportStatus};
use sqlx::{Executor, Postgres};

pub struct ReportStore;

impl ReportStore {
    /// Appends a new moderation ticket. Tickets start out open.
    pub async fn create(
        executor: impl Executor<'_, Database = Postgres>,
        album_id: &str,
        email: &str,
        description: &str,
    ) -> Result<Report, DbError> {
        Ok(sqlx::query_as::<_, Report>(
            r"
            INSERT INTO report (album_id, email, description, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            ",
        )
        .bind(album_id)
        .bind(email)
        .bind(description)
        .bind(ReportStatus::Open)
        .fetch_one(executor)
        .await?)
    }
}
