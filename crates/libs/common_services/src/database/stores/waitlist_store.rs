use crate::database::DbError;
use crate::database::waitlist::WaitlistEntry;
use sqlx::{Executor, Postgres};

pub struct WaitlistStore;

impl WaitlistStore {
    /// Appends a signup record.
    pub async fn create(
        executor: impl Executor<'_, Database = Postgres>,
        email: &str,
        phone_number: Option<&str>,
        from_album_id: Option<&str>,
    ) -> Result<WaitlistEntry, DbError> {
        Ok(sqlx::query_as::<_, WaitlistEntry>(
            r"
            INSERT INTO waitlist (email, phone_number, from_album_id)
            VALUES ($1, $2, $3)
            RETURNING *
            ",
        )
        .bind(email)
        .bind(phone_number)
        .bind(from_album_id)
        .fetch_one(executor)
        .await?)
    }
}
