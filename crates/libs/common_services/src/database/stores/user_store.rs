use crate::database::DbError;
use crate::database::app_user::AppUser;
use sqlx::postgres::PgQueryResult;
use sqlx::{Executor, Postgres};

pub struct UserStore;

impl UserStore {
    /// Creates the bookmark record for a user if it does not exist yet.
    pub async fn ensure_exists(
        executor: impl Executor<'_, Database = Postgres>,
        user_id: &str,
    ) -> Result<(), DbError> {
        sqlx::query("INSERT INTO app_user (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn find_by_id(
        executor: impl Executor<'_, Database = Postgres>,
        user_id: &str,
    ) -> Result<Option<AppUser>, DbError> {
        Ok(
            sqlx::query_as::<_, AppUser>("SELECT * FROM app_user WHERE id = $1")
                .bind(user_id)
                .fetch_optional(executor)
                .await?,
        )
    }

    /// Bookmarks an album. Adding the same album twice keeps a single entry.
    pub async fn add_joined_album(
        executor: impl Executor<'_, Database = Postgres>,
        user_id: &str,
        album_id: &str,
    ) -> Result<PgQueryResult, DbError> {
        Ok(sqlx::query(
            r"
            UPDATE app_user
            SET joined_albums = array_append(joined_albums, $2)
            WHERE id = $1 AND NOT ($2 = ANY(joined_albums))
            ",
        )
        .bind(user_id)
        .bind(album_id)
        .execute(executor)
        .await?)
    }

    pub async fn remove_joined_album(
        executor: impl Executor<'_, Database = Postgres>,
        user_id: &str,
        album_id: &str,
    ) -> Result<PgQueryResult, DbError> {
        Ok(sqlx::query(
            "UPDATE app_user SET joined_albums = array_remove(joined_albums, $2) WHERE id = $1",
        )
        .bind(user_id)
        .bind(album_id)
        .execute(executor)
        .await?)
    }
}
