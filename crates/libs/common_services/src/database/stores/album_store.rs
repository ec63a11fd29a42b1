use crate::database::DbError;
use crate::database::album::{Album, AlbumRow, ImageRecord};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgQueryResult;
use sqlx::{Executor, Postgres};

pub struct AlbumStore;

impl AlbumStore {
    /// Inserts a new album together with its initial image list.
    pub async fn create(
        executor: impl Executor<'_, Database = Postgres>,
        album: &Album,
    ) -> Result<(), DbError> {
        sqlx::query(
            r"
            INSERT INTO album
                (id, owner_id, name, viewers_can_edit, is_full_quality,
                 created_on, first_upload_on, image_list)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(&album.id)
        .bind(&album.owner_id)
        .bind(&album.name)
        .bind(album.viewers_can_edit)
        .bind(album.is_full_quality)
        .bind(album.created_on)
        .bind(album.first_upload_on)
        .bind(serde_json::to_value(&album.image_list)?)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Retrieves a single album by its join code.
    pub async fn find_by_id(
        executor: impl Executor<'_, Database = Postgres>,
        album_id: &str,
    ) -> Result<Option<Album>, DbError> {
        let row = sqlx::query_as::<_, AlbumRow>("SELECT * FROM album WHERE id = $1")
            .bind(album_id)
            .fetch_optional(executor)
            .await?;
        row.map(Album::try_from).transpose()
    }

    /// Same as [`Self::find_by_id`] but takes the row lock, so concurrent
    /// editors of the same album serialize instead of overwriting each other.
    /// Only meaningful inside a transaction.
    pub async fn find_by_id_for_update(
        executor: impl Executor<'_, Database = Postgres>,
        album_id: &str,
    ) -> Result<Option<Album>, DbError> {
        let row = sqlx::query_as::<_, AlbumRow>("SELECT * FROM album WHERE id = $1 FOR UPDATE")
            .bind(album_id)
            .fetch_optional(executor)
            .await?;
        row.map(Album::try_from).transpose()
    }

    pub async fn exists(
        executor: impl Executor<'_, Database = Postgres>,
        album_id: &str,
    ) -> Result<bool, DbError> {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM album WHERE id = $1")
            .bind(album_id)
            .fetch_optional(executor)
            .await?;
        Ok(found.is_some())
    }

    /// Albums owned by a user, newest first.
    pub async fn list_by_owner(
        executor: impl Executor<'_, Database = Postgres>,
        owner_id: &str,
    ) -> Result<Vec<Album>, DbError> {
        let rows = sqlx::query_as::<_, AlbumRow>(
            "SELECT * FROM album WHERE owner_id = $1 ORDER BY created_on DESC",
        )
        .bind(owner_id)
        .fetch_all(executor)
        .await?;
        rows.into_iter().map(Album::try_from).collect()
    }

    /// Albums by id, newest first. Missing ids are silently absent.
    pub async fn list_by_ids(
        executor: impl Executor<'_, Database = Postgres>,
        album_ids: &[String],
    ) -> Result<Vec<Album>, DbError> {
        let rows = sqlx::query_as::<_, AlbumRow>(
            "SELECT * FROM album WHERE id = ANY($1) ORDER BY created_on DESC",
        )
        .bind(album_ids)
        .fetch_all(executor)
        .await?;
        rows.into_iter().map(Album::try_from).collect()
    }

    /// Overwrites the album's name and edit policy.
    pub async fn update_fields(
        executor: impl Executor<'_, Database = Postgres>,
        album_id: &str,
        name: Option<String>,
        viewers_can_edit: Option<bool>,
    ) -> Result<Option<Album>, DbError> {
        let row = sqlx::query_as::<_, AlbumRow>(
            r"
            UPDATE album
            SET name = COALESCE($1, name),
                viewers_can_edit = COALESCE($2, viewers_can_edit)
            WHERE id = $3
            RETURNING *
            ",
        )
        .bind(name)
        .bind(viewers_can_edit)
        .bind(album_id)
        .fetch_optional(executor)
        .await?;
        row.map(Album::try_from).transpose()
    }

    /// Replaces the embedded image list wholesale. Callers hold the row lock.
    pub async fn set_image_list(
        executor: impl Executor<'_, Database = Postgres>,
        album_id: &str,
        image_list: &[ImageRecord],
    ) -> Result<PgQueryResult, DbError> {
        Ok(sqlx::query("UPDATE album SET image_list = $1 WHERE id = $2")
            .bind(serde_json::to_value(image_list)?)
            .bind(album_id)
            .execute(executor)
            .await?)
    }

    /// Starts the retention clock if it has not started yet.
    pub async fn set_first_upload_on_if_unset(
        executor: impl Executor<'_, Database = Postgres>,
        album_id: &str,
        first_upload_on: DateTime<Utc>,
    ) -> Result<PgQueryResult, DbError> {
        Ok(sqlx::query(
            "UPDATE album SET first_upload_on = $1 WHERE id = $2 AND first_upload_on IS NULL",
        )
        .bind(first_upload_on)
        .bind(album_id)
        .execute(executor)
        .await?)
    }

    pub async fn delete(
        executor: impl Executor<'_, Database = Postgres>,
        album_id: &str,
    ) -> Result<PgQueryResult, DbError> {
        Ok(sqlx::query("DELETE FROM album WHERE id = $1")
            .bind(album_id)
            .execute(executor)
            .await?)
    }

    /// Albums whose retention clock started before the cutoff; these are past
    /// their deletion threshold and eligible for the sweeper.
    pub async fn list_expired(
        executor: impl Executor<'_, Database = Postgres>,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Album>, DbError> {
        let rows = sqlx::query_as::<_, AlbumRow>(
            "SELECT * FROM album WHERE first_upload_on IS NOT NULL AND first_upload_on < $1",
        )
        .bind(cutoff)
        .fetch_all(executor)
        .await?;
        rows.into_iter().map(Album::try_from).collect()
    }
}
