use chrono::{Duration, Utc};
use common_services::database::album_store::AlbumStore;
use common_services::media_store::MediaStore;
use common_services::retention::RetentionPolicy;
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Background purge of albums past their retention window: blobs first, then
/// the record. Listings already hide these, so the sweeper only reclaims
/// what nobody can see anymore.
pub fn spawn_sweeper(
    pool: PgPool,
    media: MediaStore,
    policy: RetentionPolicy,
    interval_minutes: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker =
            tokio::time::interval(std::time::Duration::from_secs(interval_minutes * 60));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match sweep_expired(&pool, &media, &policy).await {
                Ok(0) => debug!("Expiry sweep: nothing to do"),
                Ok(count) => info!("Expiry sweep removed {count} albums"),
                Err(e) => warn!("Expiry sweep failed: {e:?}"),
            }
        }
    })
}

pub async fn sweep_expired(
    pool: &PgPool,
    media: &MediaStore,
    policy: &RetentionPolicy,
) -> color_eyre::Result<usize> {
    // The day counter only goes negative once a full day past the budget has
    // elapsed, so the cutoff sits at lifetime_days + 1.
    let cutoff = Utc::now() - Duration::days(policy.lifetime_days + 1);
    let expired = AlbumStore::list_expired(pool, cutoff).await?;

    let mut swept = 0;
    for album in expired {
        if let Err(e) = media.delete_album(&album.id).await {
            warn!("Could not delete blobs for album {}: {e:?}", album.id);
            continue;
        }
        AlbumStore::delete(pool, &album.id).await?;
        swept += 1;
    }
    Ok(swept)
}
