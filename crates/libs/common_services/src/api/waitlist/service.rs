use crate::api::waitlist::error::WaitlistError;
use crate::api::waitlist::interfaces::JoinWaitlistRequest;
use crate::database::waitlist::WaitlistEntry;
use crate::database::waitlist_store::WaitlistStore;
use sqlx::PgPool;
use tracing::{info, instrument};

/// Append a waitlist signup.
#[instrument(skip(pool))]
pub async fn join_waitlist(
    pool: &PgPool,
    payload: JoinWaitlistRequest,
) -> Result<WaitlistEntry, WaitlistError> {
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err(WaitlistError::BadRequest("An email is required.".to_owned()));
    }

    let entry = WaitlistStore::create(
        pool,
        payload.email.trim(),
        payload.phone_number.as_deref(),
        payload.from_album_id.as_deref(),
    )
    .await?;

    info!("Waitlist signup {}", entry.id);
    Ok(entry)
}
