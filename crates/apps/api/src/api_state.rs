use app_state::AppSettings;
use axum::extract::FromRef;
use common_services::api::auth::verifier::TokenVerifier;
use common_services::media_store::MediaStore;
use common_services::retention::RetentionPolicy;
use sqlx::PgPool;

#[derive(Clone)]
pub struct ApiContext {
    pub pool: PgPool,
    pub settings: AppSettings,
    pub media: MediaStore,
    pub verifier: TokenVerifier,
    pub policy: RetentionPolicy,
}

// These impls allow Axum to extract parts of the state directly, which keeps
// extractors and middleware from depending on the whole context.
impl FromRef<ApiContext> for PgPool {
    fn from_ref(state: &ApiContext) -> Self {
        state.pool.clone()
    }
}

impl FromRef<ApiContext> for AppSettings {
    fn from_ref(state: &ApiContext) -> Self {
        state.settings.clone()
    }
}

impl FromRef<ApiContext> for MediaStore {
    fn from_ref(state: &ApiContext) -> Self {
        state.media.clone()
    }
}

impl FromRef<ApiContext> for TokenVerifier {
    fn from_ref(state: &ApiContext) -> Self {
        state.verifier.clone()
    }
}

impl FromRef<ApiContext> for RetentionPolicy {
    fn from_ref(state: &ApiContext) -> Self {
        state.policy
    }
}
