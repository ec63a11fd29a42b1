use crate::api_state::ApiContext;
use crate::create_router;
use crate::sweeper::spawn_sweeper;
use app_state::{AppSettings, constants};
use axum::extract::DefaultBodyLimit;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use common_services::api::auth::verifier::TokenVerifier;
use common_services::media_store::MediaStore;
use common_services::retention::RetentionPolicy;
use http::{HeaderValue, header};
use reqwest::Client;
use sqlx::PgPool;
use std::iter::once;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors;
use tower_http::cors::CorsLayer;
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub async fn serve(pool: PgPool, settings: AppSettings) -> Result<()> {
    // --- Server Startup ---
    info!("🚀 Initializing server...");
    let media = MediaStore::new(settings.media.media_folder.clone(), settings.api.base_url());
    let verifier = TokenVerifier::new(
        Client::new(),
        settings.secrets.jwks_url.clone(),
        Duration::from_secs(constants().auth.jwks_cache_minutes * 60),
    );
    let policy = RetentionPolicy::from(&constants().retention);

    let api_state = ApiContext {
        pool: pool.clone(),
        settings: settings.clone(),
        media: media.clone(),
        verifier,
        policy,
    };

    let _sweeper = spawn_sweeper(
        pool,
        media,
        policy,
        constants().retention.sweep_interval_minutes,
    );

    // --- CORS Configuration ---
    let allowed_origins: Vec<HeaderValue> = settings
        .api
        .allowed_origins
        .iter()
        .filter_map(|s| match s.parse() {
            Ok(hv) => Some(hv),
            Err(e) => {
                error!("Invalid CORS origin configured: {} - Error: {}", s, e);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_methods(cors::Any)
        .allow_origin(allowed_origins)
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            header::USER_AGENT,
        ]);

    // A full batch of maximum-size files must fit in one upload request.
    let uploads = &constants().uploads;
    let body_limit = (uploads.max_file_bytes as usize) * uploads.max_album_images;

    // --- Create Router ---
    let app = create_router(api_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(SetSensitiveRequestHeadersLayer::new(once(
            header::AUTHORIZATION,
        )))
        .layer(DefaultBodyLimit::max(body_limit));

    let addr: SocketAddr = format!("{}:{}", settings.api.host, settings.api.port)
        .parse()
        .map_err(|e| eyre!("Invalid address: {}", e))?;

    info!("🐸 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
