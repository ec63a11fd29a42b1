use crate::routes::{album, media, report, root, upload, user, waitlist};
use axum::Json;
use common_services::api::album::interfaces::{
    AlbumDetailsResponse, AlbumSummary, EditImagesRequest, ReactionRequest, ReactionResponse,
    UpdateAlbumRequest,
};
use common_services::api::report::interfaces::CreateReportRequest;
use common_services::api::upload::interfaces::{
    AppendImagesResponse, CreateAlbumInfo, CreatedAlbumResponse, UploadFailure,
};
use common_services::api::waitlist::interfaces::JoinWaitlistRequest;
use common_services::database::album::{ImageRecord, Reaction};
use common_services::database::report::{Report, ReportStatus};
use common_services::database::waitlist::WaitlistEntry;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        root::handlers::root,
        root::handlers::health_check,
        // Album handlers
        album::handlers::get_album_handler,
        album::handlers::update_album_handler,
        album::handlers::delete_album_handler,
        album::handlers::edit_images_handler,
        album::handlers::react_handler,
        album::handlers::join_album_handler,
        album::handlers::leave_album_handler,
        // Upload handlers
        upload::handlers::upload_handler,
        upload::handlers::upload_to_album_handler,
        // User handlers
        user::handlers::get_my_albums_handler,
        user::handlers::get_joined_albums_handler,
        // Moderation & waitlist
        report::handlers::create_report_handler,
        waitlist::handlers::join_waitlist_handler,
        // Media
        media::handlers::download_media_handler,
    ),
    components(
        schemas(
            AlbumDetailsResponse,
            AlbumSummary,
            UpdateAlbumRequest,
            EditImagesRequest,
            ReactionRequest,
            ReactionResponse,
            ImageRecord,
            Reaction,
            CreateAlbumInfo,
            CreatedAlbumResponse,
            AppendImagesResponse,
            UploadFailure,
            CreateReportRequest,
            Report,
            ReportStatus,
            JoinWaitlistRequest,
            WaitlistEntry,
        ),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "plurr", description = "Time-limited photo lobbies"),
        (name = "Album", description = "Lobby details, membership, reactions, and image edits"),
        (name = "Upload", description = "Multipart image uploads"),
        (name = "User", description = "Per-user album listings"),
        (name = "Moderation", description = "Content reports"),
        (name = "Waitlist", description = "Signup records"),
        (name = "Media", description = "Stored image blobs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
