//! Static asset handler.
//!
//! Serves the embedded stylesheet and icons so pages rendered with
//! `--local-assets` work against this server.

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use cloudflare_error_page::get_resource;
use tracing::{debug, instrument};

/// Handler for `/cdn-cgi/{*path}`.
#[instrument]
pub async fn resource_handler(Path(path): Path<String>) -> Response {
    match get_resource(&format!("cdn-cgi/{}", path)) {
        Some(resource) => {
            debug!("Serving embedded resource {}", resource.path);
            (
                [
                    (header::CONTENT_TYPE, resource.content_type),
                    (header::CACHE_CONTROL, "public, max-age=86400"),
                ],
                resource.bytes,
            )
                .into_response()
        }
        None => {
            debug!("Unknown resource requested: {}", path);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}
