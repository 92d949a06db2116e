// handler/site.rs
use std::{any::Any, sync::Arc};

use axum::{
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Extension, Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::{service::site_resolver::SiteResolution, AppState};

const SITE_NOT_FOUND: &str = "Site not found";
const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Site routes plus the router-wide fallback, all behind the panic catcher.
pub fn site_handler(mount: &str) -> Router {
    Router::new()
        .route(&format!("/{}", mount), any(serve_site))
        .route(&format!("/{}/*path", mount), any(serve_site))
        .fallback(site_fallback)
        .layer(CatchPanicLayer::custom(handle_panic))
}

fn plain_text(status: StatusCode, body: &'static str) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain")],
        body,
    )
        .into_response()
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Error serving site: {}", detail);

    plain_text(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
}

pub fn site_response(resolution: SiteResolution, cache_control: String) -> Response {
    match resolution {
        SiteResolution::Found(html) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
                (header::CACHE_CONTROL, cache_control),
                (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
            ],
            html,
        )
            .into_response(),
        SiteResolution::NotFound => plain_text(StatusCode::NOT_FOUND, SITE_NOT_FOUND),
        // Storage outages still answer 404 so clients see the same response as a missing site.
        SiteResolution::StorageUnavailable(e) => {
            tracing::error!("Storage error while serving site: {}", e);
            plain_text(StatusCode::NOT_FOUND, SITE_NOT_FOUND)
        }
        SiteResolution::Failed(reason) => {
            tracing::error!("Error serving site: {}", reason);
            plain_text(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn serve_site(
    Extension(app_state): Extension<Arc<AppState>>,
    uri: Uri,
) -> Response {
    let resolver = &app_state.site_resolver;
    let resolution = resolver.resolve(uri.path()).await;
    site_response(resolution, resolver.cache_control())
}

/// `/{mount}/` has no wildcard match, so the fallback hands mount-prefixed paths back to `serve_site`.
async fn site_fallback(
    Extension(app_state): Extension<Arc<AppState>>,
    uri: Uri,
) -> Response {
    let first_segment = uri.path().split('/').find(|segment| !segment.is_empty());
    if first_segment == Some(app_state.site_resolver.mount()) {
        return serve_site(Extension(app_state), uri).await;
    }

    StatusCode::NOT_FOUND.into_response()
}
