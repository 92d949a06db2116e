// routes.rs
use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        checkout::checkout_handler, preferences::preferences_handler,
        referral::referral_handler, site::site_handler,
    },
    middleware::auth,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest(
            "/referrals",
            referral_handler()
                .layer(middleware::from_fn(auth))
        )
        .nest(
            "/preferences",
            preferences_handler()
                .layer(middleware::from_fn(auth))
        )
        .nest("/checkout", checkout_handler());

    let site_route = site_handler(app_state.site_resolver.mount());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
        .merge(site_route)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state))
}
