mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::{str::FromStr, sync::Arc, time::Duration};

use axum::http::{header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE}, HeaderValue, Method};
use config::Config;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use crate::{
    db::{db::DBClient, preferencedb::PreferenceExt, referraldb::ReferralExt},
    service::{
        referral::ReferralService,
        site_resolver::SiteResolver,
        storage::{ObjectStorage, RemoteStorage},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub env: Config,
    pub referral_service: Arc<ReferralService>,
    pub site_resolver: Arc<SiteResolver>,
    pub preferences: Arc<dyn PreferenceExt>,
}

impl AppState {
    pub fn new(
        config: Config,
        referral_store: Arc<dyn ReferralExt>,
        preferences: Arc<dyn PreferenceExt>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        let referral_service = Arc::new(ReferralService::new(referral_store, config.origin()));
        let site_resolver = Arc::new(SiteResolver::new(storage, &config));

        Self {
            env: config,
            referral_service,
            site_resolver,
            preferences,
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|raw| LevelFilter::from_str(&raw).ok())
        .unwrap_or(LevelFilter::DEBUG);

    tracing_subscriber::fmt()
        .with_max_level(level)
        .init();

    let config = match Config::init() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("🔥 Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
    {
        Ok(pool) => {
            tracing::info!("✅ Connection to the database is successful!");
            pool
        }
        Err(err) => {
            tracing::error!("🔥 Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    let db_client = Arc::new(DBClient::new(pool));

    // Periodic pool health log
    let db_for_monitoring = db_client.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30));
        loop {
            interval.tick().await;
            let (size, idle) = db_for_monitoring.pool_status();
            tracing::debug!("🔍 Pool Status - Active: {}, Idle: {}, Total: {}",
                size.saturating_sub(idle as u32), idle, size);
        }
    });

    let allowed_origins = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("⚠️ Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect::<Vec<_>>();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT]);

    let storage = Arc::new(RemoteStorage::new(&config));
    let app_state = Arc::new(AppState::new(
        config.clone(),
        db_client.clone(),
        db_client,
        storage,
    ));

    let app = create_router(app_state).layer(cors);

    tracing::info!("🚀 Server is running on http://localhost:{}", config.port);
    tracing::info!(
        "🌐 Serving sites from bucket '{}' under /{}",
        config.sites_bucket, config.site_mount
    );

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port)).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("🔥 Failed to bind port {}: {}", config.port, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("🔥 Server error: {}", e);
        std::process::exit(1);
    }
}
