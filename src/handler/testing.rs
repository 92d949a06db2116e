// Shared helpers for driving the router in handler tests.
use std::sync::Arc;

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    config::Config,
    db::{preferencedb::PreferenceExt, referraldb::ReferralExt},
    routes::create_router,
    service::{
        preferences::tests::FakePreferenceStore,
        referral::tests::{Allocation, FakeReferralStore},
        site_resolver::tests::FakeStorage,
        storage::ObjectStorage,
    },
    utils::token,
    AppState,
};

pub fn app_with(
    referrals: Arc<dyn ReferralExt>,
    preferences: Arc<dyn PreferenceExt>,
    storage: Arc<dyn ObjectStorage>,
) -> Router {
    let state = AppState::new(Config::for_tests(), referrals, preferences, storage);
    create_router(Arc::new(state))
}

pub fn default_app() -> Router {
    app_with(
        Arc::new(FakeReferralStore::new(Allocation::Missing, vec![])),
        Arc::new(FakePreferenceStore::default()),
        Arc::new(FakeStorage::default()),
    )
}

pub fn bearer(user_id: Uuid) -> String {
    let token = token::tests::create_token(
        &user_id.to_string(),
        Config::for_tests().jwt_secret.as_bytes(),
        5,
    )
    .unwrap();
    format!("Bearer {}", token)
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

pub fn get(uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("Authorization", auth);
    }
    builder.body(Body::empty()).unwrap()
}
