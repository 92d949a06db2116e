// handler/referral.rs
use std::sync::Arc;

use axum::{response::IntoResponse, routing::get, Extension, Json, Router};

use crate::{
    dtos::referraldtos::{ReferralLinkDto, ReferralOverviewDto, ReferralResponseDto},
    error::HttpError,
    middleware::AuthenticatedUser,
    AppState,
};

pub fn referral_handler() -> Router {
    Router::new()
        .route("/", get(get_referral_overview))
        .route("/link", get(get_referral_link))
}

pub async fn get_referral_overview(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, HttpError> {
    let summary = app_state
        .referral_service
        .fetch_referral_data(Some(user.id))
        .await;

    let referral_link = app_state
        .referral_service
        .referral_link(summary.referral_code.as_deref());

    Ok(Json(ReferralResponseDto {
        status: "success".to_string(),
        data: ReferralOverviewDto::from_summary(summary, referral_link),
    }))
}

pub async fn get_referral_link(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, HttpError> {
    let summary = app_state
        .referral_service
        .fetch_referral_data(Some(user.id))
        .await;

    let referral_link = app_state
        .referral_service
        .referral_link(summary.referral_code.as_deref());

    Ok(Json(ReferralResponseDto {
        status: "success".to_string(),
        data: ReferralLinkDto {
            referral_code: summary.referral_code,
            referral_link,
        },
    }))
}
