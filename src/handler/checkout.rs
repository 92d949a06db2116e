// handler/checkout.rs
use axum::{extract::Query, response::IntoResponse, routing::get, Json, Router};
use validator::Validate;

use crate::{
    dtos::checkoutdtos::{
        CheckoutResponseDto, CheckoutResultData, CheckoutSuccessQueryDto, NavigationLink,
    },
    error::HttpError,
};

pub fn checkout_handler() -> Router {
    Router::new()
        .route("/success", get(checkout_success))
        .route("/cancel", get(checkout_cancel))
}

// The payment provider redirects here; nothing is verified against it.
pub async fn checkout_success(
    Query(query): Query<CheckoutSuccessQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if let Some(ref session_id) = query.session_id {
        tracing::info!("Checkout completed for session {}", session_id);
    }

    Ok(Json(CheckoutResponseDto {
        status: "success".to_string(),
        data: CheckoutResultData {
            session_id: query.session_id,
            message: "Payment successful! Your subscription is now active.".to_string(),
            links: vec![
                NavigationLink::new("Go to projects", "/projects"),
                NavigationLink::new("Manage subscription", "/settings"),
            ],
        },
    }))
}

pub async fn checkout_cancel() -> impl IntoResponse {
    Json(CheckoutResponseDto {
        status: "cancelled".to_string(),
        data: CheckoutResultData {
            session_id: None,
            message: "Checkout was cancelled. You have not been charged.".to_string(),
            links: vec![
                NavigationLink::new("View plans", "/pricing"),
                NavigationLink::new("Back to projects", "/projects"),
            ],
        },
    })
}
