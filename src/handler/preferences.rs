// handler/preferences.rs
use std::sync::Arc;

use axum::{response::IntoResponse, routing::get, Extension, Json, Router};
use validator::Validate;

use crate::{
    dtos::preferencedtos::{ThemeData, ThemeResponseDto, UpdateThemeDto},
    error::HttpError,
    middleware::AuthenticatedUser,
    models::preferencemodel::Theme,
    service::{error::ServiceError, preferences::ThemeSettings},
    AppState,
};

pub fn preferences_handler() -> Router {
    Router::new().route("/theme", get(get_theme).put(update_theme))
}

fn theme_response(settings: &ThemeSettings) -> Json<ThemeResponseDto> {
    Json(ThemeResponseDto {
        status: "success".to_string(),
        data: ThemeData {
            theme: settings.theme(),
            classes: settings.classes().iter().map(|c| c.to_string()).collect(),
        },
    })
}

pub async fn get_theme(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, HttpError> {
    let settings = ThemeSettings::load(app_state.preferences.as_ref(), user.id).await;
    Ok(theme_response(&settings))
}

pub async fn update_theme(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<UpdateThemeDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let theme = Theme::parse(&body.theme).ok_or_else(|| {
        ServiceError::Validation("theme must be either 'light' or 'dark'".to_string())
    })?;

    let mut settings = ThemeSettings::load(app_state.preferences.as_ref(), user.id).await;
    settings.set(app_state.preferences.as_ref(), theme).await?;

    Ok(theme_response(&settings))
}
