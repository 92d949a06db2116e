use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::preferencemodel::Theme;

fn validate_theme(theme: &str) -> Result<(), ValidationError> {
    match Theme::parse(theme) {
        Some(_) => Ok(()),
        None => {
            let mut error = ValidationError::new("theme");
            error.message = Some("theme must be either 'light' or 'dark'".into());
            Err(error)
        }
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateThemeDto {
    #[validate(
        length(min = 1, message = "theme is required"),
        custom = "validate_theme"
    )]
    pub theme: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeData {
    pub theme: Theme,
    pub classes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeResponseDto {
    pub status: String,
    pub data: ThemeData,
}
