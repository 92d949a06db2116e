use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct CheckoutSuccessQueryDto {
    #[validate(length(min = 1, max = 255, message = "session_id must be between 1 and 255 characters"))]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct NavigationLink {
    pub label: String,
    pub href: String,
}

impl NavigationLink {
    pub fn new(label: &str, href: &str) -> Self {
        NavigationLink {
            label: label.to_string(),
            href: href.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutResultData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub message: String,
    pub links: Vec<NavigationLink>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutResponseDto {
    pub status: String,
    pub data: CheckoutResultData,
}
