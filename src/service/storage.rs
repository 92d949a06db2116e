// service/storage.rs
use async_trait::async_trait;
use axum::{body::Bytes, http::StatusCode};

use crate::{config::Config, service::error::StorageError};

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// `Ok(None)` when the object does not exist.
    async fn download(&self, bucket: &str, path: &str) -> Result<Option<Bytes>, StorageError>;
}

/// Object storage reached over its REST API (`GET {base}/object/{bucket}/{path}`).
pub struct RemoteStorage {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl RemoteStorage {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.storage_url.trim_end_matches('/').to_string(),
            service_key: config.storage_service_key.clone(),
        }
    }

    fn object_url(&self, bucket: &str, path: &str) -> Result<String, StorageError> {
        if bucket.is_empty() || path.is_empty() {
            return Err(StorageError::InvalidPath(format!("{}/{}", bucket, path)));
        }

        let encoded = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        Ok(format!(
            "{}/object/{}/{}",
            self.base_url,
            urlencoding::encode(bucket),
            encoded
        ))
    }
}

/// Some storage gateways answer a missing object with 400 and a `not_found` error payload.
fn is_missing_object(status: StatusCode, body: &str) -> bool {
    if status == StatusCode::NOT_FOUND {
        return true;
    }
    if status != StatusCode::BAD_REQUEST {
        return false;
    }

    serde_json::from_str::<serde_json::Value>(body)
        .map(|payload| {
            let error = payload["error"].as_str().unwrap_or("");
            let code = payload["statusCode"].as_str().unwrap_or("");
            error.eq_ignore_ascii_case("not_found") || code == "404"
        })
        .unwrap_or(false)
}

#[async_trait]
impl ObjectStorage for RemoteStorage {
    async fn download(&self, bucket: &str, path: &str) -> Result<Option<Bytes>, StorageError> {
        let url = self.object_url(bucket, path)?;

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("apikey", &self.service_key)
            .send()
            .await?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_success() {
            return Ok(Some(response.bytes().await?));
        }

        let body = response.text().await.unwrap_or_default();
        if is_missing_object(status, &body) {
            tracing::debug!("Object {}/{} not found", bucket, path);
            return Ok(None);
        }

        Err(StorageError::Status { status, body })
    }
}
