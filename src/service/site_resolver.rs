// service/site_resolver.rs
use std::sync::Arc;

use crate::{
    config::Config,
    service::{error::StorageError, storage::ObjectStorage},
};

/// Outcome of looking up a generated site. The HTTP boundary decides the status for each case.
#[derive(Debug)]
pub enum SiteResolution {
    Found(String),
    NotFound,
    /// Storage failed for a reason other than absence.
    StorageUnavailable(StorageError),
    Failed(String),
}

/// Strips the mount segment, drops empty segments and percent-decodes the rest.
/// `None` when nothing is left or a segment does not decode to UTF-8.
pub fn resolve_site_path(path: &str, mount: &str) -> Option<String> {
    let mut segments = path.split('/').filter(|segment| !segment.is_empty()).peekable();

    if segments.peek() == Some(&mount) {
        segments.next();
    }

    let decoded = segments
        .map(|segment| urlencoding::decode(segment).map(|s| s.into_owned()))
        .collect::<Result<Vec<_>, _>>()
        .ok()?;

    let site_path = decoded.join("/");
    if site_path.is_empty() {
        None
    } else {
        Some(site_path)
    }
}

/// Any `.` in the path counts as an extension, not just one in the last segment.
pub fn object_path_for(site_path: &str) -> String {
    if site_path.ends_with(".html") || site_path.contains('.') {
        site_path.to_string()
    } else {
        format!("{}/index.html", site_path)
    }
}

pub struct SiteResolver {
    storage: Arc<dyn ObjectStorage>,
    bucket: String,
    mount: String,
    cache_max_age: u32,
}

impl SiteResolver {
    pub fn new(storage: Arc<dyn ObjectStorage>, config: &Config) -> Self {
        Self {
            storage,
            bucket: config.sites_bucket.clone(),
            mount: config.site_mount.clone(),
            cache_max_age: config.site_cache_max_age,
        }
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }

    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.cache_max_age)
    }

    pub async fn resolve(&self, request_path: &str) -> SiteResolution {
        let Some(site_path) = resolve_site_path(request_path, &self.mount) else {
            tracing::debug!("No site path in request {}", request_path);
            return SiteResolution::NotFound;
        };

        let file_path = object_path_for(&site_path);
        tracing::debug!("Serving {}/{}", self.bucket, file_path);

        match self.storage.download(&self.bucket, &file_path).await {
            Ok(Some(bytes)) => SiteResolution::Found(String::from_utf8_lossy(&bytes).into_owned()),
            Ok(None) => {
                tracing::warn!("Site file not found: {}", file_path);
                SiteResolution::NotFound
            }
            Err(StorageError::InvalidPath(path)) => {
                SiteResolution::Failed(format!("invalid object path {}", path))
            }
            Err(e) => SiteResolution::StorageUnavailable(e),
        }
    }
}
