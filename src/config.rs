// config.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{0} has an invalid value: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub app_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    // Object storage holding the generated sites
    pub storage_url: String,
    pub storage_service_key: String,
    pub sites_bucket: String,
    pub site_mount: String,
    pub site_cache_max_age: u32,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn init() -> Result<Config, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let app_url = required("APP_URL")?;
        let jwt_secret = required("JWT_SECRET_KEY")?;
        let port = parsed("PORT", 8000_u16)?;

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_else(|_| vec![app_url.clone()]);

        let storage_url = required("STORAGE_URL")?;
        let storage_service_key = required("STORAGE_SERVICE_KEY")?;
        let sites_bucket = std::env::var("SITES_BUCKET").unwrap_or_else(|_| "sites".to_string());
        let site_mount = std::env::var("SITE_MOUNT")
            .map(|mount| mount.trim_matches('/').to_string())
            .unwrap_or_else(|_| "serve-site".to_string());
        let site_cache_max_age = parsed("SITE_CACHE_MAX_AGE", 3600_u32)?;

        if site_mount.is_empty() || site_mount.contains('/') {
            return Err(ConfigError::Invalid("SITE_MOUNT", site_mount));
        }

        Ok(Config {
            database_url,
            app_url,
            jwt_secret,
            port,
            allowed_origins,
            storage_url,
            storage_service_key,
            sites_bucket,
            site_mount,
            site_cache_max_age,
        })
    }

    /// Public origin without a trailing slash.
    pub fn origin(&self) -> &str {
        self.app_url.trim_end_matches('/')
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Config {
        Config {
            database_url: "postgres://localhost/sitegen".to_string(),
            app_url: "https://sitegen.test/".to_string(),
            jwt_secret: "test-secret".to_string(),
            port: 8000,
            allowed_origins: vec!["https://sitegen.test".to_string()],
            storage_url: "http://storage.test".to_string(),
            storage_service_key: "service-key".to_string(),
            sites_bucket: "sites".to_string(),
            site_mount: "serve-site".to_string(),
            site_cache_max_age: 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_drops_trailing_slash() {
        let config = Config::for_tests();
        assert_eq!(config.origin(), "https://sitegen.test");
    }
}
