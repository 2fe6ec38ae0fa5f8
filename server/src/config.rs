use std::env;
use thiserror::Error;
use tracing::info;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Process configuration, read once at boot.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub media_host_url: String,
    pub media_api_key: String,
    pub media_api_secret: String,
    pub port: u16,
    /// Usernames that receive the admin claim when they log in.
    pub admin_usernames: Vec<String>,
    pub token_ttl_minutes: i64,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;
        let media_host_url = required("MEDIA_HOST_URL")?;
        let media_api_key = required("MEDIA_API_KEY")?;
        let media_api_secret = required("MEDIA_API_SECRET")?;

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                message: format!("{e}"),
            })?,
            None => {
                info!("PORT not set, using default: {DEFAULT_PORT}");
                DEFAULT_PORT
            }
        };

        let token_ttl_minutes = match lookup("TOKEN_TTL_MINUTES") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::Invalid {
                key: "TOKEN_TTL_MINUTES",
                message: format!("{e}"),
            })?,
            None => DEFAULT_TOKEN_TTL_MINUTES,
        };

        let admin_usernames = lookup("ADMIN_USERNAMES")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let cors_allowed_origin = lookup("CORS_ALLOWED_ORIGIN")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Ok(Self {
            database_url,
            jwt_secret,
            media_host_url,
            media_api_key,
            media_api_secret,
            port,
            admin_usernames,
            token_ttl_minutes,
            cors_allowed_origin,
        })
    }
}
