use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Bounds on token lifetime, in minutes.
pub const MIN_TTL_MINUTES: i64 = 10;
pub const MAX_TTL_MINUTES: i64 = 60;

/// The authenticated caller, decoded from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub username: String,
    pub admin: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    username: String,
    #[serde(default)]
    admin: bool,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256 bearer tokens.
///
/// Admin status is decided here, at issuance, from the configured allow-list
/// and carried as a claim. Nothing downstream compares usernames to decide it.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    admins: HashSet<String>,
}

impl TokenService {
    pub fn new(secret: &str, ttl_minutes: i64, admins: impl IntoIterator<Item = String>) -> Self {
        let ttl_minutes = ttl_minutes.clamp(MIN_TTL_MINUTES, MAX_TTL_MINUTES);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
            admins: admins.into_iter().collect(),
        }
    }

    pub fn is_admin(&self, username: &str) -> bool {
        self.admins.contains(username)
    }

    pub fn issue(&self, user_id: Uuid, username: &str) -> Result<String, AppError> {
        self.issue_at(user_id, username, Utc::now())
    }

    fn issue_at(
        &self,
        user_id: Uuid,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            admin: self.is_admin(username),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {}", e)))
    }

    /// Check signature and expiry. Any failure is reported as `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<Principal, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            AppError::InvalidToken
        })?;

        Ok(Principal {
            user_id: data.claims.sub,
            username: data.claims.username,
            admin: data.claims.admin,
        })
    }
}
