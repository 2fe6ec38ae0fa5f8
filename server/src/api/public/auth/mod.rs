pub mod login;
pub mod register;

use serde::Deserialize;
use utoipa::ToSchema;

/// Username and password, as posted to `/register` and `/login`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
