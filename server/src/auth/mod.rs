mod crypto;
mod extractor;
mod middleware;
pub mod policy;
mod token;

pub use crypto::{hash_password, verify_password};
pub use extractor::AuthUser;
pub use middleware::require_auth;
pub use token::{Principal, TokenService};
