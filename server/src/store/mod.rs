//! Persistence for users, recipes and named counters.
//!
//! The production backend is PostgreSQL through diesel; tests run against
//! [`MemoryStore`]. Both give the same guarantees: `next_id` is atomic, and
//! recipe writes are last-write-wins on the whole document.

#[cfg(test)]
mod memory;
mod postgres;

#[cfg(test)]
pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::models::{Recipe, User};
use thiserror::Error;

/// Counter that hands out public recipe numbers.
pub const RECIPE_COUNTER: &str = "recipe_id";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("database error: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("username already exists")]
    DuplicateUsername,

    #[error("recipe {id} has a malformed document: {source}")]
    Corrupt {
        id: i64,
        #[source]
        source: serde_json::Error,
    },
}

pub trait RecipeStore: Send + Sync {
    /// Insert a user; fails with [`StoreError::DuplicateUsername`] if taken.
    fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError>;

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Increment the named counter and return its new value, starting at 1.
    fn next_id(&self, counter: &str) -> Result<i64, StoreError>;

    fn insert_recipe(&self, recipe: &Recipe) -> Result<(), StoreError>;

    /// All recipes ordered by id. `search` keeps recipes whose name or cuisine
    /// contains it, ignoring case.
    fn list_recipes(&self, search: Option<&str>) -> Result<Vec<Recipe>, StoreError>;

    fn get_recipe(&self, id: i64) -> Result<Option<Recipe>, StoreError>;

    /// Overwrite the stored document. Returns false if the recipe is gone.
    fn update_recipe(&self, recipe: &Recipe) -> Result<bool, StoreError>;

    /// Remove a recipe, returning what was stored.
    fn delete_recipe(&self, id: i64) -> Result<Option<Recipe>, StoreError>;
}
