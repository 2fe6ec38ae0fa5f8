//! In-memory store for tests.

use super::{RecipeStore, StoreError};
use crate::models::{Recipe, User};
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    users: HashMap<String, User>,
    counters: HashMap<String, i64>,
    recipes: BTreeMap<i64, Recipe>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    failing_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make recipe inserts and updates fail like a lost database connection.
    pub fn fail_writes(&self) {
        self.failing_writes.store(true, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Query(
                diesel::result::Error::BrokenTransactionManager,
            ));
        }
        Ok(())
    }
}

impl RecipeStore for MemoryStore {
    fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.contains_key(username) {
            return Err(StoreError::DuplicateUsername);
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        inner.users.insert(username.to_string(), user.clone());
        Ok(user)
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.inner.lock().unwrap().users.get(username).cloned())
    }

    fn next_id(&self, counter: &str) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let value = inner.counters.entry(counter.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }

    fn insert_recipe(&self, recipe: &Recipe) -> Result<(), StoreError> {
        self.check_writable()?;
        self.inner
            .lock()
            .unwrap()
            .recipes
            .insert(recipe.id, recipe.clone());
        Ok(())
    }

    fn list_recipes(&self, search: Option<&str>) -> Result<Vec<Recipe>, StoreError> {
        let needle = search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        Ok(self
            .inner
            .lock()
            .unwrap()
            .recipes
            .values()
            .filter(|r| match &needle {
                Some(n) => r.name.to_lowercase().contains(n) || r.cuisine.to_lowercase().contains(n),
                None => true,
            })
            .cloned()
            .collect())
    }

    fn get_recipe(&self, id: i64) -> Result<Option<Recipe>, StoreError> {
        Ok(self.inner.lock().unwrap().recipes.get(&id).cloned())
    }

    fn update_recipe(&self, recipe: &Recipe) -> Result<bool, StoreError> {
        self.check_writable()?;
        let mut inner = self.inner.lock().unwrap();
        match inner.recipes.get_mut(&recipe.id) {
            Some(stored) => {
                *stored = recipe.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_recipe(&self, id: i64) -> Result<Option<Recipe>, StoreError> {
        Ok(self.inner.lock().unwrap().recipes.remove(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_independent() {
        let store = MemoryStore::new();
        assert_eq!(store.next_id("a").unwrap(), 1);
        assert_eq!(store.next_id("a").unwrap(), 2);
        assert_eq!(store.next_id("b").unwrap(), 1);
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let store = MemoryStore::new();
        store.create_user("alice", "hash").unwrap();
        assert!(matches!(
            store.create_user("alice", "other"),
            Err(StoreError::DuplicateUsername)
        ));
    }

    #[test]
    fn test_failing_writes_keep_reads_working() {
        let store = MemoryStore::new();
        store.fail_writes();
        assert_eq!(store.next_id("a").unwrap(), 1);
        assert!(matches!(store.delete_recipe(1), Ok(None)));
        assert!(store.list_recipes(None).unwrap().is_empty());
    }
}
