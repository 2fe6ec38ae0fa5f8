use super::{RecipeStore, StoreError};
use crate::db::DbPool;
use crate::models::{NewUser, Recipe, RecipeRow, User};
use crate::schema::{counters, recipes, users};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn decode(row: RecipeRow) -> Result<Recipe, StoreError> {
    let id = row.id;
    row.into_recipe()
        .map_err(|source| StoreError::Corrupt { id, source })
}

fn encode(recipe: &Recipe) -> Result<RecipeRow, StoreError> {
    RecipeRow::from_recipe(recipe).map_err(|source| StoreError::Corrupt {
        id: recipe.id,
        source,
    })
}

/// Escape LIKE wildcards so user search text matches literally.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

impl RecipeStore for PgStore {
    fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut conn = self.pool.get()?;

        let new_user = NewUser {
            username,
            password_hash,
        };

        match diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)
        {
            Ok(user) => Ok(user),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(StoreError::DuplicateUsername)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.get()?;

        let user = users::table
            .filter(users::username.eq(username))
            .select(User::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(user)
    }

    fn next_id(&self, counter: &str) -> Result<i64, StoreError> {
        let mut conn = self.pool.get()?;

        // Single statement: Postgres serializes concurrent upserts on the row.
        let value = diesel::insert_into(counters::table)
            .values((counters::name.eq(counter), counters::value.eq(1_i64)))
            .on_conflict(counters::name)
            .do_update()
            .set(counters::value.eq(counters::value + 1_i64))
            .returning(counters::value)
            .get_result::<i64>(&mut conn)?;

        Ok(value)
    }

    fn insert_recipe(&self, recipe: &Recipe) -> Result<(), StoreError> {
        let mut conn = self.pool.get()?;
        let row = encode(recipe)?;

        diesel::insert_into(recipes::table)
            .values(&row)
            .execute(&mut conn)?;

        Ok(())
    }

    fn list_recipes(&self, search: Option<&str>) -> Result<Vec<Recipe>, StoreError> {
        let mut conn = self.pool.get()?;

        let mut query = recipes::table
            .select(RecipeRow::as_select())
            .order(recipes::id.asc())
            .into_boxed();

        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = like_pattern(search);
            query = query.filter(
                recipes::name
                    .ilike(pattern.clone())
                    .or(recipes::cuisine.ilike(pattern)),
            );
        }

        query
            .load::<RecipeRow>(&mut conn)?
            .into_iter()
            .map(decode)
            .collect()
    }

    fn get_recipe(&self, id: i64) -> Result<Option<Recipe>, StoreError> {
        let mut conn = self.pool.get()?;

        recipes::table
            .find(id)
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(decode)
            .transpose()
    }

    fn update_recipe(&self, recipe: &Recipe) -> Result<bool, StoreError> {
        let mut conn = self.pool.get()?;
        let row = encode(recipe)?;

        let updated = diesel::update(recipes::table.find(recipe.id))
            .set(&row)
            .execute(&mut conn)?;

        Ok(updated > 0)
    }

    fn delete_recipe(&self, id: i64) -> Result<Option<Recipe>, StoreError> {
        let mut conn = self.pool.get()?;

        diesel::delete(recipes::table.find(id))
            .returning(RecipeRow::as_returning())
            .get_result(&mut conn)
            .optional()?
            .map(decode)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool;
    use chrono::Utc;
    use std::sync::Arc;
    use std::thread;
    use uuid::Uuid;

    /// Connects only when `DATABASE_URL` is set; these tests write scratch rows.
    fn pg_store() -> Option<PgStore> {
        let url = std::env::var("DATABASE_URL").ok()?;
        Some(PgStore::new(create_pool(&url).unwrap()))
    }

    fn scratch_recipe(id: i64, name: String, created_by: &str) -> Recipe {
        let now = Utc::now();
        Recipe {
            id,
            name,
            cuisine: "Test".to_string(),
            cooking_time: 10,
            ingredients: Vec::new(),
            nutritional_info: String::new(),
            method_steps: vec!["Stir".to_string()],
            youtube_link: String::new(),
            image_url: String::new(),
            comments: Vec::new(),
            rating: 0.0,
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Ids far above anything the recipe counter hands out.
    fn scratch_id() -> i64 {
        (Uuid::new_v4().as_u64_pair().0 >> 2) as i64 + (1 << 61)
    }

    #[test]
    #[ignore = "needs DATABASE_URL pointing at a scratch Postgres"]
    fn test_counter_is_atomic_under_concurrency() {
        let Some(store) = pg_store() else {
            return;
        };
        let store = Arc::new(store);
        let counter = format!("test_{}", Uuid::new_v4().simple());

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                let counter = counter.clone();
                thread::spawn(move || store.next_id(&counter).unwrap())
            })
            .collect();
        let mut ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();

        assert_eq!(ids, (1..=50).collect::<Vec<i64>>());
    }

    #[test]
    #[ignore = "needs DATABASE_URL pointing at a scratch Postgres"]
    fn test_search_treats_wildcards_literally() {
        let Some(store) = pg_store() else {
            return;
        };
        let tag = Uuid::new_v4().simple().to_string();
        let owner = format!("owner_{tag}");
        store.create_user(&owner, "hash").unwrap();

        let literal = scratch_recipe(scratch_id(), format!("{tag}% Soup"), &owner);
        let lookalike = scratch_recipe(scratch_id(), format!("{tag}0 Soup"), &owner);
        store.insert_recipe(&literal).unwrap();
        store.insert_recipe(&lookalike).unwrap();

        let found = store
            .list_recipes(Some(&format!("{}%", tag.to_uppercase())))
            .unwrap();
        let by_underscore = store
            .list_recipes(Some(&format!("{tag}_ soup")))
            .unwrap();

        store.delete_recipe(literal.id).unwrap();
        store.delete_recipe(lookalike.id).unwrap();

        let ids: Vec<i64> = found.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![literal.id]);
        assert!(by_underscore.is_empty());
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("thai"), "%thai%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
