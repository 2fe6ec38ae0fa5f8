use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}

/// One line of a recipe's ingredient list. Quantities are kept as text so
/// values like "1/2" or "a pinch" survive untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Ingredient {
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub quantity: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub unit: String,
}

/// A rating left on a recipe. Stored inside the recipe document, never on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub comment: String,
    pub rating: u8,
    pub author_id: Uuid,
    pub author_username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Sequential recipe number, the only identifier exposed by the API.
    pub id: i64,
    pub name: String,
    pub cuisine: String,
    /// Minutes, always positive.
    pub cooking_time: i32,
    pub ingredients: Vec<Ingredient>,
    pub nutritional_info: String,
    pub method_steps: Vec<String>,
    pub youtube_link: String,
    pub image_url: String,
    pub comments: Vec<Comment>,
    /// Mean of comment ratings rounded to one decimal, 0 without comments.
    pub rating: f64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Row shape of the recipes table; the list columns are JSONB documents.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeRow {
    pub id: i64,
    pub name: String,
    pub cuisine: String,
    pub cooking_time: i32,
    pub ingredients: serde_json::Value,
    pub nutritional_info: String,
    pub method_steps: serde_json::Value,
    pub youtube_link: String,
    pub image_url: String,
    pub comments: serde_json::Value,
    pub rating: f64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecipeRow {
    pub fn from_recipe(recipe: &Recipe) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: recipe.id,
            name: recipe.name.clone(),
            cuisine: recipe.cuisine.clone(),
            cooking_time: recipe.cooking_time,
            ingredients: serde_json::to_value(&recipe.ingredients)?,
            nutritional_info: recipe.nutritional_info.clone(),
            method_steps: serde_json::to_value(&recipe.method_steps)?,
            youtube_link: recipe.youtube_link.clone(),
            image_url: recipe.image_url.clone(),
            comments: serde_json::to_value(&recipe.comments)?,
            rating: recipe.rating,
            created_by: recipe.created_by.clone(),
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        })
    }

    pub fn into_recipe(self) -> Result<Recipe, serde_json::Error> {
        Ok(Recipe {
            id: self.id,
            name: self.name,
            cuisine: self.cuisine,
            cooking_time: self.cooking_time,
            ingredients: serde_json::from_value(self.ingredients)?,
            nutritional_info: self.nutritional_info,
            method_steps: serde_json::from_value(self.method_steps)?,
            youtube_link: self.youtube_link,
            image_url: self.image_url,
            comments: serde_json::from_value(self.comments)?,
            rating: self.rating,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

// Form clients send quantities both as "1" and as 1.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
        Raw::Null => String::new(),
    })
}
