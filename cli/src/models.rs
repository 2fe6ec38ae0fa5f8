//! Response shapes returned by the RecipeHub server.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub comment: String,
    pub rating: u8,
    pub author_username: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub cuisine: String,
    pub cooking_time: i32,
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub nutritional_info: String,
    pub method_steps: Vec<String>,
    #[serde(default)]
    pub youtube_link: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub rating: f64,
    pub created_by: String,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    #[serde(default)]
    pub admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct RecipeMessage {
    pub message: String,
    pub recipe: Recipe,
}

#[derive(Debug, Deserialize)]
pub struct Health {
    pub status: String,
}
