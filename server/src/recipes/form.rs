//! Turning submitted recipe forms into validated drafts and patches.
//!
//! Forms arrive as flat text fields (the structured ones serialized as JSON)
//! plus an optional image. Everything here is pure, so a rejected form never
//! reaches the store.

use crate::error::AppError;
use crate::media::{process_image, ImageUpload};
use crate::models::Ingredient;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static YOUTUBE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(youtube\.com|youtu\.be)/.+$").expect("valid regex")
});

/// Raw multipart submission, before validation.
#[derive(Debug, Default, Clone)]
pub struct RecipeForm {
    fields: HashMap<String, String>,
    image: Option<RawImage>,
}

#[derive(Debug, Clone)]
pub struct RawImage {
    pub data: Vec<u8>,
    pub file_name: Option<String>,
}

impl RecipeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    #[cfg(test)]
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.insert_field(name, value);
        self
    }

    pub fn set_image(&mut self, data: Vec<u8>, file_name: Option<String>) {
        self.image = Some(RawImage { data, file_name });
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// A field in a partial update: left alone, reset to empty, or replaced.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    Absent,
    Clear,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T: Default> Patch<T> {
    pub fn apply_to(self, target: &mut T) {
        match self {
            Patch::Absent => {}
            Patch::Clear => *target = T::default(),
            Patch::Set(value) => *target = value,
        }
    }
}

/// A fully validated recipe ready to be stored.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub name: String,
    pub cuisine: String,
    pub cooking_time: i32,
    pub ingredients: Vec<Ingredient>,
    pub nutritional_info: String,
    pub method_steps: Vec<String>,
    pub youtube_link: String,
    pub image: Option<ImageUpload>,
}

/// Validated partial update. Required fields can only be replaced, never
/// cleared; optional text fields and the image may be cleared.
#[derive(Debug, Clone)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub cuisine: Option<String>,
    pub cooking_time: Option<i32>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub method_steps: Option<Vec<String>>,
    pub nutritional_info: Patch<String>,
    pub youtube_link: Patch<String>,
    pub image: Patch<ImageUpload>,
}

impl NewRecipe {
    pub fn from_form(form: RecipeForm) -> Result<Self, AppError> {
        let name = required_text(form.get("name"), "Name is required")
            .and_then(|text| within_column(text, "Name"))?;
        let cuisine = required_text(form.get("cuisine"), "Cuisine is required")
            .and_then(|text| within_column(text, "Cuisine"))?;
        let cooking_time = match form.get("cookingTime") {
            Some(raw) if !raw.trim().is_empty() => parse_cooking_time(raw)?,
            _ => return Err(AppError::validation("Cooking time is required")),
        };
        let ingredients = match form.get("ingredients") {
            Some(raw) => parse_ingredients(raw)?,
            None => return Err(AppError::validation("At least one ingredient is required")),
        };
        let method_steps = match form.get("methodSteps") {
            Some(raw) => parse_method_steps(raw)?,
            None => return Err(AppError::validation("At least one method step is required")),
        };
        let youtube_link = validate_youtube_link(form.get("youtubeLink").unwrap_or(""))?;
        let nutritional_info = form
            .get("nutritionalInfo")
            .unwrap_or("")
            .trim()
            .to_string();
        let image = form.image.map(validate_image).transpose()?;

        Ok(Self {
            name,
            cuisine,
            cooking_time,
            ingredients,
            nutritional_info,
            method_steps,
            youtube_link,
            image,
        })
    }
}

impl RecipePatch {
    pub fn from_form(form: RecipeForm) -> Result<Self, AppError> {
        let name = form
            .get("name")
            .map(|raw| {
                required_text(Some(raw), "Name cannot be empty")
                    .and_then(|text| within_column(text, "Name"))
            })
            .transpose()?;
        let cuisine = form
            .get("cuisine")
            .map(|raw| {
                required_text(Some(raw), "Cuisine cannot be empty")
                    .and_then(|text| within_column(text, "Cuisine"))
            })
            .transpose()?;
        let cooking_time = form.get("cookingTime").map(parse_cooking_time).transpose()?;
        let ingredients = form.get("ingredients").map(parse_ingredients).transpose()?;
        let method_steps = form.get("methodSteps").map(parse_method_steps).transpose()?;

        let nutritional_info = match form.get("nutritionalInfo").map(str::trim) {
            None => Patch::Absent,
            Some("") => Patch::Clear,
            Some(text) => Patch::Set(text.to_string()),
        };
        let youtube_link = match form.get("youtubeLink").map(str::trim) {
            None => Patch::Absent,
            Some("") => Patch::Clear,
            Some(link) => Patch::Set(validate_youtube_link(link)?),
        };
        let remove_image = form
            .get("removeImage")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));
        let image = match form.image {
            Some(raw) => Patch::Set(validate_image(raw)?),
            None if remove_image => Patch::Clear,
            None => Patch::Absent,
        };

        Ok(Self {
            name,
            cuisine,
            cooking_time,
            ingredients,
            method_steps,
            nutritional_info,
            youtube_link,
            image,
        })
    }
}

fn required_text(raw: Option<&str>, message: &str) -> Result<String, AppError> {
    match raw.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(AppError::validation(message)),
    }
}

/// Longest name, cuisine or username the database columns hold.
pub const MAX_TEXT_CHARS: usize = 255;

/// Reject text that would not fit a `VARCHAR(255)` column.
pub fn within_column(text: String, field: &str) -> Result<String, AppError> {
    if text.chars().count() > MAX_TEXT_CHARS {
        return Err(AppError::validation(format!(
            "{field} must be {MAX_TEXT_CHARS} characters or less"
        )));
    }
    Ok(text)
}

pub fn parse_cooking_time(raw: &str) -> Result<i32, AppError> {
    match raw.trim().parse::<i32>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(AppError::validation(
            "Cooking time must be a positive number",
        )),
    }
}

pub fn parse_ingredients(raw: &str) -> Result<Vec<Ingredient>, AppError> {
    let parsed: Vec<Ingredient> = serde_json::from_str(raw).map_err(|_| {
        AppError::validation("Ingredients must be a JSON array of {name, quantity, unit}")
    })?;

    if parsed.is_empty() {
        return Err(AppError::validation("At least one ingredient is required"));
    }

    parsed
        .into_iter()
        .map(|ingredient| {
            let name = ingredient.name.trim().to_string();
            let quantity = ingredient.quantity.trim().to_string();
            if name.is_empty() || quantity.is_empty() {
                return Err(AppError::validation(
                    "Each ingredient needs a name and quantity",
                ));
            }
            Ok(Ingredient {
                name,
                quantity,
                unit: ingredient.unit.trim().to_string(),
            })
        })
        .collect()
}

/// Accepts a JSON array of strings, or a plain comma-separated list.
pub fn parse_method_steps(raw: &str) -> Result<Vec<String>, AppError> {
    let trimmed = raw.trim();

    let steps: Vec<String> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)
            .map_err(|_| AppError::validation("Method steps must be a JSON array of strings"))?
    } else {
        trimmed.split(',').map(str::to_string).collect()
    };

    let steps: Vec<String> = steps
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if steps.is_empty() {
        return Err(AppError::validation("At least one method step is required"));
    }

    Ok(steps)
}

pub fn validate_youtube_link(raw: &str) -> Result<String, AppError> {
    let link = raw.trim();
    if link.is_empty() || YOUTUBE_URL.is_match(link) {
        Ok(link.to_string())
    } else {
        Err(AppError::validation("Please enter a valid YouTube URL"))
    }
}

fn validate_image(raw: RawImage) -> Result<ImageUpload, AppError> {
    let content_type = process_image(&raw.data).map_err(AppError::Validation)?;

    let extension = if content_type == "image/png" {
        "png"
    } else {
        "jpg"
    };
    let file_name = raw
        .file_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| format!("image.{}", extension));

    Ok(ImageUpload {
        data: raw.data,
        content_type,
        file_name,
    })
}

#[cfg(test)]
pub(crate) fn soup_form() -> RecipeForm {
    RecipeForm::new()
        .with_field("name", "Soup")
        .with_field("cuisine", "French")
        .with_field("cookingTime", "30")
        .with_field(
            "ingredients",
            r#"[{"name":"Salt","quantity":"1","unit":"tsp"}]"#,
        )
        .with_field("methodSteps", r#"["Boil","Serve"]"#)
}
