//! Plain-text rendering of recipes, including serving-size scaling.

use crate::models::{Ingredient, Recipe};
use std::fmt;

/// Multiply the leading number of a quantity by `servings`.
///
/// `"2"` becomes `"6"` for three servings and `"1/2"` becomes `"1.5"`. Text
/// after the number is kept (`"2 large"` becomes `"4 large"`). Quantities
/// that do not start with a number, like `"a pinch"`, are returned unchanged.
pub fn scale_quantity(quantity: &str, servings: u32) -> String {
    let trimmed = quantity.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '/'))
        .unwrap_or(trimmed.len());
    let (number, rest) = trimmed.split_at(split);

    match parse_amount(number) {
        Some(amount) => format!("{}{}", format_amount(amount * f64::from(servings)), rest),
        None => quantity.to_string(),
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    match raw.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: f64 = numerator.parse().ok()?;
            let denominator: f64 = denominator.parse().ok()?;
            (denominator != 0.0).then(|| numerator / denominator)
        }
        None => raw.parse().ok(),
    }
}

fn format_amount(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

fn ingredient_line(ingredient: &Ingredient, quantity: &str) -> String {
    let mut line = format!("{}: {}", ingredient.name, quantity);
    if !ingredient.unit.is_empty() {
        line.push(' ');
        line.push_str(&ingredient.unit);
    }
    line
}

/// One line per recipe, for `list`.
pub fn summary_line(recipe: &Recipe) -> String {
    format!(
        "#{:<4} {} ({}, {} min) rating {:.1} by {}",
        recipe.id,
        recipe.name,
        recipe.cuisine,
        recipe.cooking_time,
        recipe.rating,
        recipe.created_by
    )
}

/// Full recipe card, for `show`. Scaled quantities are listed when `servings` is above 1.
pub struct RecipeCard<'a> {
    pub recipe: &'a Recipe,
    pub servings: u32,
}

impl fmt::Display for RecipeCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let recipe = self.recipe;
        writeln!(f, "#{} {}", recipe.id, recipe.name)?;
        writeln!(f, "Cuisine: {}", recipe.cuisine)?;
        writeln!(f, "Cooking time: {} minutes", recipe.cooking_time)?;
        writeln!(f, "Created by: {}", recipe.created_by)?;
        writeln!(f, "Rating: {:.1}", recipe.rating)?;

        writeln!(f, "\nIngredients (for 1 serving):")?;
        for ingredient in &recipe.ingredients {
            writeln!(f, "  - {}", ingredient_line(ingredient, &ingredient.quantity))?;
        }

        if self.servings > 1 {
            writeln!(f, "\nAdjusted ingredients (for {} servings):", self.servings)?;
            for ingredient in &recipe.ingredients {
                let scaled = scale_quantity(&ingredient.quantity, self.servings);
                writeln!(f, "  - {}", ingredient_line(ingredient, &scaled))?;
            }
        }

        writeln!(f, "\nMethod:")?;
        for (n, step) in recipe.method_steps.iter().enumerate() {
            writeln!(f, "  {}. {}", n + 1, step)?;
        }

        if !recipe.nutritional_info.is_empty() {
            writeln!(f, "\nNutritional info: {}", recipe.nutritional_info)?;
        }
        if !recipe.youtube_link.is_empty() {
            writeln!(f, "Video: {}", recipe.youtube_link)?;
        }
        if !recipe.image_url.is_empty() {
            writeln!(f, "Image: {}", recipe.image_url)?;
        }

        writeln!(f, "\nComments:")?;
        if recipe.comments.is_empty() {
            writeln!(f, "  No comments yet.")?;
        }
        for (index, comment) in recipe.comments.iter().enumerate() {
            writeln!(
                f,
                "  [{}] {} ({}/5) by {}",
                index, comment.comment, comment.rating, comment.author_username
            )?;
        }
        Ok(())
    }
}

pub fn render_recipe(recipe: &Recipe, servings: u32) -> String {
    RecipeCard { recipe, servings }.to_string()
}
