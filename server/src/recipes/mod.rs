//! Recipe domain: form validation, rating aggregation and the service the
//! handlers call.

pub mod form;
pub mod rating;
mod service;

pub use form::{NewRecipe, RecipeForm, RecipePatch};
pub use service::RecipeService;
