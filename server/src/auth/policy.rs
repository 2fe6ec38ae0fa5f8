//! Who may change what. Admin status comes from the token claim.

use super::Principal;
use crate::models::Recipe;

fn is_creator(principal: &Principal, recipe: &Recipe) -> bool {
    principal.username == recipe.created_by
}

/// Editing is reserved to the creator; admins get no bypass here.
pub fn can_edit_recipe(principal: &Principal, recipe: &Recipe) -> bool {
    is_creator(principal, recipe)
}

pub fn can_delete_recipe(principal: &Principal, recipe: &Recipe) -> bool {
    principal.admin || is_creator(principal, recipe)
}

pub fn can_delete_comment(principal: &Principal) -> bool {
    principal.admin
}
