use super::form::{NewRecipe, Patch, RecipePatch};
use super::rating::{average_rating, validate_comment};
use crate::auth::policy;
use crate::auth::Principal;
use crate::error::AppError;
use crate::media::MediaStore;
use crate::models::{Comment, Recipe};
use crate::store::{RecipeStore, RECIPE_COUNTER};
use chrono::Utc;
use std::sync::Arc;

/// Recipe operations shared by the HTTP handlers.
///
/// Writes are last-write-wins: an update replaces the whole stored document
/// without checking whether someone else changed it in between.
#[derive(Clone)]
pub struct RecipeService {
    store: Arc<dyn RecipeStore>,
    media: Arc<dyn MediaStore>,
}

impl RecipeService {
    pub fn new(store: Arc<dyn RecipeStore>, media: Arc<dyn MediaStore>) -> Self {
        Self { store, media }
    }

    pub fn list(&self, search: Option<&str>) -> Result<Vec<Recipe>, AppError> {
        Ok(self.store.list_recipes(search)?)
    }

    pub fn get(&self, id: i64) -> Result<Recipe, AppError> {
        self.store
            .get_recipe(id)?
            .ok_or_else(AppError::recipe_not_found)
    }

    pub async fn create(&self, draft: NewRecipe, creator: &Principal) -> Result<Recipe, AppError> {
        let id = self.store.next_id(RECIPE_COUNTER)?;

        let image_url = match &draft.image {
            Some(image) => self.media.upload(image).await?,
            None => String::new(),
        };

        let now = Utc::now();
        let recipe = Recipe {
            id,
            name: draft.name,
            cuisine: draft.cuisine,
            cooking_time: draft.cooking_time,
            ingredients: draft.ingredients,
            nutritional_info: draft.nutritional_info,
            method_steps: draft.method_steps,
            youtube_link: draft.youtube_link,
            image_url,
            comments: Vec::new(),
            rating: 0.0,
            created_by: creator.username.clone(),
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self.store.insert_recipe(&recipe) {
            self.discard_image(&recipe.image_url).await;
            return Err(e.into());
        }

        tracing::info!(recipe_id = id, created_by = %recipe.created_by, "created recipe");
        Ok(recipe)
    }

    pub async fn update(
        &self,
        id: i64,
        patch: RecipePatch,
        requester: &Principal,
    ) -> Result<Recipe, AppError> {
        let mut recipe = self.get(id)?;

        if !policy::can_edit_recipe(requester, &recipe) {
            return Err(AppError::Forbidden(
                "You can only edit your own recipes".to_string(),
            ));
        }

        if let Some(name) = patch.name {
            recipe.name = name;
        }
        if let Some(cuisine) = patch.cuisine {
            recipe.cuisine = cuisine;
        }
        if let Some(cooking_time) = patch.cooking_time {
            recipe.cooking_time = cooking_time;
        }
        if let Some(ingredients) = patch.ingredients {
            recipe.ingredients = ingredients;
        }
        if let Some(method_steps) = patch.method_steps {
            recipe.method_steps = method_steps;
        }
        patch.nutritional_info.apply_to(&mut recipe.nutritional_info);
        patch.youtube_link.apply_to(&mut recipe.youtube_link);

        let previous_image = recipe.image_url.clone();
        let mut uploaded = None;
        match patch.image {
            Patch::Absent => {}
            Patch::Clear => recipe.image_url.clear(),
            Patch::Set(image) => {
                let url = self.media.upload(&image).await?;
                recipe.image_url = url.clone();
                uploaded = Some(url);
            }
        }

        recipe.updated_at = Utc::now();

        let saved = match self.store.update_recipe(&recipe) {
            Ok(saved) => saved,
            Err(e) => {
                if let Some(url) = &uploaded {
                    self.discard_image(url).await;
                }
                return Err(e.into());
            }
        };
        if !saved {
            if let Some(url) = &uploaded {
                self.discard_image(url).await;
            }
            return Err(AppError::recipe_not_found());
        }

        if previous_image != recipe.image_url {
            self.discard_image(&previous_image).await;
        }

        tracing::info!(recipe_id = id, "updated recipe");
        Ok(recipe)
    }

    pub async fn delete(&self, id: i64, requester: &Principal) -> Result<(), AppError> {
        let recipe = self.get(id)?;

        if !policy::can_delete_recipe(requester, &recipe) {
            return Err(AppError::Forbidden(
                "You can only delete your own recipes".to_string(),
            ));
        }

        let removed = self
            .store
            .delete_recipe(id)?
            .ok_or_else(AppError::recipe_not_found)?;

        self.discard_image(&removed.image_url).await;

        tracing::info!(recipe_id = id, deleted_by = %requester.username, "deleted recipe");
        Ok(())
    }

    pub fn add_comment(
        &self,
        id: i64,
        text: &str,
        rating: i64,
        author: &Principal,
    ) -> Result<Recipe, AppError> {
        let (text, rating) = validate_comment(text, rating)?;
        let mut recipe = self.get(id)?;

        recipe.comments.push(Comment {
            comment: text,
            rating,
            author_id: author.user_id,
            author_username: author.username.clone(),
            created_at: Utc::now(),
        });
        recipe.rating = average_rating(&recipe.comments);
        recipe.updated_at = Utc::now();

        self.save(&recipe)?;
        Ok(recipe)
    }

    pub fn delete_comment(
        &self,
        id: i64,
        index: usize,
        requester: &Principal,
    ) -> Result<Recipe, AppError> {
        if !policy::can_delete_comment(requester) {
            return Err(AppError::Forbidden(
                "Only an admin can delete comments".to_string(),
            ));
        }

        let mut recipe = self.get(id)?;

        if index >= recipe.comments.len() {
            return Err(AppError::validation("Comment index out of range"));
        }

        recipe.comments.remove(index);
        recipe.rating = average_rating(&recipe.comments);
        recipe.updated_at = Utc::now();

        self.save(&recipe)?;
        Ok(recipe)
    }

    fn save(&self, recipe: &Recipe) -> Result<(), AppError> {
        if self.store.update_recipe(recipe)? {
            Ok(())
        } else {
            Err(AppError::recipe_not_found())
        }
    }

    /// Best-effort removal from the media host. Failures are logged and the
    /// file is left orphaned.
    async fn discard_image(&self, url: &str) {
        if url.is_empty() {
            return;
        }
        if let Err(e) = self.media.delete(url).await {
            tracing::warn!(url = %url, error = %e, "failed to delete recipe image");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{test_images, FakeMediaStore};
    use crate::recipes::form::{soup_form, RecipeForm};
    use crate::store::MemoryStore;
    use std::collections::HashSet;
    use uuid::Uuid;

    struct Harness {
        service: RecipeService,
        store: Arc<MemoryStore>,
        media: Arc<FakeMediaStore>,
    }

    fn harness() -> Harness {
        let store = Arc::new(MemoryStore::new());
        let media = Arc::new(FakeMediaStore::new());
        let service = RecipeService::new(store.clone(), media.clone());
        Harness {
            service,
            store,
            media,
        }
    }

    fn user(username: &str) -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            username: username.to_string(),
            admin: false,
        }
    }

    fn admin(username: &str) -> Principal {
        Principal {
            admin: true,
            ..user(username)
        }
    }

    async fn create_soup(h: &Harness, creator: &Principal) -> Recipe {
        let draft = NewRecipe::from_form(soup_form()).unwrap();
        h.service.create(draft, creator).await.unwrap()
    }

    fn patch(form: RecipeForm) -> RecipePatch {
        RecipePatch::from_form(form).unwrap()
    }

    #[tokio::test]
    async fn test_create_first_recipe() {
        let h = harness();
        let recipe = create_soup(&h, &user("alice_dev")).await;

        assert_eq!(recipe.id, 1);
        assert_eq!(recipe.rating, 0.0);
        assert!(recipe.comments.is_empty());
        assert_eq!(recipe.created_by, "alice_dev");
        assert_eq!(h.service.get(1).unwrap(), recipe);
    }

    #[tokio::test]
    async fn test_ids_increase() {
        let h = harness();
        let alice = user("alice_dev");
        let first = create_soup(&h, &alice).await;
        let second = create_soup(&h, &alice).await;
        assert_eq!(second.id, first.id + 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_get_distinct_contiguous_ids() {
        let h = harness();
        let alice = user("alice_dev");
        let baseline = create_soup(&h, &alice).await.id;

        let mut handles = Vec::new();
        for _ in 0..50 {
            let service = h.service.clone();
            let creator = alice.clone();
            handles.push(tokio::spawn(async move {
                let draft = NewRecipe::from_form(soup_form()).unwrap();
                service.create(draft, &creator).await.unwrap().id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }

        let distinct: HashSet<i64> = ids.iter().copied().collect();
        assert_eq!(distinct.len(), 50);
        ids.sort_unstable();
        let expected: Vec<i64> = (baseline + 1..=baseline + 50).collect();
        assert_eq!(ids, expected);
        assert_eq!(h.service.list(None).unwrap().len(), 51);
    }

    #[test]
    fn test_missing_recipe_not_found() {
        let h = harness();
        match h.service.get(999) {
            Err(AppError::NotFound(message)) => assert!(message.contains("not found")),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_comments_average() {
        let h = harness();
        let alice = user("alice_dev");
        let bob = user("bob");
        let recipe = create_soup(&h, &alice).await;

        let after_first = h.service.add_comment(recipe.id, "Great!", 5, &bob).unwrap();
        assert_eq!(after_first.rating, 5.0);

        let after_second = h.service.add_comment(recipe.id, "OK", 3, &bob).unwrap();
        assert_eq!(after_second.rating, 4.0);
        assert_eq!(after_second.comments.len(), 2);
        assert_eq!(after_second.comments[0].author_username, "bob");
        assert_eq!(h.service.get(recipe.id).unwrap().rating, 4.0);
    }

    #[tokio::test]
    async fn test_rating_tracks_add_and_delete_sequences() {
        let h = harness();
        let alice = user("alice_dev");
        let root = admin("root");
        let recipe = create_soup(&h, &alice).await;

        for (i, rating) in [4, 1, 5, 2, 5].into_iter().enumerate() {
            let updated = h
                .service
                .add_comment(recipe.id, &format!("comment {}", i), rating, &alice)
                .unwrap();
            assert_eq!(updated.rating, average_rating(&updated.comments));
        }
        assert_eq!(h.service.get(recipe.id).unwrap().rating, 3.4);

        let updated = h.service.delete_comment(recipe.id, 1, &root).unwrap();
        assert_eq!(updated.rating, 4.0);

        while !h.service.get(recipe.id).unwrap().comments.is_empty() {
            let updated = h.service.delete_comment(recipe.id, 0, &root).unwrap();
            assert_eq!(updated.rating, average_rating(&updated.comments));
        }
        assert_eq!(h.service.get(recipe.id).unwrap().rating, 0.0);
    }

    #[tokio::test]
    async fn test_invalid_comment_leaves_recipe_alone() {
        let h = harness();
        let alice = user("alice_dev");
        let recipe = create_soup(&h, &alice).await;

        assert!(matches!(
            h.service.add_comment(recipe.id, "Too good", 6, &alice),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            h.service.add_comment(recipe.id, "", 3, &alice),
            Err(AppError::Validation(_))
        ));
        assert_eq!(h.service.get(recipe.id).unwrap(), recipe);
    }

    #[test]
    fn test_comment_on_missing_recipe() {
        let h = harness();
        assert!(matches!(
            h.service.add_comment(42, "Hello", 3, &user("bob")),
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_comment_out_of_range() {
        let h = harness();
        let alice = user("alice_dev");
        let recipe = create_soup(&h, &alice).await;
        h.service.add_comment(recipe.id, "Nice", 4, &alice).unwrap();
        let before = h.service.get(recipe.id).unwrap();

        match h.service.delete_comment(recipe.id, 5, &admin("root")) {
            Err(AppError::Validation(message)) => {
                assert_eq!(message, "Comment index out of range")
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(h.service.get(recipe.id).unwrap().comments, before.comments);
    }

    #[tokio::test]
    async fn test_delete_comment_requires_admin() {
        let h = harness();
        let alice = user("alice_dev");
        let recipe = create_soup(&h, &alice).await;
        h.service.add_comment(recipe.id, "Nice", 4, &alice).unwrap();

        assert!(matches!(
            h.service.delete_comment(recipe.id, 0, &alice),
            Err(AppError::Forbidden(_))
        ));
        assert_eq!(h.service.get(recipe.id).unwrap().comments.len(), 1);
    }

    #[tokio::test]
    async fn test_non_creator_edit_forbidden() {
        let h = harness();
        let recipe = create_soup(&h, &user("alice_dev")).await;

        let result = h
            .service
            .update(
                recipe.id,
                patch(RecipeForm::new().with_field("name", "Stolen")),
                &user("mallory"),
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert_eq!(h.service.get(recipe.id).unwrap(), recipe);
    }

    #[tokio::test]
    async fn test_admin_cannot_edit_others_recipe() {
        let h = harness();
        let recipe = create_soup(&h, &user("alice_dev")).await;
        let result = h
            .service
            .update(
                recipe.id,
                patch(RecipeForm::new().with_field("cuisine", "Thai")),
                &admin("root"),
            )
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_partial_update_changes_only_supplied_fields() {
        let h = harness();
        let alice = user("alice_dev");
        let recipe = create_soup(&h, &alice).await;

        let form = RecipeForm::new()
            .with_field("cookingTime", "45")
            .with_field("nutritionalInfo", "200 kcal");
        let updated = h.service.update(recipe.id, patch(form), &alice).await.unwrap();

        assert_eq!(updated.cooking_time, 45);
        assert_eq!(updated.nutritional_info, "200 kcal");
        assert_eq!(updated.name, recipe.name);
        assert_eq!(updated.ingredients, recipe.ingredients);
        assert_eq!(updated.method_steps, recipe.method_steps);
        assert_eq!(updated.created_at, recipe.created_at);

        let cleared = h
            .service
            .update(
                recipe.id,
                patch(RecipeForm::new().with_field("nutritionalInfo", "")),
                &alice,
            )
            .await
            .unwrap();
        assert_eq!(cleared.nutritional_info, "");
        assert_eq!(cleared.cooking_time, 45);
    }

    #[tokio::test]
    async fn test_update_missing_recipe() {
        let h = harness();
        let result = h
            .service
            .update(7, patch(RecipeForm::new()), &user("alice_dev"))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_new_image_replaces_and_deletes_old() {
        let h = harness();
        let alice = user("alice_dev");

        let mut form = soup_form();
        form.set_image(test_images::PNG.to_vec(), Some("first.png".to_string()));
        let recipe = h
            .service
            .create(NewRecipe::from_form(form).unwrap(), &alice)
            .await
            .unwrap();
        let first_url = recipe.image_url.clone();
        assert!(!first_url.is_empty());

        let mut form = RecipeForm::new();
        form.set_image(test_images::JPEG.to_vec(), Some("second.jpg".to_string()));
        let updated = h.service.update(recipe.id, patch(form), &alice).await.unwrap();

        assert_ne!(updated.image_url, first_url);
        assert_eq!(h.media.deleted(), vec![first_url]);
        assert_eq!(h.media.stored(), vec![updated.image_url.clone()]);
    }

    #[tokio::test]
    async fn test_remove_image() {
        let h = harness();
        let alice = user("alice_dev");
        let mut form = soup_form();
        form.set_image(test_images::PNG.to_vec(), None);
        let recipe = h
            .service
            .create(NewRecipe::from_form(form).unwrap(), &alice)
            .await
            .unwrap();

        let updated = h
            .service
            .update(
                recipe.id,
                patch(RecipeForm::new().with_field("removeImage", "true")),
                &alice,
            )
            .await
            .unwrap();
        assert_eq!(updated.image_url, "");
        assert!(h.media.stored().is_empty());
    }

    #[tokio::test]
    async fn test_failed_insert_discards_upload() {
        let h = harness();
        h.store.fail_writes();
        let mut form = soup_form();
        form.set_image(test_images::PNG.to_vec(), Some("soup.png".to_string()));

        let result = h
            .service
            .create(NewRecipe::from_form(form).unwrap(), &user("alice_dev"))
            .await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert_eq!(h.media.deleted().len(), 1);
        assert!(h.media.stored().is_empty());
        assert!(h.service.list(None).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_update_discards_new_upload_and_keeps_old() {
        let h = harness();
        let alice = user("alice_dev");
        let mut form = soup_form();
        form.set_image(test_images::PNG.to_vec(), Some("first.png".to_string()));
        let recipe = h
            .service
            .create(NewRecipe::from_form(form).unwrap(), &alice)
            .await
            .unwrap();

        h.store.fail_writes();
        let mut form = RecipeForm::new().with_field("name", "Stew");
        form.set_image(test_images::JPEG.to_vec(), Some("second.jpg".to_string()));
        let result = h.service.update(recipe.id, patch(form), &alice).await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert_eq!(h.media.stored(), vec![recipe.image_url.clone()]);
        assert_eq!(h.service.get(recipe.id).unwrap(), recipe);
    }

    #[tokio::test]
    async fn test_failed_upload_leaves_recipe_unchanged() {
        let h = harness();
        let alice = user("alice_dev");
        let recipe = create_soup(&h, &alice).await;

        h.media.fail_uploads();
        let mut form = RecipeForm::new().with_field("name", "Stew");
        form.set_image(test_images::PNG.to_vec(), None);
        let result = h.service.update(recipe.id, patch(form), &alice).await;

        assert!(matches!(result, Err(AppError::Media(_))));
        assert_eq!(h.service.get(recipe.id).unwrap(), recipe);
        assert!(h.media.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_failed_upload_on_create_stores_nothing() {
        let h = harness();
        h.media.fail_uploads();
        let mut form = soup_form();
        form.set_image(test_images::PNG.to_vec(), None);

        let result = h
            .service
            .create(NewRecipe::from_form(form).unwrap(), &user("alice_dev"))
            .await;

        assert!(matches!(result, Err(AppError::Media(_))));
        assert!(h.service.list(None).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_creator_removes_image() {
        let h = harness();
        let alice = user("alice_dev");
        let mut form = soup_form();
        form.set_image(test_images::PNG.to_vec(), None);
        let recipe = h
            .service
            .create(NewRecipe::from_form(form).unwrap(), &alice)
            .await
            .unwrap();

        h.service.delete(recipe.id, &alice).await.unwrap();

        assert!(matches!(h.service.get(recipe.id), Err(AppError::NotFound(_))));
        assert_eq!(h.media.deleted(), vec![recipe.image_url]);
    }

    #[tokio::test]
    async fn test_delete_permissions() {
        let h = harness();
        let recipe = create_soup(&h, &user("alice_dev")).await;

        assert!(matches!(
            h.service.delete(recipe.id, &user("mallory")).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(h.store.get_recipe(recipe.id).unwrap().is_some());

        h.service.delete(recipe.id, &admin("root")).await.unwrap();
        assert!(h.store.get_recipe(recipe.id).unwrap().is_none());

        assert!(matches!(
            h.service.delete(recipe.id, &admin("root")).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let h = harness();
        let alice = user("alice_dev");
        let first = create_soup(&h, &alice).await;
        h.service.delete(first.id, &alice).await.unwrap();
        let second = create_soup(&h, &alice).await;
        assert_eq!(second.id, first.id + 1);
    }

    #[tokio::test]
    async fn test_list_search_by_name_or_cuisine() {
        let h = harness();
        let alice = user("alice_dev");
        create_soup(&h, &alice).await;
        let curry = soup_form()
            .with_field("name", "Green Curry")
            .with_field("cuisine", "Thai");
        h.service
            .create(NewRecipe::from_form(curry).unwrap(), &alice)
            .await
            .unwrap();

        assert_eq!(h.service.list(None).unwrap().len(), 2);
        let thai = h.service.list(Some("THAI")).unwrap();
        assert_eq!(thai.len(), 1);
        assert_eq!(thai[0].name, "Green Curry");
        assert_eq!(h.service.list(Some("soup")).unwrap()[0].id, 1);
        assert!(h.service.list(Some("pizza")).unwrap().is_empty());
    }
}
