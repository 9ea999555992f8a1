//! Administration and lookup of the shared tag and ingredient catalogues.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{IngredientRepository, Repositories, TagRepository};
use crate::domain::repository_errors::map_repository_error;
use crate::domain::{
    DomainError, Ingredient, IngredientDraft, IngredientFilter, IngredientId, IngredientPatch, Tag,
    TagDraft, TagId, TagPatch,
};

/// Tag and ingredient catalogue operations.
#[derive(Clone)]
pub struct CatalogueService {
    tags: Arc<dyn TagRepository>,
    ingredients: Arc<dyn IngredientRepository>,
}

impl CatalogueService {
    /// Create a service over the given ports.
    #[must_use]
    pub fn new(tags: Arc<dyn TagRepository>, ingredients: Arc<dyn IngredientRepository>) -> Self {
        Self { tags, ingredients }
    }

    /// Pick the ports this service needs from a bundle.
    #[must_use]
    pub fn from_repositories(repositories: &Repositories) -> Self {
        Self::new(repositories.tags.clone(), repositories.ingredients.clone())
    }

    /// All tags ordered by slug.
    pub async fn list_tags(&self) -> Result<Vec<Tag>, DomainError> {
        self.tags.list().await.map_err(map_repository_error)
    }

    /// A single tag.
    pub async fn get_tag(&self, id: &TagId) -> Result<Tag, DomainError> {
        self.tags
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| DomainError::not_found("tag not found"))
    }

    pub async fn create_tag(&self, draft: TagDraft) -> Result<Tag, DomainError> {
        let tag = Tag::new(TagId::random(), draft);
        self.tags.create(&tag).await.map_err(map_repository_error)?;
        info!(tag_id = %tag.id, slug = tag.slug.as_str(), "tag created");
        Ok(tag)
    }

    pub async fn update_tag(&self, id: &TagId, patch: TagPatch) -> Result<Tag, DomainError> {
        let updated = self.get_tag(id).await?.patched(patch);
        let found = self
            .tags
            .update(&updated)
            .await
            .map_err(map_repository_error)?;
        if !found {
            return Err(DomainError::not_found("tag not found"));
        }
        Ok(updated)
    }

    /// Delete a tag; recipes lose the association.
    pub async fn delete_tag(&self, id: &TagId) -> Result<(), DomainError> {
        if !self.tags.delete(id).await.map_err(map_repository_error)? {
            return Err(DomainError::not_found("tag not found"));
        }
        info!(tag_id = %id, "tag deleted");
        Ok(())
    }

    /// Ingredients matching `filter`, ordered by name.
    pub async fn list_ingredients(&self, filter: &IngredientFilter) -> Result<Vec<Ingredient>, DomainError> {
        self.ingredients
            .list(filter)
            .await
            .map_err(map_repository_error)
    }

    pub async fn get_ingredient(&self, id: &IngredientId) -> Result<Ingredient, DomainError> {
        self.ingredients
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| DomainError::not_found("ingredient not found"))
    }

    pub async fn create_ingredient(&self, draft: IngredientDraft) -> Result<Ingredient, DomainError> {
        let ingredient = Ingredient::new(IngredientId::random(), draft);
        self.ingredients
            .create(&ingredient)
            .await
            .map_err(map_repository_error)?;
        info!(ingredient_id = %ingredient.id, "ingredient created");
        Ok(ingredient)
    }

    pub async fn update_ingredient(
        &self,
        id: &IngredientId,
        patch: IngredientPatch,
    ) -> Result<Ingredient, DomainError> {
        let updated = self.get_ingredient(id).await?.patched(patch);
        let found = self
            .ingredients
            .update(&updated)
            .await
            .map_err(map_repository_error)?;
        if !found {
            return Err(DomainError::not_found("ingredient not found"));
        }
        Ok(updated)
    }

    /// Delete an ingredient; recipe lines that use it go with it.
    pub async fn delete_ingredient(&self, id: &IngredientId) -> Result<(), DomainError> {
        if !self
            .ingredients
            .delete(id)
            .await
            .map_err(map_repository_error)?
        {
            return Err(DomainError::not_found("ingredient not found"));
        }
        info!(ingredient_id = %id, "ingredient deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        MockIngredientRepository, MockTagRepository, RepositoryError, constraints,
    };
    use rstest::rstest;

    fn service(tags: MockTagRepository, ingredients: MockIngredientRepository) -> CatalogueService {
        CatalogueService::new(Arc::new(tags), Arc::new(ingredients))
    }

    #[tokio::test]
    async fn duplicate_slug_is_conflict_on_slug_field() {
        let mut tags = MockTagRepository::new();
        tags.expect_create()
            .return_once(|_| Err(RepositoryError::unique_violation(constraints::TAGS_SLUG)));
        let draft = TagDraft::try_from_parts("Breakfast", "#E26C2D", "breakfast").expect("draft");

        let err = service(tags, MockIngredientRepository::new())
            .create_tag(draft)
            .await
            .expect_err("duplicate");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(
            err.details().and_then(|d| d.get("field")).and_then(|f| f.as_str()),
            Some("slug")
        );
    }

    #[rstest]
    #[case::tag(true)]
    #[case::ingredient(false)]
    #[tokio::test]
    async fn deleting_unknown_entry_is_not_found(#[case] tag: bool) {
        let mut tags = MockTagRepository::new();
        tags.expect_delete().returning(|_| Ok(false));
        let mut ingredients = MockIngredientRepository::new();
        ingredients.expect_delete().returning(|_| Ok(false));
        let svc = service(tags, ingredients);

        let result = if tag {
            svc.delete_tag(&TagId::random()).await
        } else {
            svc.delete_ingredient(&IngredientId::random()).await
        };

        assert_eq!(result.expect_err("missing").code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn ingredient_filter_is_forwarded() {
        let mut ingredients = MockIngredientRepository::new();
        ingredients
            .expect_list()
            .withf(|filter| filter.name_prefix.as_deref() == Some("sug"))
            .return_once(|_| Ok(Vec::new()));

        let found = service(MockTagRepository::new(), ingredients)
            .list_ingredients(&IngredientFilter::by_prefix(Some("sug")))
            .await
            .expect("listed");

        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn missing_tag_is_not_found() {
        let mut tags = MockTagRepository::new();
        tags.expect_find_by_id().return_once(|_| Ok(None));
        tags.expect_update().times(0);

        let err = service(tags, MockIngredientRepository::new())
            .update_tag(&TagId::random(), TagPatch::default())
            .await
            .expect_err("missing");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
