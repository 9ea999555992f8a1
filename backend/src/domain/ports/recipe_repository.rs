//! Port for recipe persistence, including the tag and ingredient ledgers.
use async_trait::async_trait;

use crate::domain::{NewRecipe, Recipe, RecipeDraft, RecipeFilter, RecipeId, RecipeSummary, UserId};

use super::RepositoryError;

/// Storage contract for recipes.
///
/// Writes touch the recipe row and both link tables; adapters must apply
/// them atomically. Unknown tag or ingredient ids surface as
/// [`RepositoryError::MissingReference`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert a recipe with its tags and ingredient amounts.
    async fn create(&self, recipe: &NewRecipe) -> Result<(), RepositoryError>;

    /// Fetch a fully resolved recipe.
    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, RepositoryError>;

    /// Recipes matching `filter`, newest first.
    async fn list(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>, RepositoryError>;

    /// Replace every editable field and both link sets. Returns `false` when
    /// the recipe does not exist.
    async fn replace(&self, id: &RecipeId, draft: &RecipeDraft) -> Result<bool, RepositoryError>;

    /// Remove a recipe; favourites, cart entries and ledger rows go with it.
    async fn delete(&self, id: &RecipeId) -> Result<bool, RepositoryError>;

    /// Short projections of an author's recipes, newest first, at most
    /// `limit` when given.
    async fn summaries_by_author(
        &self,
        author: &UserId,
        limit: Option<usize>,
    ) -> Result<Vec<RecipeSummary>, RepositoryError>;

    /// Number of recipes the author has published.
    async fn count_by_author(&self, author: &UserId) -> Result<u64, RepositoryError>;
}
