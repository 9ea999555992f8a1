//! Port for the ingredient catalogue.
use async_trait::async_trait;

use crate::domain::{Ingredient, IngredientFilter, IngredientId};

use super::RepositoryError;

/// Storage contract for ingredients.
///
/// Deleting an ingredient that recipes still reference removes the ledger
/// rows along with it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// Insert an ingredient; the name must be unused.
    async fn create(&self, ingredient: &Ingredient) -> Result<(), RepositoryError>;

    /// Fetch an ingredient by identifier.
    async fn find_by_id(&self, id: &IngredientId) -> Result<Option<Ingredient>, RepositoryError>;

    /// Fetch the ingredients whose id is in `ids`, ordered by name.
    async fn find_by_ids(&self, ids: &[IngredientId]) -> Result<Vec<Ingredient>, RepositoryError>;

    /// Ingredients matching `filter`, ordered by name.
    async fn list(&self, filter: &IngredientFilter) -> Result<Vec<Ingredient>, RepositoryError>;

    /// Overwrite an ingredient. Returns `false` when it does not exist.
    async fn update(&self, ingredient: &Ingredient) -> Result<bool, RepositoryError>;

    /// Remove an ingredient.
    async fn delete(&self, id: &IngredientId) -> Result<bool, RepositoryError>;
}
