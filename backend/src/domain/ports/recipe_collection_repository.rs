//! Port for per-user recipe collections: favourites and the shopping cart.
//!
//! Both collections have the same shape (a unique user/recipe pair), so one
//! port serves both, selected by [`RecipeCollection`]. The cart additionally
//! feeds the shopping list aggregation.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{CartIngredientLine, RecipeId, UserId};

use super::RepositoryError;

/// Which per-user collection an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeCollection {
    /// Recipes the user marked as favourite.
    Favorites,
    /// Recipes the user plans to shop for.
    ShoppingCart,
}

impl RecipeCollection {
    /// Human readable label used in messages and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::ShoppingCart => "shopping cart",
        }
    }
}

impl fmt::Display for RecipeCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Storage contract for favourites and cart entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCollectionRepository: Send + Sync {
    /// Add a recipe. A second add of the same pair yields
    /// [`RepositoryError::UniqueViolation`]; an unknown recipe yields
    /// [`RepositoryError::MissingReference`].
    async fn add(
        &self,
        collection: RecipeCollection,
        user: &UserId,
        recipe: &RecipeId,
    ) -> Result<(), RepositoryError>;

    /// Remove a recipe. Returns `false` when the pair was not stored.
    async fn remove(
        &self,
        collection: RecipeCollection,
        user: &UserId,
        recipe: &RecipeId,
    ) -> Result<bool, RepositoryError>;

    /// Recipe ids in the user's collection.
    async fn recipe_ids(
        &self,
        collection: RecipeCollection,
        user: &UserId,
    ) -> Result<Vec<RecipeId>, RepositoryError>;

    /// Ingredient amounts for every recipe in the user's cart.
    ///
    /// Adapters may return raw ledger rows or rows already summed per
    /// (name, unit); callers re-aggregate either way.
    async fn cart_ingredient_lines(
        &self,
        user: &UserId,
    ) -> Result<Vec<CartIngredientLine>, RepositoryError>;
}
