//! Recipe authoring, browsing, favourites and the shopping cart.
//!
//! Read models are assembled in batches: one lookup for the authors on a
//! page and one per viewer collection, rather than a query per recipe.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::ports::{
    IngredientRepository, RecipeCollection, RecipeCollectionRepository, RecipeRepository,
    Repositories, SubscriptionRepository, TagRepository, UserRepository,
};
use crate::domain::repository_errors::map_repository_error;
use crate::domain::{
    DomainError, NewRecipe, Recipe, RecipeDraft, RecipeFilter, RecipeId, RecipePatch, RecipeSummary,
    RecipeView, ShoppingList, TagSlug, User, UserId,
};

/// Caller-facing recipe listing options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeListQuery {
    /// Only recipes by this author.
    pub author: Option<UserId>,
    /// Recipes carrying any of these tags.
    pub tag_slugs: Vec<TagSlug>,
    /// Only recipes the caller has favourited.
    pub is_favorited: bool,
    /// Only recipes in the caller's shopping cart.
    pub is_in_shopping_cart: bool,
}

/// Per-viewer flags used while assembling views.
#[derive(Default)]
struct ViewerContext {
    followed: HashSet<UserId>,
    favorites: HashSet<RecipeId>,
    cart: HashSet<RecipeId>,
}

/// Recipe use-cases.
#[derive(Clone)]
pub struct RecipeService {
    recipes: Arc<dyn RecipeRepository>,
    tags: Arc<dyn TagRepository>,
    ingredients: Arc<dyn IngredientRepository>,
    users: Arc<dyn UserRepository>,
    collections: Arc<dyn RecipeCollectionRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl RecipeService {
    /// Pick the ports this service needs from a bundle.
    #[must_use]
    pub fn from_repositories(repositories: &Repositories) -> Self {
        Self {
            recipes: repositories.recipes.clone(),
            tags: repositories.tags.clone(),
            ingredients: repositories.ingredients.clone(),
            users: repositories.users.clone(),
            collections: repositories.collections.clone(),
            subscriptions: repositories.subscriptions.clone(),
        }
    }

    async fn viewer_context(&self, caller: Option<&UserId>) -> Result<ViewerContext, DomainError> {
        let Some(viewer) = caller else {
            return Ok(ViewerContext::default());
        };
        let followed = self
            .subscriptions
            .author_ids(viewer)
            .await
            .map_err(map_repository_error)?;
        let favorites = self
            .collections
            .recipe_ids(RecipeCollection::Favorites, viewer)
            .await
            .map_err(map_repository_error)?;
        let cart = self
            .collections
            .recipe_ids(RecipeCollection::ShoppingCart, viewer)
            .await
            .map_err(map_repository_error)?;
        Ok(ViewerContext {
            followed: followed.into_iter().collect(),
            favorites: favorites.into_iter().collect(),
            cart: cart.into_iter().collect(),
        })
    }

    async fn assemble(
        &self,
        viewer: Option<&UserId>,
        recipes: Vec<Recipe>,
    ) -> Result<Vec<RecipeView>, DomainError> {
        let context = self.viewer_context(viewer).await?;
        let mut author_ids: Vec<UserId> = recipes.iter().map(|recipe| recipe.author_id).collect();
        author_ids.sort();
        author_ids.dedup();
        let authors: HashMap<UserId, User> = self
            .users
            .find_by_ids(&author_ids)
            .await
            .map_err(map_repository_error)?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        recipes
            .into_iter()
            .map(|recipe| {
                let author = authors
                    .get(&recipe.author_id)
                    .cloned()
                    .ok_or_else(|| DomainError::internal("recipe author is missing"))?;
                Ok(RecipeView {
                    author_is_subscribed: context.followed.contains(&author.id),
                    is_favorited: context.favorites.contains(&recipe.id),
                    is_in_shopping_cart: context.cart.contains(&recipe.id),
                    author,
                    recipe,
                })
            })
            .collect()
    }

    async fn require_recipe(&self, id: &RecipeId) -> Result<Recipe, DomainError> {
        self.recipes
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| DomainError::not_found("recipe not found"))
    }

    async fn view_of(&self, viewer: Option<&UserId>, recipe: Recipe) -> Result<RecipeView, DomainError> {
        self.assemble(viewer, vec![recipe])
            .await?
            .pop()
            .ok_or_else(|| DomainError::internal("recipe view missing"))
    }

    /// Reject drafts that reference tags or ingredients absent from the
    /// catalogue.
    async fn ensure_references(&self, draft: &RecipeDraft) -> Result<(), DomainError> {
        let tags = self
            .tags
            .find_by_ids(draft.tag_ids())
            .await
            .map_err(map_repository_error)?;
        if tags.len() != draft.tag_ids().len() {
            return Err(DomainError::invalid_field(
                "tags",
                "unknown",
                "one or more tags do not exist",
            ));
        }
        let ingredient_ids = draft.ingredient_ids();
        let ingredients = self
            .ingredients
            .find_by_ids(&ingredient_ids)
            .await
            .map_err(map_repository_error)?;
        if ingredients.len() != ingredient_ids.len() {
            return Err(DomainError::invalid_field(
                "ingredients",
                "unknown",
                "one or more ingredients do not exist",
            ));
        }
        Ok(())
    }

    async fn require_authored(&self, caller: &UserId, id: &RecipeId) -> Result<Recipe, DomainError> {
        let recipe = self.require_recipe(id).await?;
        if !recipe.is_authored_by(caller) {
            return Err(DomainError::forbidden("only the author may change this recipe"));
        }
        Ok(recipe)
    }

    /// Recipes matching `query`, newest first.
    pub async fn list(
        &self,
        viewer: Option<&UserId>,
        query: RecipeListQuery,
    ) -> Result<Vec<RecipeView>, DomainError> {
        let wants_collection = query.is_favorited || query.is_in_shopping_cart;
        if wants_collection && viewer.is_none() {
            return Ok(Vec::new());
        }
        let filter = RecipeFilter {
            author: query.author,
            tag_slugs: query.tag_slugs,
            favorited_by: viewer.copied().filter(|_| query.is_favorited),
            in_cart_of: viewer.copied().filter(|_| query.is_in_shopping_cart),
        };
        let recipes = self
            .recipes
            .list(&filter)
            .await
            .map_err(map_repository_error)?;
        self.assemble(viewer, recipes).await
    }

    pub async fn get(&self, viewer: Option<&UserId>, id: &RecipeId) -> Result<RecipeView, DomainError> {
        let recipe = self.require_recipe(id).await?;
        self.view_of(viewer, recipe).await
    }

    /// Publish a new recipe authored by `author`.
    pub async fn create(&self, author: &UserId, draft: RecipeDraft) -> Result<RecipeView, DomainError> {
        self.ensure_references(&draft).await?;
        let new_recipe = NewRecipe {
            id: RecipeId::random(),
            author_id: *author,
            pub_date: Utc::now(),
            draft,
        };
        self.recipes
            .create(&new_recipe)
            .await
            .map_err(map_repository_error)?;
        info!(recipe_id = %new_recipe.id, author_id = %author, "recipe created");
        self.get(Some(author), &new_recipe.id).await
    }

    /// Replace every writable field of a recipe.
    pub async fn replace(
        &self,
        caller: &UserId,
        id: &RecipeId,
        draft: RecipeDraft,
    ) -> Result<RecipeView, DomainError> {
        self.require_authored(caller, id).await?;
        self.store_replacement(caller, id, draft).await
    }

    /// Apply the supplied fields; tags and ingredients replace wholesale.
    pub async fn patch(
        &self,
        caller: &UserId,
        id: &RecipeId,
        patch: RecipePatch,
    ) -> Result<RecipeView, DomainError> {
        let current = self.require_authored(caller, id).await?;
        let draft = current.to_draft()?.patched(patch)?;
        self.store_replacement(caller, id, draft).await
    }

    async fn store_replacement(
        &self,
        caller: &UserId,
        id: &RecipeId,
        draft: RecipeDraft,
    ) -> Result<RecipeView, DomainError> {
        self.ensure_references(&draft).await?;
        let found = self
            .recipes
            .replace(id, &draft)
            .await
            .map_err(map_repository_error)?;
        if !found {
            return Err(DomainError::not_found("recipe not found"));
        }
        info!(recipe_id = %id, "recipe updated");
        self.get(Some(caller), id).await
    }

    /// Delete a recipe along with its favourites and cart entries.
    pub async fn delete(&self, caller: &UserId, id: &RecipeId) -> Result<(), DomainError> {
        self.require_authored(caller, id).await?;
        if !self.recipes.delete(id).await.map_err(map_repository_error)? {
            return Err(DomainError::not_found("recipe not found"));
        }
        info!(recipe_id = %id, "recipe deleted");
        Ok(())
    }

    /// Add a recipe to one of the caller's collections.
    pub async fn add_to(
        &self,
        collection: RecipeCollection,
        user: &UserId,
        id: &RecipeId,
    ) -> Result<RecipeSummary, DomainError> {
        let recipe = self.require_recipe(id).await?;
        self.collections
            .add(collection, user, id)
            .await
            .map_err(map_repository_error)?;
        info!(recipe_id = %id, user_id = %user, %collection, "recipe added");
        Ok(recipe.summary())
    }

    /// Remove a recipe from one of the caller's collections.
    pub async fn remove_from(
        &self,
        collection: RecipeCollection,
        user: &UserId,
        id: &RecipeId,
    ) -> Result<(), DomainError> {
        let removed = self
            .collections
            .remove(collection, user, id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(DomainError::not_found(format!("recipe is not in {collection}")));
        }
        info!(recipe_id = %id, user_id = %user, %collection, "recipe removed");
        Ok(())
    }

    /// Aggregate the ingredients of every recipe in the caller's cart.
    pub async fn shopping_list(&self, user: &UserId) -> Result<ShoppingList, DomainError> {
        let lines = self
            .collections
            .cart_ingredient_lines(user)
            .await
            .map_err(map_repository_error)?;
        Ok(ShoppingList::aggregate(lines))
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
