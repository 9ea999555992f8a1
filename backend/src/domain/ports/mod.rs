//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters and
//! return [`RepositoryError`]. The driving [`LoginService`] port returns
//! domain errors directly.

use std::sync::Arc;

mod macros;
pub(crate) use macros::define_port_error;

mod ingredient_repository;
mod login_service;
mod recipe_collection_repository;
mod recipe_repository;
mod repository_error;
mod subscription_repository;
mod tag_repository;
mod user_repository;

pub use ingredient_repository::IngredientRepository;
#[cfg(test)]
pub use ingredient_repository::MockIngredientRepository;
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use recipe_collection_repository::MockRecipeCollectionRepository;
pub use recipe_collection_repository::{RecipeCollection, RecipeCollectionRepository};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::RecipeRepository;
pub use repository_error::{RepositoryError, constraints};
#[cfg(test)]
pub use subscription_repository::MockSubscriptionRepository;
pub use subscription_repository::SubscriptionRepository;
#[cfg(test)]
pub use tag_repository::MockTagRepository;
pub use tag_repository::TagRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;

/// Parameter object bundling every driven port an application needs.
///
/// Outbound adapters build one of these (see
/// `outbound::persistence::diesel_repositories` and `outbound::memory`) and
/// the services pick the ports they use.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub ingredients: Arc<dyn IngredientRepository>,
    pub recipes: Arc<dyn RecipeRepository>,
    pub collections: Arc<dyn RecipeCollectionRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
}
