//! Wire every Diesel adapter onto one shared pool.

use std::sync::Arc;

use crate::domain::ports::Repositories;

use super::pool::DbPool;
use super::{
    DieselIngredientRepository, DieselRecipeCollectionRepository, DieselRecipeRepository,
    DieselSubscriptionRepository, DieselTagRepository, DieselUserRepository,
};

/// Build the full [`Repositories`] bundle backed by PostgreSQL.
#[must_use]
pub fn diesel_repositories(pool: DbPool) -> Repositories {
    Repositories {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        tags: Arc::new(DieselTagRepository::new(pool.clone())),
        ingredients: Arc::new(DieselIngredientRepository::new(pool.clone())),
        recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
        collections: Arc::new(DieselRecipeCollectionRepository::new(pool.clone())),
        subscriptions: Arc::new(DieselSubscriptionRepository::new(pool)),
    }
}
