//! PostgreSQL-backed favourites and shopping cart.
//!
//! The two collections live in separate tables with identical shape. The
//! cart additionally answers the shopping list query: one grouped `SUM` over
//! the ledger rows of every recipe in the user's cart.

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{RecipeCollection, RecipeCollectionRepository, RepositoryError};
use crate::domain::{CartIngredientLine, RecipeId, UserId};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewCartRow, NewFavoriteRow};
use super::pool::DbPool;
use super::schema::{favorites, ingredients, recipe_ingredients, shopping_cart};

/// Diesel-backed implementation of the [`RecipeCollectionRepository`] port.
#[derive(Clone)]
pub struct DieselRecipeCollectionRepository {
    pool: DbPool,
}

impl DieselRecipeCollectionRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_amount(name: &str, total: Option<i64>) -> Result<u64, RepositoryError> {
    u64::try_from(total.unwrap_or_default())
        .map_err(|_| RepositoryError::query(format!("negative total for ingredient {name}")))
}

#[async_trait]
impl RecipeCollectionRepository for DieselRecipeCollectionRepository {
    async fn add(
        &self,
        collection: RecipeCollection,
        user: &UserId,
        recipe: &RecipeId,
    ) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *user.as_uuid();
        let recipe_id = *recipe.as_uuid();
        let inserted = match collection {
            RecipeCollection::Favorites => {
                diesel::insert_into(favorites::table)
                    .values(&NewFavoriteRow { user_id, recipe_id })
                    .execute(&mut conn)
                    .await
            }
            RecipeCollection::ShoppingCart => {
                diesel::insert_into(shopping_cart::table)
                    .values(&NewCartRow { user_id, recipe_id })
                    .execute(&mut conn)
                    .await
            }
        };
        inserted.map(|_| ()).map_err(map_diesel_error)
    }

    async fn remove(
        &self,
        collection: RecipeCollection,
        user: &UserId,
        recipe: &RecipeId,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = match collection {
            RecipeCollection::Favorites => {
                diesel::delete(
                    favorites::table
                        .filter(favorites::user_id.eq(user.as_uuid()))
                        .filter(favorites::recipe_id.eq(recipe.as_uuid())),
                )
                .execute(&mut conn)
                .await
            }
            RecipeCollection::ShoppingCart => {
                diesel::delete(
                    shopping_cart::table
                        .filter(shopping_cart::user_id.eq(user.as_uuid()))
                        .filter(shopping_cart::recipe_id.eq(recipe.as_uuid())),
                )
                .execute(&mut conn)
                .await
            }
        }
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn recipe_ids(
        &self,
        collection: RecipeCollection,
        user: &UserId,
    ) -> Result<Vec<RecipeId>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<Uuid> = match collection {
            RecipeCollection::Favorites => {
                favorites::table
                    .filter(favorites::user_id.eq(user.as_uuid()))
                    .order_by(favorites::id)
                    .select(favorites::recipe_id)
                    .load(&mut conn)
                    .await
            }
            RecipeCollection::ShoppingCart => {
                shopping_cart::table
                    .filter(shopping_cart::user_id.eq(user.as_uuid()))
                    .order_by(shopping_cart::id)
                    .select(shopping_cart::recipe_id)
                    .load(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;
        Ok(ids.into_iter().map(RecipeId::from_uuid).collect())
    }

    async fn cart_ingredient_lines(
        &self,
        user: &UserId,
    ) -> Result<Vec<CartIngredientLine>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(String, String, Option<i64>)> = recipe_ingredients::table
            .inner_join(ingredients::table)
            .filter(
                recipe_ingredients::recipe_id.eq_any(
                    shopping_cart::table
                        .filter(shopping_cart::user_id.eq(*user.as_uuid()))
                        .select(shopping_cart::recipe_id),
                ),
            )
            .group_by((ingredients::name, ingredients::measurement_unit))
            .select((
                ingredients::name,
                ingredients::measurement_unit,
                sql::<Nullable<BigInt>>("SUM(recipe_ingredients.amount)"),
            ))
            .order_by(ingredients::name)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(name, unit, total)| {
                let amount = to_amount(&name, total)?;
                Ok(CartIngredientLine::new(name, unit, amount))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(350), 350)]
    #[case(None, 0)]
    fn sums_become_unsigned_amounts(#[case] total: Option<i64>, #[case] expected: u64) {
        assert_eq!(to_amount("Flour", total).expect("non-negative"), expected);
    }

    #[rstest]
    fn negative_sum_is_a_query_error() {
        let err = to_amount("Flour", Some(-1)).expect_err("negative");
        assert!(matches!(err, RepositoryError::Query { .. }));
    }
}
