//! PostgreSQL-backed `RecipeRepository` implementation using Diesel ORM.
//!
//! A recipe spans three tables: `recipes`, `recipe_tags` and the
//! `recipe_ingredients` ledger. Writes touch all three inside one
//! transaction; reads load the recipe rows first and then hydrate tags and
//! ledger rows for the whole page with one query each.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{RecipeRepository, RepositoryError};
use crate::domain::{
    Amount, CookingTime, NewRecipe, Recipe, RecipeDraft, RecipeFilter, RecipeId,
    RecipeIngredient, RecipeSummary, Tag, UserId,
};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::diesel_catalogue_repository::{row_to_ingredient, row_to_tag};
use super::models::{
    IngredientRow, NewRecipeRow, RecipeIngredientRow, RecipeRow, RecipeTagRow, RecipeUpdate,
    TagRow,
};
use super::pool::DbPool;
use super::schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_cart, tags,
};

/// Diesel-backed implementation of the [`RecipeRepository`] port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn cooking_time_from_row(id: Uuid, column: i32) -> Result<CookingTime, RepositoryError> {
    u32::try_from(column)
        .ok()
        .and_then(|minutes| CookingTime::new(minutes).ok())
        .ok_or_else(|| RepositoryError::query(format!("recipe {id} has invalid cooking time")))
}

fn amount_from_row(recipe: Uuid, column: i32) -> Result<Amount, RepositoryError> {
    u32::try_from(column)
        .ok()
        .and_then(|value| Amount::new(value).ok())
        .ok_or_else(|| RepositoryError::query(format!("recipe {recipe} has invalid amount")))
}

fn i32_column(value: u32, column: &str) -> Result<i32, RepositoryError> {
    i32::try_from(value).map_err(|_| RepositoryError::query(format!("{column} out of range")))
}

fn tag_rows(recipe_id: Uuid, draft: &RecipeDraft) -> Vec<RecipeTagRow> {
    draft
        .tag_ids()
        .iter()
        .map(|tag| RecipeTagRow {
            recipe_id,
            tag_id: *tag.as_uuid(),
        })
        .collect()
}

fn ledger_rows(
    recipe_id: Uuid,
    draft: &RecipeDraft,
) -> Result<Vec<RecipeIngredientRow>, RepositoryError> {
    draft
        .ingredients()
        .iter()
        .map(|row| {
            Ok(RecipeIngredientRow {
                recipe_id,
                ingredient_id: *row.ingredient_id.as_uuid(),
                amount: i32_column(row.amount.value(), "amount")?,
            })
        })
        .collect()
}

/// Attach tags and ledger rows to a page of recipe rows, keeping row order.
async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<RecipeRow>,
) -> Result<Vec<Recipe>, RepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

    let tag_links: Vec<(Uuid, TagRow)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(&ids))
        .order_by(tags::slug)
        .select((recipe_tags::recipe_id, TagRow::as_select()))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let ledger: Vec<(Uuid, i32, IngredientRow)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&ids))
        .order_by(ingredients::name)
        .select((
            recipe_ingredients::recipe_id,
            recipe_ingredients::amount,
            IngredientRow::as_select(),
        ))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    let mut tags_by_recipe: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for (recipe_id, row) in tag_links {
        tags_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(row_to_tag(row)?);
    }
    let mut ledger_by_recipe: HashMap<Uuid, Vec<RecipeIngredient>> = HashMap::new();
    for (recipe_id, amount, row) in ledger {
        let ingredient = row_to_ingredient(row)?;
        ledger_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(RecipeIngredient {
                id: ingredient.id,
                name: ingredient.name,
                measurement_unit: ingredient.measurement_unit,
                amount: amount_from_row(recipe_id, amount)?,
            });
    }

    rows.into_iter()
        .map(|row| {
            Ok(Recipe {
                id: RecipeId::from_uuid(row.id),
                author_id: UserId::from_uuid(row.author_id),
                cooking_time: cooking_time_from_row(row.id, row.cooking_time)?,
                tags: tags_by_recipe.remove(&row.id).unwrap_or_default(),
                ingredients: ledger_by_recipe.remove(&row.id).unwrap_or_default(),
                name: row.name,
                text: row.text,
                image: row.image,
                pub_date: row.pub_date,
            })
        })
        .collect()
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn create(&self, recipe: &NewRecipe) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *recipe.id.as_uuid();
        let draft = &recipe.draft;
        let row = NewRecipeRow {
            id,
            author_id: *recipe.author_id.as_uuid(),
            name: draft.name(),
            text: draft.text(),
            image: draft.image(),
            cooking_time: i32_column(draft.cooking_time().minutes(), "cooking_time")?,
            pub_date: recipe.pub_date,
        };
        let tag_links = tag_rows(id, draft);
        let ledger = ledger_rows(id, draft)?;

        conn.transaction(|tx| {
            async move {
                diesel::insert_into(recipes::table)
                    .values(&row)
                    .execute(tx)
                    .await?;
                diesel::insert_into(recipe_tags::table)
                    .values(&tag_links)
                    .execute(tx)
                    .await?;
                diesel::insert_into(recipe_ingredients::table)
                    .values(&ledger)
                    .execute(tx)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found: Option<RecipeRow> = recipes::table
            .find(id.as_uuid())
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = found else {
            return Ok(None);
        };
        Ok(hydrate(&mut conn, vec![row]).await?.pop())
    }

    async fn list(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = recipes::table
            .select(RecipeRow::as_select())
            .order_by((recipes::pub_date.desc(), recipes::id.desc()))
            .into_boxed();
        if let Some(author) = filter.author {
            query = query.filter(recipes::author_id.eq(*author.as_uuid()));
        }
        if !filter.tag_slugs.is_empty() {
            let slugs: Vec<String> = filter
                .tag_slugs
                .iter()
                .map(|slug| slug.as_str().to_owned())
                .collect();
            query = query.filter(
                recipes::id.eq_any(
                    recipe_tags::table
                        .inner_join(tags::table)
                        .filter(tags::slug.eq_any(slugs))
                        .select(recipe_tags::recipe_id),
                ),
            );
        }
        if let Some(user) = filter.favorited_by {
            query = query.filter(
                recipes::id.eq_any(
                    favorites::table
                        .filter(favorites::user_id.eq(*user.as_uuid()))
                        .select(favorites::recipe_id),
                ),
            );
        }
        if let Some(user) = filter.in_cart_of {
            query = query.filter(
                recipes::id.eq_any(
                    shopping_cart::table
                        .filter(shopping_cart::user_id.eq(*user.as_uuid()))
                        .select(shopping_cart::recipe_id),
                ),
            );
        }
        let rows: Vec<RecipeRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        hydrate(&mut conn, rows).await
    }

    async fn replace(&self, id: &RecipeId, draft: &RecipeDraft) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let recipe_id = *id.as_uuid();
        let changes = RecipeUpdate {
            name: draft.name(),
            text: draft.text(),
            image: draft.image(),
            cooking_time: i32_column(draft.cooking_time().minutes(), "cooking_time")?,
        };
        let tag_links = tag_rows(recipe_id, draft);
        let ledger = ledger_rows(recipe_id, draft)?;

        conn.transaction(|tx| {
            async move {
                let updated = diesel::update(recipes::table.find(recipe_id))
                    .set(&changes)
                    .execute(tx)
                    .await?;
                if updated == 0 {
                    return Ok(false);
                }
                diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
                    .execute(tx)
                    .await?;
                diesel::delete(
                    recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
                )
                .execute(tx)
                .await?;
                diesel::insert_into(recipe_tags::table)
                    .values(&tag_links)
                    .execute(tx)
                    .await?;
                diesel::insert_into(recipe_ingredients::table)
                    .values(&ledger)
                    .execute(tx)
                    .await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn delete(&self, id: &RecipeId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(recipes::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn summaries_by_author(
        &self,
        author: &UserId,
        limit: Option<usize>,
    ) -> Result<Vec<RecipeSummary>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = recipes::table
            .filter(recipes::author_id.eq(author.as_uuid()))
            .order_by((recipes::pub_date.desc(), recipes::id.desc()))
            .select((
                recipes::id,
                recipes::name,
                recipes::image,
                recipes::cooking_time,
            ))
            .into_boxed();
        if let Some(limit) = limit {
            query = query.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }
        let rows: Vec<(Uuid, String, Option<String>, i32)> =
            query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(id, name, image, cooking_time)| {
                Ok(RecipeSummary {
                    id: RecipeId::from_uuid(id),
                    name,
                    image,
                    cooking_time: cooking_time_from_row(id, cooking_time)?,
                })
            })
            .collect()
    }

    async fn count_by_author(&self, author: &UserId) -> Result<u64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = recipes::table
            .filter(recipes::author_id.eq(author.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}
