//! PostgreSQL-backed tag and ingredient catalogue repositories.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{IngredientRepository, RepositoryError, TagRepository};
use crate::domain::{
    HexColor, Ingredient, IngredientFilter, IngredientId, IngredientName, MeasurementUnit, Tag,
    TagId, TagName, TagSlug,
};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{IngredientRow, IngredientWrite, TagRow, TagWrite};
use super::pool::DbPool;
use super::schema::{ingredients, tags};

/// Diesel-backed implementation of the [`TagRepository`] port.
#[derive(Clone)]
pub struct DieselTagRepository {
    pool: DbPool,
}

impl DieselTagRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Diesel-backed implementation of the [`IngredientRepository`] port.
#[derive(Clone)]
pub struct DieselIngredientRepository {
    pool: DbPool,
}

impl DieselIngredientRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn corrupt(entity: &str, id: uuid::Uuid, err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::query(format!("stored {entity} {id} is invalid: {err}"))
}

pub(crate) fn row_to_tag(row: TagRow) -> Result<Tag, RepositoryError> {
    let id = row.id;
    Ok(Tag {
        id: TagId::from_uuid(id),
        name: TagName::new(&row.name).map_err(|err| corrupt("tag", id, err))?,
        color: HexColor::new(&row.color).map_err(|err| corrupt("tag", id, err))?,
        slug: TagSlug::new(&row.slug).map_err(|err| corrupt("tag", id, err))?,
    })
}

pub(crate) fn row_to_ingredient(row: IngredientRow) -> Result<Ingredient, RepositoryError> {
    let id = row.id;
    Ok(Ingredient {
        id: IngredientId::from_uuid(id),
        name: IngredientName::new(&row.name).map_err(|err| corrupt("ingredient", id, err))?,
        measurement_unit: MeasurementUnit::new(&row.measurement_unit)
            .map_err(|err| corrupt("ingredient", id, err))?,
    })
}

fn tag_write(tag: &Tag) -> TagWrite<'_> {
    TagWrite {
        id: *tag.id.as_uuid(),
        name: tag.name.as_str(),
        color: tag.color.as_str(),
        slug: tag.slug.as_str(),
    }
}

fn ingredient_write(ingredient: &Ingredient) -> IngredientWrite<'_> {
    IngredientWrite {
        id: *ingredient.id.as_uuid(),
        name: ingredient.name.as_str(),
        measurement_unit: ingredient.measurement_unit.as_str(),
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl TagRepository for DieselTagRepository {
    async fn create(&self, tag: &Tag) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(tags::table)
            .values(&tag_write(tag))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &TagId) -> Result<Option<Tag>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TagRow> = tags::table
            .find(id.as_uuid())
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_tag).transpose()
    }

    async fn find_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let uuids: Vec<_> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<TagRow> = tags::table
            .filter(tags::id.eq_any(&uuids))
            .order_by(tags::slug)
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_tag).collect()
    }

    async fn list(&self) -> Result<Vec<Tag>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TagRow> = tags::table
            .order_by(tags::slug)
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_tag).collect()
    }

    async fn update(&self, tag: &Tag) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(tags::table.find(tag.id.as_uuid()))
            .set(&tag_write(tag))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &TagId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(tags::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[async_trait]
impl IngredientRepository for DieselIngredientRepository {
    async fn create(&self, ingredient: &Ingredient) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(ingredients::table)
            .values(&ingredient_write(ingredient))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &IngredientId) -> Result<Option<Ingredient>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<IngredientRow> = ingredients::table
            .find(id.as_uuid())
            .select(IngredientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_ingredient).transpose()
    }

    async fn find_by_ids(&self, ids: &[IngredientId]) -> Result<Vec<Ingredient>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let uuids: Vec<_> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<IngredientRow> = ingredients::table
            .filter(ingredients::id.eq_any(&uuids))
            .order_by(ingredients::name)
            .select(IngredientRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_ingredient).collect()
    }

    async fn list(&self, filter: &IngredientFilter) -> Result<Vec<Ingredient>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = ingredients::table
            .order_by(ingredients::name)
            .select(IngredientRow::as_select())
            .into_boxed();
        if let Some(prefix) = filter.name_prefix.as_deref() {
            query = query.filter(ingredients::name.ilike(like_prefix(prefix)));
        }
        let rows: Vec<IngredientRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_ingredient).collect()
    }

    async fn update(&self, ingredient: &Ingredient) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(ingredients::table.find(ingredient.id.as_uuid()))
            .set(&ingredient_write(ingredient))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &IngredientId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(ingredients::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("sug", "sug%")]
    #[case("50%", "50\\%%")]
    #[case("a_b", "a\\_b%")]
    fn like_prefix_escapes_metacharacters(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(like_prefix(input), expected);
    }

    #[rstest]
    fn lower_case_colour_in_storage_is_normalised() {
        let tag = row_to_tag(TagRow {
            id: uuid::Uuid::nil(),
            name: "Lunch".to_owned(),
            color: "#a1b2c3".to_owned(),
            slug: "lunch".to_owned(),
        })
        .expect("valid row");
        assert_eq!(tag.color.as_str(), "#A1B2C3");
    }
}
