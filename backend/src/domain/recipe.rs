//! Recipes, their ingredient ledger and listing filters.
//!
//! A recipe links one author to a non-empty set of tags and a non-empty set of
//! ingredient amounts. [`RecipeDraft`] is the single place where the write
//! invariants are checked; both create and update paths go through it.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use thiserror::Error as ThisError;

use crate::domain::{
    DomainError, IngredientId, IngredientName, MeasurementUnit, RecipeId, Tag, TagId, TagSlug, User,
    UserId,
};

/// Maximum recipe name length.
pub const RECIPE_NAME_MAX: usize = 255;

/// Validation failures for recipe drafts.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum RecipeValidationError {
    #[error("recipe name must not be empty")]
    EmptyName,
    #[error("recipe name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("recipe text must not be empty")]
    EmptyText,
    #[error("cooking time must be at least 1 minute")]
    CookingTimeTooShort,
    #[error("ingredient amount must be at least 1")]
    AmountTooSmall,
    #[error("a recipe needs at least one ingredient")]
    NoIngredients,
    #[error("ingredient {0} is listed more than once")]
    DuplicateIngredient(IngredientId),
    #[error("a recipe needs at least one tag")]
    NoTags,
    #[error("tag {0} is listed more than once")]
    DuplicateTag(TagId),
}

impl From<RecipeValidationError> for DomainError {
    fn from(value: RecipeValidationError) -> Self {
        let (field, code) = match value {
            RecipeValidationError::EmptyName => ("name", "empty"),
            RecipeValidationError::NameTooLong { .. } => ("name", "too_long"),
            RecipeValidationError::EmptyText => ("text", "empty"),
            RecipeValidationError::CookingTimeTooShort => ("cookingTime", "too_small"),
            RecipeValidationError::AmountTooSmall => ("ingredients", "too_small"),
            RecipeValidationError::NoIngredients => ("ingredients", "empty"),
            RecipeValidationError::DuplicateIngredient(_) => ("ingredients", "duplicate"),
            RecipeValidationError::NoTags => ("tags", "empty"),
            RecipeValidationError::DuplicateTag(_) => ("tags", "duplicate"),
        };
        Self::invalid_field(field, code, value.to_string())
    }
}

/// Cooking time in whole minutes; at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CookingTime(u32);

impl CookingTime {
    /// Validate a cooking time.
    pub const fn new(minutes: u32) -> Result<Self, RecipeValidationError> {
        if minutes < 1 {
            return Err(RecipeValidationError::CookingTimeTooShort);
        }
        Ok(Self(minutes))
    }

    /// Minutes as an integer.
    #[must_use]
    pub const fn minutes(self) -> u32 {
        self.0
    }
}

/// Quantity of an ingredient in a recipe; at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u32);

impl Amount {
    /// Validate an amount.
    pub const fn new(value: u32) -> Result<Self, RecipeValidationError> {
        if value < 1 {
            return Err(RecipeValidationError::AmountTooSmall);
        }
        Ok(Self(value))
    }

    /// Quantity as an integer.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// Write-side ledger row: which ingredient and how much of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub ingredient_id: IngredientId,
    pub amount: Amount,
}

/// Read-side ledger row joined with the ingredient catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredient {
    pub id: IngredientId,
    pub name: IngredientName,
    pub measurement_unit: MeasurementUnit,
    pub amount: Amount,
}

/// Validated recipe contents without author or identity.
///
/// ## Invariants
/// - `name` is non-empty and at most [`RECIPE_NAME_MAX`] characters.
/// - `text` is non-empty.
/// - `tag_ids` is non-empty and free of duplicates.
/// - `ingredients` is non-empty with unique ingredient ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    name: String,
    text: String,
    image: Option<String>,
    cooking_time: CookingTime,
    tag_ids: Vec<TagId>,
    ingredients: Vec<IngredientAmount>,
}

/// Raw fields used to build a [`RecipeDraft`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeDraftParts {
    pub name: String,
    pub text: String,
    pub image: Option<String>,
    pub cooking_time: u32,
    pub tag_ids: Vec<TagId>,
    pub ingredients: Vec<(IngredientId, u32)>,
}

impl RecipeDraft {
    /// Validate raw parts into a draft.
    pub fn try_new(parts: RecipeDraftParts) -> Result<Self, RecipeValidationError> {
        let RecipeDraftParts {
            name,
            text,
            image,
            cooking_time,
            tag_ids,
            ingredients,
        } = parts;

        let name = name.trim().to_owned();
        if name.is_empty() {
            return Err(RecipeValidationError::EmptyName);
        }
        if name.chars().count() > RECIPE_NAME_MAX {
            return Err(RecipeValidationError::NameTooLong {
                max: RECIPE_NAME_MAX,
            });
        }
        if text.trim().is_empty() {
            return Err(RecipeValidationError::EmptyText);
        }
        let cooking_time = CookingTime::new(cooking_time)?;

        if tag_ids.is_empty() {
            return Err(RecipeValidationError::NoTags);
        }
        let mut seen_tags = HashSet::with_capacity(tag_ids.len());
        if let Some(duplicate) = tag_ids.iter().find(|id| !seen_tags.insert(**id)) {
            return Err(RecipeValidationError::DuplicateTag(*duplicate));
        }

        if ingredients.is_empty() {
            return Err(RecipeValidationError::NoIngredients);
        }
        let mut seen_ingredients = HashSet::with_capacity(ingredients.len());
        let ingredients = ingredients
            .into_iter()
            .map(|(ingredient_id, amount)| {
                if !seen_ingredients.insert(ingredient_id) {
                    return Err(RecipeValidationError::DuplicateIngredient(ingredient_id));
                }
                Ok(IngredientAmount {
                    ingredient_id,
                    amount: Amount::new(amount)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let image = image
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        Ok(Self {
            name,
            text,
            image,
            cooking_time,
            tag_ids,
            ingredients,
        })
    }

    /// Recipe title.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Preparation instructions.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Image reference, if any.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Cooking time.
    #[must_use]
    pub const fn cooking_time(&self) -> CookingTime {
        self.cooking_time
    }

    /// Tag identifiers in request order.
    #[must_use]
    pub fn tag_ids(&self) -> &[TagId] {
        &self.tag_ids
    }

    /// Ingredient ledger rows in request order.
    #[must_use]
    pub fn ingredients(&self) -> &[IngredientAmount] {
        &self.ingredients
    }

    /// Ingredient identifiers in request order.
    #[must_use]
    pub fn ingredient_ids(&self) -> Vec<IngredientId> {
        self.ingredients
            .iter()
            .map(|row| row.ingredient_id)
            .collect()
    }

    fn into_parts(self) -> RecipeDraftParts {
        RecipeDraftParts {
            name: self.name,
            text: self.text,
            image: self.image,
            cooking_time: self.cooking_time.minutes(),
            tag_ids: self.tag_ids,
            ingredients: self
                .ingredients
                .into_iter()
                .map(|row| (row.ingredient_id, row.amount.value()))
                .collect(),
        }
    }

    /// Apply a partial update and re-validate the result.
    ///
    /// Present `tag_ids`/`ingredients` replace the previous sets wholesale.
    pub fn patched(self, patch: RecipePatch) -> Result<Self, RecipeValidationError> {
        let mut parts = self.into_parts();
        if let Some(name) = patch.name {
            parts.name = name;
        }
        if let Some(text) = patch.text {
            parts.text = text;
        }
        if let Some(image) = patch.image {
            parts.image = Some(image);
        }
        if let Some(minutes) = patch.cooking_time {
            parts.cooking_time = minutes;
        }
        if let Some(tag_ids) = patch.tag_ids {
            parts.tag_ids = tag_ids;
        }
        if let Some(ingredients) = patch.ingredients {
            parts.ingredients = ingredients;
        }
        Self::try_new(parts)
    }
}

/// Partial recipe update. Unvalidated until applied to a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub cooking_time: Option<u32>,
    pub tag_ids: Option<Vec<TagId>>,
    pub ingredients: Option<Vec<(IngredientId, u32)>>,
}

/// A draft with the identity and authorship assigned at publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub id: RecipeId,
    pub author_id: UserId,
    pub pub_date: DateTime<Utc>,
    pub draft: RecipeDraft,
}

/// Persisted recipe with tags and ingredients resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecipeId,
    pub author_id: UserId,
    pub name: String,
    pub text: String,
    pub image: Option<String>,
    pub cooking_time: CookingTime,
    pub pub_date: DateTime<Utc>,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredient>,
}

impl Recipe {
    /// Rebuild the write-side draft so partial updates can be validated.
    pub fn to_draft(&self) -> Result<RecipeDraft, RecipeValidationError> {
        RecipeDraft::try_new(RecipeDraftParts {
            name: self.name.clone(),
            text: self.text.clone(),
            image: self.image.clone(),
            cooking_time: self.cooking_time.minutes(),
            tag_ids: self.tags.iter().map(|tag| tag.id).collect(),
            ingredients: self
                .ingredients
                .iter()
                .map(|row| (row.id, row.amount.value()))
                .collect(),
        })
    }

    /// Whether `user` may modify this recipe.
    #[must_use]
    pub fn is_authored_by(&self, user: &UserId) -> bool {
        &self.author_id == user
    }

    /// Short projection used by favourites, carts and subscriptions.
    #[must_use]
    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
            cooking_time: self.cooking_time,
        }
    }
}

/// Short recipe projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: CookingTime,
}

/// Recipe as seen by a particular caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeView {
    pub recipe: Recipe,
    pub author: User,
    pub author_is_subscribed: bool,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Listing filter for recipes. Empty fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<UserId>,
    /// Matches recipes carrying any of these slugs.
    pub tag_slugs: Vec<TagSlug>,
    pub favorited_by: Option<UserId>,
    pub in_cart_of: Option<UserId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn parts() -> RecipeDraftParts {
        RecipeDraftParts {
            name: "Pancakes".to_owned(),
            text: "Mix and fry.".to_owned(),
            image: None,
            cooking_time: 20,
            tag_ids: vec![TagId::random()],
            ingredients: vec![(IngredientId::random(), 200)],
        }
    }

    #[rstest]
    fn accepts_valid_parts(parts: RecipeDraftParts) {
        let draft = RecipeDraft::try_new(parts).expect("valid draft");
        assert_eq!(draft.name(), "Pancakes");
        assert_eq!(draft.cooking_time().minutes(), 20);
    }

    #[rstest]
    fn rejects_zero_cooking_time(mut parts: RecipeDraftParts) {
        parts.cooking_time = 0;
        assert_eq!(
            RecipeDraft::try_new(parts),
            Err(RecipeValidationError::CookingTimeTooShort)
        );
    }

    #[rstest]
    fn rejects_zero_amount(mut parts: RecipeDraftParts) {
        parts.ingredients = vec![(IngredientId::random(), 0)];
        assert_eq!(
            RecipeDraft::try_new(parts),
            Err(RecipeValidationError::AmountTooSmall)
        );
    }

    #[rstest]
    fn rejects_empty_collections(mut parts: RecipeDraftParts) {
        let mut no_tags = parts.clone();
        no_tags.tag_ids.clear();
        assert_eq!(RecipeDraft::try_new(no_tags), Err(RecipeValidationError::NoTags));

        parts.ingredients.clear();
        assert_eq!(
            RecipeDraft::try_new(parts),
            Err(RecipeValidationError::NoIngredients)
        );
    }

    #[rstest]
    fn rejects_duplicate_tags(mut parts: RecipeDraftParts) {
        let tag = TagId::random();
        parts.tag_ids = vec![tag, tag];
        assert_eq!(
            RecipeDraft::try_new(parts),
            Err(RecipeValidationError::DuplicateTag(tag))
        );
    }

    #[rstest]
    fn rejects_duplicate_ingredients(mut parts: RecipeDraftParts) {
        let ingredient = IngredientId::random();
        parts.ingredients = vec![(ingredient, 1), (ingredient, 2)];
        assert_eq!(
            RecipeDraft::try_new(parts),
            Err(RecipeValidationError::DuplicateIngredient(ingredient))
        );
    }

    #[rstest]
    fn blank_image_is_dropped(mut parts: RecipeDraftParts) {
        parts.image = Some("   ".to_owned());
        let draft = RecipeDraft::try_new(parts).expect("valid draft");
        assert!(draft.image().is_none());
    }

    #[rstest]
    fn patch_replaces_ingredients_wholesale(parts: RecipeDraftParts) {
        let draft = RecipeDraft::try_new(parts).expect("valid draft");
        let replacement = IngredientId::random();
        let patch = RecipePatch {
            ingredients: Some(vec![(replacement, 3)]),
            ..RecipePatch::default()
        };

        let patched = draft.clone().patched(patch).expect("patch applies");

        assert_eq!(patched.ingredient_ids(), vec![replacement]);
        assert_eq!(patched.tag_ids(), draft.tag_ids());
        assert_eq!(patched.name(), draft.name());
    }

    #[rstest]
    fn patch_is_revalidated(parts: RecipeDraftParts) {
        let draft = RecipeDraft::try_new(parts).expect("valid draft");
        let patch = RecipePatch {
            tag_ids: Some(Vec::new()),
            ..RecipePatch::default()
        };
        assert_eq!(draft.patched(patch), Err(RecipeValidationError::NoTags));
    }

    #[test]
    fn validation_error_maps_to_field_details() {
        let error: DomainError = RecipeValidationError::CookingTimeTooShort.into();
        assert_eq!(
            error.details(),
            Some(&serde_json::json!({"field": "cookingTime", "code": "too_small"}))
        );
    }
}
