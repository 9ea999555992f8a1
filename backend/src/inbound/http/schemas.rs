//! Request and response bodies for the JSON API.
//!
//! Every entity has a write shape converted into a validated domain value
//! with `TryFrom` and a read shape built with `From`. Handlers pick the
//! conversion; nothing is derived by reflection. Field names are camelCase
//! on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Email, HexColor, Ingredient, IngredientDraft, IngredientId, IngredientName,
    IngredientPatch, IngredientValidationError, MeasurementUnit, PersonName, RecipeDraft,
    RecipeDraftParts, RecipeId, RecipeIngredient, RecipePatch, RecipeSummary, RecipeView,
    RecipeValidationError, SubscriptionSummary, Tag, TagDraft, TagId, TagName, TagPatch,
    TagSlug, TagValidationError, User, UserId, UserPatch, UserProfile, UserRegistration,
    UserValidationError, Username,
};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// A user as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    #[schema(example = "cook@example.com")]
    pub email: String,
    #[schema(example = "cook")]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the caller follows this user.
    pub is_subscribed: bool,
}

impl UserResponse {
    fn from_user(user: User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email.as_str().to_owned(),
            username: user.username.as_str().to_owned(),
            first_name: user.first_name.as_str().to_owned(),
            last_name: user.last_name.as_str().to_owned(),
            is_subscribed,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from_user(user, false)
    }
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        Self::from_user(profile.user, profile.is_subscribed)
    }
}

/// Registration body for `POST /api/users`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl TryFrom<CreateUserRequest> for UserRegistration {
    type Error = UserValidationError;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.email,
            &value.username,
            &value.first_name,
            &value.last_name,
        )
    }
}

/// Partial profile update for `PATCH /api/users/me`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl TryFrom<UpdateUserRequest> for UserPatch {
    type Error = UserValidationError;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            email: value.email.map(Email::new).transpose()?,
            username: value.username.map(Username::new).transpose()?,
            first_name: value.first_name.map(PersonName::first).transpose()?,
            last_name: value.last_name.map(PersonName::last).transpose()?,
        })
    }
}

/// A followed author with their newest recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub author: UserResponse,
    pub recipes: Vec<ShortRecipeResponse>,
    pub recipes_count: u64,
}

impl From<SubscriptionSummary> for SubscriptionResponse {
    fn from(summary: SubscriptionSummary) -> Self {
        Self {
            author: UserResponse::from_user(summary.author, true),
            recipes: summary.recipes.into_iter().map(Into::into).collect(),
            recipes_count: summary.recipes_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    pub id: TagId,
    #[schema(example = "Breakfast")]
    pub name: String,
    #[schema(example = "#E26C2D")]
    pub color: String,
    #[schema(example = "breakfast")]
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.as_str().to_owned(),
            color: tag.color.as_str().to_owned(),
            slug: tag.slug.as_str().to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagRequest {
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl TryFrom<TagRequest> for TagDraft {
    type Error = TagValidationError;

    fn try_from(value: TagRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.name, &value.color, &value.slug)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagPatchRequest {
    pub name: Option<String>,
    pub color: Option<String>,
    pub slug: Option<String>,
}

impl TryFrom<TagPatchRequest> for TagPatch {
    type Error = TagValidationError;

    fn try_from(value: TagPatchRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name.map(TagName::new).transpose()?,
            color: value.color.map(HexColor::new).transpose()?,
            slug: value.slug.map(TagSlug::new).transpose()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientResponse {
    pub id: IngredientId,
    #[schema(example = "Flour")]
    pub name: String,
    #[schema(example = "g")]
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name.as_str().to_owned(),
            measurement_unit: ingredient.measurement_unit.as_str().to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRequest {
    pub name: String,
    pub measurement_unit: String,
}

impl TryFrom<IngredientRequest> for IngredientDraft {
    type Error = IngredientValidationError;

    fn try_from(value: IngredientRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.name, &value.measurement_unit)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientPatchRequest {
    pub name: Option<String>,
    pub measurement_unit: Option<String>,
}

impl TryFrom<IngredientPatchRequest> for IngredientPatch {
    type Error = IngredientValidationError;

    fn try_from(value: IngredientPatchRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name.map(IngredientName::new).transpose()?,
            measurement_unit: value
                .measurement_unit
                .map(MeasurementUnit::new)
                .transpose()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Recipes
// ---------------------------------------------------------------------------

/// One ledger row on the write side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientAmountRequest {
    pub id: IngredientId,
    #[schema(example = 200)]
    pub amount: u32,
}

/// Full recipe body for `POST` and `PUT`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    pub tags: Vec<TagId>,
    pub ingredients: Vec<IngredientAmountRequest>,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub text: String,
    #[schema(example = 25)]
    pub cooking_time: u32,
}

impl TryFrom<RecipeRequest> for RecipeDraft {
    type Error = RecipeValidationError;

    fn try_from(value: RecipeRequest) -> Result<Self, Self::Error> {
        Self::try_new(RecipeDraftParts {
            name: value.name,
            text: value.text,
            image: value.image,
            cooking_time: value.cooking_time,
            tag_ids: value.tags,
            ingredients: value
                .ingredients
                .into_iter()
                .map(|row| (row.id, row.amount))
                .collect(),
        })
    }
}

/// Partial recipe body for `PATCH`; `tags` and `ingredients` replace
/// wholesale when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipePatchRequest {
    pub tags: Option<Vec<TagId>>,
    pub ingredients: Option<Vec<IngredientAmountRequest>>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<u32>,
}

impl From<RecipePatchRequest> for RecipePatch {
    fn from(value: RecipePatchRequest) -> Self {
        Self {
            name: value.name,
            text: value.text,
            image: value.image,
            cooking_time: value.cooking_time,
            tag_ids: value.tags,
            ingredients: value
                .ingredients
                .map(|rows| rows.into_iter().map(|row| (row.id, row.amount)).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredientResponse {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
    pub amount: u32,
}

impl From<RecipeIngredient> for RecipeIngredientResponse {
    fn from(row: RecipeIngredient) -> Self {
        Self {
            id: row.id,
            name: row.name.as_str().to_owned(),
            measurement_unit: row.measurement_unit.as_str().to_owned(),
            amount: row.amount.value(),
        }
    }
}

/// Full read representation of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    pub id: RecipeId,
    pub tags: Vec<TagResponse>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: u32,
    pub pub_date: DateTime<Utc>,
}

impl From<RecipeView> for RecipeResponse {
    fn from(view: RecipeView) -> Self {
        let RecipeView {
            recipe,
            author,
            author_is_subscribed,
            is_favorited,
            is_in_shopping_cart,
        } = view;
        Self {
            id: recipe.id,
            tags: recipe.tags.into_iter().map(Into::into).collect(),
            author: UserResponse::from_user(author, author_is_subscribed),
            ingredients: recipe.ingredients.into_iter().map(Into::into).collect(),
            is_favorited,
            is_in_shopping_cart,
            name: recipe.name,
            image: recipe.image,
            text: recipe.text,
            cooking_time: recipe.cooking_time.minutes(),
            pub_date: recipe.pub_date,
        }
    }
}

/// Short recipe form used by collections and subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShortRecipeResponse {
    pub id: RecipeId,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: u32,
}

impl From<RecipeSummary> for ShortRecipeResponse {
    fn from(summary: RecipeSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            image: summary.image,
            cooking_time: summary.cooking_time.minutes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    fn user_response_is_camel_case() {
        let registration =
            UserRegistration::try_from_parts("cook@example.com", "cook", "Ada", "Lovelace")
                .expect("valid registration");
        let user = User::register(UserId::random(), registration);
        let value = serde_json::to_value(UserResponse::from(user)).expect("serialise");

        assert_eq!(value["firstName"], "Ada");
        assert_eq!(value["isSubscribed"], false);
        assert!(value.get("first_name").is_none());
    }

    #[rstest]
    fn subscription_response_flattens_the_author() {
        let registration =
            UserRegistration::try_from_parts("chef@example.com", "chef", "Grace", "Hopper")
                .expect("valid registration");
        let summary = SubscriptionSummary {
            author: User::register(UserId::random(), registration),
            recipes: Vec::new(),
            recipes_count: 4,
        };
        let value = serde_json::to_value(SubscriptionResponse::from(summary)).expect("serialise");

        assert_eq!(value["username"], "chef");
        assert_eq!(value["isSubscribed"], true);
        assert_eq!(value["recipesCount"], 4);
        assert_eq!(value["recipes"], json!([]));
    }

    #[rstest]
    fn recipe_request_becomes_a_draft() {
        let tag = TagId::random();
        let ingredient = IngredientId::random();
        let body: RecipeRequest = serde_json::from_value(json!({
            "tags": [tag],
            "ingredients": [{"id": ingredient, "amount": 200}],
            "name": "Pancakes",
            "text": "Mix and fry.",
            "cookingTime": 15
        }))
        .expect("valid body");

        let draft = RecipeDraft::try_from(body).expect("valid draft");
        assert_eq!(draft.tag_ids(), [tag]);
        assert_eq!(draft.ingredients()[0].amount.value(), 200);
        assert_eq!(draft.image(), None);
    }

    #[rstest]
    fn zero_amount_is_rejected() {
        let body = RecipeRequest {
            tags: vec![TagId::random()],
            ingredients: vec![IngredientAmountRequest {
                id: IngredientId::random(),
                amount: 0,
            }],
            name: "Tea".to_owned(),
            image: None,
            text: "Steep.".to_owned(),
            cooking_time: 3,
        };
        assert!(RecipeDraft::try_from(body).is_err());
    }

    #[rstest]
    fn patch_request_keeps_absent_fields_absent() {
        let body: RecipePatchRequest =
            serde_json::from_value(json!({"cookingTime": 40})).expect("valid body");
        let patch = RecipePatch::from(body);
        assert_eq!(patch.cooking_time, Some(40));
        assert!(patch.tag_ids.is_none());
        assert!(patch.ingredients.is_none());
    }

    #[rstest]
    fn invalid_tag_colour_is_rejected() {
        let body = TagRequest {
            name: "Lunch".to_owned(),
            color: "orange".to_owned(),
            slug: "lunch".to_owned(),
        };
        assert!(TagDraft::try_from(body).is_err());
    }

    #[rstest]
    fn empty_user_patch_maps_to_empty_domain_patch() {
        let patch = UserPatch::try_from(UpdateUserRequest::default()).expect("valid");
        assert!(patch.is_empty());
        let value: Value = serde_json::to_value(UpdateUserRequest::default()).expect("serialise");
        assert_eq!(value["firstName"], Value::Null);
    }
}
