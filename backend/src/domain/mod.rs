//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, and the services that drive them through ports.
//! Keep types immutable and document invariants in each type's Rustdoc.
//!
//! Public surface:
//! - DomainError / ErrorCode: transport-agnostic failure payload.
//! - TraceId: per-request correlation identifier.
//! - User, Tag, Ingredient, Recipe, Subscription: validated aggregates.
//! - ShoppingList: the cart aggregation and its text report.
//! - UserService, CatalogueService, RecipeService: use-case entry points.

pub mod auth;
pub mod catalogue_service;
pub mod error;
pub mod id;
pub mod ingredient;
pub mod ports;
pub mod recipe;
pub mod recipe_service;
mod repository_errors;
pub mod shared_password_login;
pub mod shopping_list;
pub mod subscription;
pub mod tag;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::catalogue_service::CatalogueService;
pub use self::error::{DomainError, ErrorCode, ErrorValidationError};
pub use self::id::{IngredientId, RecipeId, TagId, UserId};
pub use self::ingredient::{
    Ingredient, IngredientDraft, IngredientFilter, IngredientName, IngredientPatch,
    IngredientValidationError, MeasurementUnit,
};
pub use self::recipe::{
    Amount, CookingTime, IngredientAmount, NewRecipe, Recipe, RecipeDraft, RecipeDraftParts,
    RecipeFilter, RecipeIngredient, RecipePatch, RecipeSummary, RecipeValidationError,
    RecipeView,
};
pub use self::recipe_service::{RecipeListQuery, RecipeService};
pub use self::shared_password_login::SharedPasswordLoginService;
pub use self::shopping_list::{
    CartIngredientLine, SHOPPING_LIST_FILENAME, SHOPPING_LIST_HEADER, ShoppingList,
    ShoppingListItem,
};
pub use self::subscription::{Subscription, SubscriptionSummary};
pub use self::tag::{HexColor, Tag, TagDraft, TagName, TagPatch, TagSlug, TagValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, PersonName, User, UserPatch, UserProfile, UserRegistration, UserValidationError,
    Username,
};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use foodgram::domain::{ApiResult, DomainError};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(DomainError::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, DomainError>;
