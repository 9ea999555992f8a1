//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint, the request and response
//! schemas, and the session cookie security scheme. The document backs Swagger
//! UI in debug builds and is exported by the `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{DomainError, ErrorCode};
use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::schemas::{
    CreateUserRequest, IngredientAmountRequest, IngredientPatchRequest, IngredientRequest,
    IngredientResponse, RecipeIngredientResponse, RecipePatchRequest, RecipeRequest,
    RecipeResponse, ShortRecipeResponse, SubscriptionResponse, TagPatchRequest, TagRequest,
    TagResponse, UpdateUserRequest, UserResponse,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Foodgram API",
        description = "Recipes, favourites, subscriptions and shopping lists.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_current_user,
        crate::inbound::http::users::delete_current_user,
        crate::inbound::http::users::list_subscriptions,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::subscribe,
        crate::inbound::http::users::unsubscribe,
        crate::inbound::http::catalogue::list_tags,
        crate::inbound::http::catalogue::create_tag,
        crate::inbound::http::catalogue::get_tag,
        crate::inbound::http::catalogue::update_tag,
        crate::inbound::http::catalogue::delete_tag,
        crate::inbound::http::catalogue::list_ingredients,
        crate::inbound::http::catalogue::create_ingredient,
        crate::inbound::http::catalogue::get_ingredient,
        crate::inbound::http::catalogue::update_ingredient,
        crate::inbound::http::catalogue::delete_ingredient,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::download_shopping_cart,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::replace_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::recipes::add_favorite,
        crate::inbound::http::recipes::remove_favorite,
        crate::inbound::http::recipes::add_to_shopping_cart,
        crate::inbound::http::recipes::remove_from_shopping_cart,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        DomainError,
        ErrorCode,
        LoginRequest,
        UserResponse,
        CreateUserRequest,
        UpdateUserRequest,
        SubscriptionResponse,
        TagResponse,
        TagRequest,
        TagPatchRequest,
        IngredientResponse,
        IngredientRequest,
        IngredientPatchRequest,
        IngredientAmountRequest,
        RecipeRequest,
        RecipePatchRequest,
        RecipeIngredientResponse,
        RecipeResponse,
        ShortRecipeResponse,
    )),
    tags(
        (name = "auth", description = "Session login and logout"),
        (name = "users", description = "Users and subscriptions"),
        (name = "catalogue", description = "Tags and ingredients"),
        (name = "recipes", description = "Recipes, favourites and the shopping cart"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
