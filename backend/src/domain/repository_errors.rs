//! Translation of repository failures into domain errors.
//!
//! Connection problems become `service_unavailable`, unique violations become
//! `conflict` with the offending field in `details`, missing references become
//! `not_found` or field-level `invalid_request`, and everything else is an
//! internal error.

use serde_json::json;
use tracing::warn;

use crate::domain::DomainError;
use crate::domain::ports::{RepositoryError, constraints};

fn unique_violation(constraint: &str) -> DomainError {
    let (field, message) = match constraint {
        constraints::USERS_EMAIL => ("email", "a user with this email already exists"),
        constraints::USERS_USERNAME => ("username", "a user with this username already exists"),
        constraints::TAGS_NAME => ("name", "a tag with this name already exists"),
        constraints::TAGS_COLOR => ("color", "a tag with this color already exists"),
        constraints::TAGS_SLUG => ("slug", "a tag with this slug already exists"),
        constraints::INGREDIENTS_NAME => ("name", "an ingredient with this name already exists"),
        constraints::FAVORITES_USER_RECIPE => ("recipe", "recipe is already in favorites"),
        constraints::SHOPPING_CART_USER_RECIPE => {
            ("recipe", "recipe is already in the shopping cart")
        }
        constraints::SUBSCRIPTIONS_FOLLOWER_AUTHOR => {
            ("author", "already subscribed to this author")
        }
        other => {
            warn!(constraint = other, "unmapped unique constraint violation");
            return DomainError::conflict("resource already exists");
        }
    };
    DomainError::conflict(message).with_details(json!({
        "field": field,
        "code": "duplicate",
    }))
}

fn missing_reference(constraint: &str) -> DomainError {
    match constraint {
        constraints::RECIPE_TAGS_TAG_FK => {
            DomainError::invalid_field("tags", "unknown", "one or more tags do not exist")
        }
        constraints::RECIPE_INGREDIENTS_INGREDIENT_FK => DomainError::invalid_field(
            "ingredients",
            "unknown",
            "one or more ingredients do not exist",
        ),
        constraints::FAVORITES_RECIPE_FK | constraints::SHOPPING_CART_RECIPE_FK => {
            DomainError::not_found("recipe not found")
        }
        constraints::SUBSCRIPTIONS_AUTHOR_FK => DomainError::not_found("author not found"),
        constraints::RECIPES_AUTHOR_FK => DomainError::not_found("user not found"),
        other => {
            warn!(constraint = other, "unmapped foreign key violation");
            DomainError::not_found("referenced resource not found")
        }
    }
}

/// Map a repository failure into the domain error returned to adapters.
pub(crate) fn map_repository_error(error: RepositoryError) -> DomainError {
    match error {
        RepositoryError::Connection { message } => {
            DomainError::service_unavailable(format!("storage unavailable: {message}"))
        }
        RepositoryError::Query { message } => DomainError::internal(format!("storage error: {message}")),
        RepositoryError::UniqueViolation { constraint } => unique_violation(&constraint),
        RepositoryError::MissingReference { constraint } => missing_reference(&constraint),
    }
}
