//! Error type shared by every driven repository port, plus the constraint
//! names adapters report so services can translate violations.

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by repository adapters.
    pub enum RepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "repository query failed: {message}",
        /// A unique constraint rejected the write.
        UniqueViolation { constraint: String } => "unique constraint violated: {constraint}",
        /// A foreign key pointed at a row that does not exist.
        MissingReference { constraint: String } => "referenced row missing: {constraint}",
    }
}

impl RepositoryError {
    /// Name of the violated constraint, for the two constraint variants.
    #[must_use]
    pub fn constraint(&self) -> Option<&str> {
        match self {
            Self::UniqueViolation { constraint } | Self::MissingReference { constraint } => {
                Some(constraint.as_str())
            }
            Self::Connection { .. } | Self::Query { .. } => None,
        }
    }
}

/// Constraint names shared by the SQL migrations and the in-memory adapter.
pub mod constraints {
    pub const USERS_EMAIL: &str = "users_email_key";
    pub const USERS_USERNAME: &str = "users_username_key";
    pub const TAGS_NAME: &str = "tags_name_key";
    pub const TAGS_COLOR: &str = "tags_color_key";
    pub const TAGS_SLUG: &str = "tags_slug_key";
    pub const INGREDIENTS_NAME: &str = "ingredients_name_key";
    pub const FAVORITES_USER_RECIPE: &str = "favorites_user_recipe_key";
    pub const SHOPPING_CART_USER_RECIPE: &str = "shopping_cart_user_recipe_key";
    pub const SUBSCRIPTIONS_FOLLOWER_AUTHOR: &str = "subscriptions_follower_author_key";

    pub const RECIPES_AUTHOR_FK: &str = "recipes_author_id_fkey";
    pub const RECIPE_TAGS_TAG_FK: &str = "recipe_tags_tag_id_fkey";
    pub const RECIPE_INGREDIENTS_INGREDIENT_FK: &str = "recipe_ingredients_ingredient_id_fkey";
    pub const FAVORITES_RECIPE_FK: &str = "favorites_recipe_id_fkey";
    pub const SHOPPING_CART_RECIPE_FK: &str = "shopping_cart_recipe_id_fkey";
    pub const SUBSCRIPTIONS_AUTHOR_FK: &str = "subscriptions_author_id_fkey";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_is_exposed_for_violations() {
        let err = RepositoryError::unique_violation(constraints::TAGS_SLUG);
        assert_eq!(err.constraint(), Some("tags_slug_key"));
        assert_eq!(err.to_string(), "unique constraint violated: tags_slug_key");
    }

    #[test]
    fn connection_errors_have_no_constraint() {
        assert!(RepositoryError::connection("refused").constraint().is_none());
    }
}
