//! Shared validation helpers for inbound HTTP adapters.
//!
//! Path ids and query strings arrive as raw text; these helpers parse them
//! into domain types and report failures with a `{field, value, code}`
//! details object.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{DomainError, RecipeListQuery, TagSlug, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidFlag,
    InvalidNumber,
    InvalidSlug,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidFlag => "invalid_flag",
            Self::InvalidNumber => "invalid_number",
            Self::InvalidSlug => "invalid_slug",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(&self) -> &str {
        self.0
    }
}

fn invalid_value(field: FieldName, code: ErrorCode, message: String, value: &str) -> DomainError {
    DomainError::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// Parse a UUID-backed identifier such as [`crate::domain::RecipeId`].
pub(crate) fn parse_id<T: FromStr>(value: &str, field: FieldName) -> Result<T, DomainError> {
    value.parse().map_err(|_| {
        invalid_value(
            field,
            ErrorCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            value,
        )
    })
}

/// Accept `1`/`true` and `0`/`false`, the forms browsers and the SPA send.
pub(crate) fn parse_flag(value: &str, field: FieldName) -> Result<bool, DomainError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        _ => Err(invalid_value(
            field,
            ErrorCode::InvalidFlag,
            format!("{} must be 0 or 1", field.as_str()),
            value,
        )),
    }
}

/// Parse an optional non-negative count such as `recipes_limit`.
pub(crate) fn parse_limit(value: Option<&str>, field: FieldName) -> Result<Option<usize>, DomainError> {
    value
        .map(|raw| {
            raw.trim().parse::<usize>().map_err(|_| {
                invalid_value(
                    field,
                    ErrorCode::InvalidNumber,
                    format!("{} must be a non-negative integer", field.as_str()),
                    raw,
                )
            })
        })
        .transpose()
}

const AUTHOR: FieldName = FieldName::new("author");
const TAGS: FieldName = FieldName::new("tags");
const IS_FAVORITED: FieldName = FieldName::new("is_favorited");
const IS_IN_SHOPPING_CART: FieldName = FieldName::new("is_in_shopping_cart");

/// Parse the recipe list query string.
///
/// `tags` may repeat (`?tags=lunch&tags=dinner`), which `serde_urlencoded`
/// cannot express as a struct field, so the pairs are walked by hand.
/// Unknown keys are ignored.
pub(crate) fn parse_recipe_query(query: &str) -> Result<RecipeListQuery, DomainError> {
    let mut parsed = RecipeListQuery::default();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match &*key {
            "author" => parsed.author = Some(parse_id::<UserId>(&value, AUTHOR)?),
            "tags" => {
                let slug = TagSlug::new(&*value).map_err(|_| {
                    invalid_value(
                        TAGS,
                        ErrorCode::InvalidSlug,
                        "tags must be tag slugs".to_owned(),
                        &value,
                    )
                })?;
                if !parsed.tag_slugs.contains(&slug) {
                    parsed.tag_slugs.push(slug);
                }
            }
            "is_favorited" => parsed.is_favorited = parse_flag(&value, IS_FAVORITED)?,
            "is_in_shopping_cart" => {
                parsed.is_in_shopping_cart = parse_flag(&value, IS_IN_SHOPPING_CART)?;
            }
            _ => {}
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode as DomainErrorCode, RecipeId};
    use rstest::rstest;

    #[rstest]
    fn empty_query_is_default() {
        assert_eq!(parse_recipe_query("").expect("valid"), RecipeListQuery::default());
    }

    #[rstest]
    fn repeated_tags_are_collected_once_each() {
        let parsed =
            parse_recipe_query("tags=lunch&tags=dinner&tags=lunch&page=2").expect("valid");
        let slugs: Vec<&str> = parsed.tag_slugs.iter().map(TagSlug::as_str).collect();
        assert_eq!(slugs, ["lunch", "dinner"]);
    }

    #[rstest]
    #[case("is_favorited=1", true, false)]
    #[case("is_in_shopping_cart=true", false, true)]
    #[case("is_favorited=0&is_in_shopping_cart=1", false, true)]
    fn flags_parse(#[case] query: &str, #[case] favorited: bool, #[case] in_cart: bool) {
        let parsed = parse_recipe_query(query).expect("valid");
        assert_eq!(parsed.is_favorited, favorited);
        assert_eq!(parsed.is_in_shopping_cart, in_cart);
    }

    #[rstest]
    #[case("author=nope", "author", "invalid_uuid")]
    #[case("is_favorited=maybe", "is_favorited", "invalid_flag")]
    #[case("tags=no%20spaces", "tags", "invalid_slug")]
    fn invalid_values_name_the_field(
        #[case] query: &str,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let err = parse_recipe_query(query).expect_err("invalid");
        assert_eq!(err.code(), DomainErrorCode::InvalidRequest);
        let details = err.details().expect("details");
        assert_eq!(details["field"], field);
        assert_eq!(details["code"], code);
    }

    #[rstest]
    fn ids_parse_into_typed_ids() {
        let id: RecipeId =
            parse_id("3fa85f64-5717-4562-b3fc-2c963f66afa6", FieldName::new("id")).expect("uuid");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("3"), Some(3))]
    fn limits_parse(#[case] raw: Option<&str>, #[case] expected: Option<usize>) {
        assert_eq!(
            parse_limit(raw, FieldName::new("recipes_limit")).expect("valid"),
            expected
        );
    }

    #[rstest]
    fn negative_limit_is_rejected() {
        assert!(parse_limit(Some("-1"), FieldName::new("recipes_limit")).is_err());
    }
}
