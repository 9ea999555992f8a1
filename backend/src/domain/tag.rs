//! Recipe tags such as "breakfast" or "vegan".
//!
//! Name, colour and slug are each unique across all tags. Colours are stored
//! upper-cased so `#ff0000` and `#FF0000` collide.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error as ThisError;

use crate::domain::{DomainError, TagId};

/// Maximum tag name length.
pub const TAG_NAME_MAX: usize = 64;
/// Maximum tag slug length.
pub const TAG_SLUG_MAX: usize = 64;

/// Validation failures for tag fields.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum TagValidationError {
    #[error("tag name must not be empty")]
    EmptyName,
    #[error("tag name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("color must be a hex value in the form #RRGGBB")]
    InvalidColor,
    #[error("slug must not be empty")]
    EmptySlug,
    #[error("slug must be at most {max} characters")]
    SlugTooLong { max: usize },
    #[error("slug may only contain latin letters, digits, hyphens and underscores")]
    InvalidSlug,
}

impl From<TagValidationError> for DomainError {
    fn from(value: TagValidationError) -> Self {
        let (field, code) = match value {
            TagValidationError::EmptyName => ("name", "empty"),
            TagValidationError::NameTooLong { .. } => ("name", "too_long"),
            TagValidationError::InvalidColor => ("color", "invalid_format"),
            TagValidationError::EmptySlug => ("slug", "empty"),
            TagValidationError::SlugTooLong { .. } => ("slug", "too_long"),
            TagValidationError::InvalidSlug => ("slug", "invalid_format"),
        };
        Self::invalid_field(field, code, value.to_string())
    }
}

/// Human readable tag label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagName(String);

impl TagName {
    /// Validate a tag name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TagValidationError> {
        let name = raw.as_ref().trim();
        if name.is_empty() {
            return Err(TagValidationError::EmptyName);
        }
        if name.chars().count() > TAG_NAME_MAX {
            return Err(TagValidationError::NameTooLong { max: TAG_NAME_MAX });
        }
        Ok(Self(name.to_owned()))
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl TagName {
    /// Borrow the validated value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Display colour in `#RRGGBB` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexColor(String);

impl HexColor {
    /// Validate and upper-case a colour.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TagValidationError> {
        let color = raw.as_ref().trim();
        let digits = color
            .strip_prefix('#')
            .ok_or(TagValidationError::InvalidColor)?;
        if digits.len() != 6 || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(TagValidationError::InvalidColor);
        }
        Ok(Self(format!("#{}", digits.to_ascii_uppercase())))
    }
}

impl AsRef<str> for HexColor {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl HexColor {
    /// Borrow the validated value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// URL-safe tag key used by recipe filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagSlug(String);

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_regex() -> &'static Regex {
    SLUG_RE.get_or_init(|| {
        Regex::new("^[-a-zA-Z0-9_]+$")
            .unwrap_or_else(|error| panic!("slug regex failed to compile: {error}"))
    })
}

impl TagSlug {
    /// Validate a slug.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TagValidationError> {
        let slug = raw.as_ref().trim();
        if slug.is_empty() {
            return Err(TagValidationError::EmptySlug);
        }
        if slug.len() > TAG_SLUG_MAX {
            return Err(TagValidationError::SlugTooLong { max: TAG_SLUG_MAX });
        }
        if !slug_regex().is_match(slug) {
            return Err(TagValidationError::InvalidSlug);
        }
        Ok(Self(slug.to_owned()))
    }
}

impl AsRef<str> for TagSlug {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl TagSlug {
    /// Borrow the validated value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated tag contents without an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDraft {
    pub name: TagName,
    pub color: HexColor,
    pub slug: TagSlug,
}

impl TagDraft {
    /// Validate all tag fields at once.
    pub fn try_from_parts(name: &str, color: &str, slug: &str) -> Result<Self, TagValidationError> {
        Ok(Self {
            name: TagName::new(name)?,
            color: HexColor::new(color)?,
            slug: TagSlug::new(slug)?,
        })
    }
}

/// Partial tag update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPatch {
    pub name: Option<TagName>,
    pub color: Option<HexColor>,
    pub slug: Option<TagSlug>,
}

/// Persisted tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: TagName,
    pub color: HexColor,
    pub slug: TagSlug,
}

impl Tag {
    /// Attach an identity to a draft.
    #[must_use]
    pub fn new(id: TagId, draft: TagDraft) -> Self {
        Self {
            id,
            name: draft.name,
            color: draft.color,
            slug: draft.slug,
        }
    }

    /// Return a copy with `patch` applied.
    #[must_use]
    pub fn patched(mut self, patch: TagPatch) -> Self {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(slug) = patch.slug {
            self.slug = slug;
        }
        self
    }
}
