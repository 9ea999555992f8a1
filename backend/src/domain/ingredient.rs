//! Catalogue ingredients and their measurement units.

use thiserror::Error as ThisError;

use crate::domain::{DomainError, IngredientId};

/// Maximum ingredient name length.
pub const INGREDIENT_NAME_MAX: usize = 255;
/// Maximum measurement unit length.
pub const MEASUREMENT_UNIT_MAX: usize = 32;

/// Validation failures for ingredient fields.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum IngredientValidationError {
    #[error("ingredient name must not be empty")]
    EmptyName,
    #[error("ingredient name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("measurement unit must not be empty")]
    EmptyUnit,
    #[error("measurement unit must be at most {max} characters")]
    UnitTooLong { max: usize },
}

impl From<IngredientValidationError> for DomainError {
    fn from(value: IngredientValidationError) -> Self {
        let (field, code) = match value {
            IngredientValidationError::EmptyName => ("name", "empty"),
            IngredientValidationError::NameTooLong { .. } => ("name", "too_long"),
            IngredientValidationError::EmptyUnit => ("measurementUnit", "empty"),
            IngredientValidationError::UnitTooLong { .. } => ("measurementUnit", "too_long"),
        };
        Self::invalid_field(field, code, value.to_string())
    }
}

fn bounded(
    raw: &str,
    max: usize,
    empty: IngredientValidationError,
    too_long: IngredientValidationError,
) -> Result<String, IngredientValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(empty);
    }
    if value.chars().count() > max {
        return Err(too_long);
    }
    Ok(value.to_owned())
}

/// Unique ingredient name, e.g. "Flour".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IngredientName(String);

impl IngredientName {
    /// Validate an ingredient name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, IngredientValidationError> {
        bounded(
            name.as_ref(),
            INGREDIENT_NAME_MAX,
            IngredientValidationError::EmptyName,
            IngredientValidationError::NameTooLong {
                max: INGREDIENT_NAME_MAX,
            },
        )
        .map(Self)
    }
}

impl AsRef<str> for IngredientName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl IngredientName {
    /// Borrow the validated value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Measurement unit, e.g. "g" or "pcs".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MeasurementUnit(String);

impl MeasurementUnit {
    /// Validate a measurement unit.
    pub fn new(unit: impl AsRef<str>) -> Result<Self, IngredientValidationError> {
        bounded(
            unit.as_ref(),
            MEASUREMENT_UNIT_MAX,
            IngredientValidationError::EmptyUnit,
            IngredientValidationError::UnitTooLong {
                max: MEASUREMENT_UNIT_MAX,
            },
        )
        .map(Self)
    }
}

impl AsRef<str> for MeasurementUnit {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl MeasurementUnit {
    /// Borrow the validated value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated ingredient contents without an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientDraft {
    pub name: IngredientName,
    pub measurement_unit: MeasurementUnit,
}

impl IngredientDraft {
    /// Validate both ingredient fields.
    pub fn try_from_parts(name: &str, unit: &str) -> Result<Self, IngredientValidationError> {
        Ok(Self {
            name: IngredientName::new(name)?,
            measurement_unit: MeasurementUnit::new(unit)?,
        })
    }
}

/// Partial ingredient update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientPatch {
    pub name: Option<IngredientName>,
    pub measurement_unit: Option<MeasurementUnit>,
}

/// Persisted ingredient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: IngredientName,
    pub measurement_unit: MeasurementUnit,
}

impl Ingredient {
    /// Attach an identity to a draft.
    #[must_use]
    pub fn new(id: IngredientId, draft: IngredientDraft) -> Self {
        Self {
            id,
            name: draft.name,
            measurement_unit: draft.measurement_unit,
        }
    }

    /// Return a copy with `patch` applied.
    #[must_use]
    pub fn patched(mut self, patch: IngredientPatch) -> Self {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(unit) = patch.measurement_unit {
            self.measurement_unit = unit;
        }
        self
    }
}

/// Listing filter for the ingredient catalogue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientFilter {
    /// Case-insensitive name prefix.
    pub name_prefix: Option<String>,
}

impl IngredientFilter {
    /// Build a filter, ignoring blank prefixes.
    #[must_use]
    pub fn by_prefix(prefix: Option<&str>) -> Self {
        let name_prefix = prefix
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        Self { name_prefix }
    }

    /// Whether `ingredient` passes the filter.
    #[must_use]
    pub fn matches(&self, ingredient: &Ingredient) -> bool {
        self.name_prefix.as_deref().is_none_or(|prefix| {
            ingredient
                .name
                .as_ref()
                .to_lowercase()
                .starts_with(&prefix.to_lowercase())
        })
    }
}
