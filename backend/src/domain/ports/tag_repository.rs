//! Port for tag persistence.
use async_trait::async_trait;

use crate::domain::{Tag, TagId};

use super::RepositoryError;

/// Storage contract for recipe tags.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Insert a tag; name, colour and slug must be unused.
    async fn create(&self, tag: &Tag) -> Result<(), RepositoryError>;

    /// Fetch a tag by identifier.
    async fn find_by_id(&self, id: &TagId) -> Result<Option<Tag>, RepositoryError>;

    /// Fetch the tags whose id is in `ids`, ordered by slug.
    async fn find_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>, RepositoryError>;

    /// All tags ordered by slug.
    async fn list(&self) -> Result<Vec<Tag>, RepositoryError>;

    /// Overwrite a tag. Returns `false` when it does not exist.
    async fn update(&self, tag: &Tag) -> Result<bool, RepositoryError>;

    /// Remove a tag and detach it from recipes.
    async fn delete(&self, id: &TagId) -> Result<bool, RepositoryError>;
}
