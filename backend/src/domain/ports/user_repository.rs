//! Port abstraction for user persistence adapters.
use async_trait::async_trait;

use crate::domain::{Email, User, UserId};

use super::RepositoryError;

/// Storage contract for registered users.
///
/// Deleting a user cascades to their recipes, favourites, cart entries and
/// subscriptions in both directions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Duplicate email or username yields
    /// [`RepositoryError::UniqueViolation`].
    async fn create(&self, user: &User) -> Result<(), RepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;

    /// Fetch a user by email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Fetch all users whose id is in `ids`; missing ids are skipped.
    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, RepositoryError>;

    /// All users ordered by username.
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    /// Overwrite profile fields. Returns `false` when the user is gone.
    async fn update(&self, user: &User) -> Result<bool, RepositoryError>;

    /// Remove a user. Returns `false` when nothing was deleted.
    async fn delete(&self, id: &UserId) -> Result<bool, RepositoryError>;
}
