//! Port for follower-to-author subscriptions.
use async_trait::async_trait;

use crate::domain::{Subscription, UserId};

use super::RepositoryError;

/// Storage contract for subscriptions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Store a subscription. Duplicates yield
    /// [`RepositoryError::UniqueViolation`]; an unknown author yields
    /// [`RepositoryError::MissingReference`].
    async fn create(&self, subscription: &Subscription) -> Result<(), RepositoryError>;

    /// Remove a subscription. Returns `false` when none existed.
    async fn delete(&self, follower: &UserId, author: &UserId) -> Result<bool, RepositoryError>;

    /// Authors followed by `follower`, oldest subscription first.
    async fn author_ids(&self, follower: &UserId) -> Result<Vec<UserId>, RepositoryError>;
}
