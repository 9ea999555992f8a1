//! Follower-to-author subscriptions.

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, RecipeSummary, User, UserId};

/// A follower's subscription to an author.
///
/// ## Invariants
/// - `follower != author`; enforced by [`Subscription::new`] before anything
///   reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    follower: UserId,
    author: UserId,
    date_added: DateTime<Utc>,
}

impl Subscription {
    /// Create a subscription, rejecting attempts to follow oneself.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use foodgram::domain::{Subscription, UserId};
    ///
    /// let me = UserId::random();
    /// assert!(Subscription::new(me, me, Utc::now()).is_err());
    /// ```
    pub fn new(follower: UserId, author: UserId, date_added: DateTime<Utc>) -> Result<Self, DomainError> {
        if follower == author {
            return Err(DomainError::invalid_field(
                "author",
                "self_subscription",
                "users cannot subscribe to themselves",
            ));
        }
        Ok(Self {
            follower,
            author,
            date_added,
        })
    }

    /// The subscribing user.
    #[must_use]
    pub const fn follower(&self) -> &UserId {
        &self.follower
    }

    /// The followed author.
    #[must_use]
    pub const fn author(&self) -> &UserId {
        &self.author
    }

    /// When the subscription was created.
    #[must_use]
    pub const fn date_added(&self) -> DateTime<Utc> {
        self.date_added
    }
}

/// A followed author together with their recent recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionSummary {
    pub author: User,
    /// Newest first, truncated to the requested limit.
    pub recipes: Vec<RecipeSummary>,
    /// Total number of recipes by the author, ignoring the limit.
    pub recipes_count: u64,
}
