//! PostgreSQL-backed `SubscriptionRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{RepositoryError, SubscriptionRepository};
use crate::domain::{Subscription, UserId};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::models::NewSubscriptionRow;
use super::pool::DbPool;
use super::schema::subscriptions;

/// Diesel-backed implementation of the [`SubscriptionRepository`] port.
#[derive(Clone)]
pub struct DieselSubscriptionRepository {
    pool: DbPool,
}

impl DieselSubscriptionRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for DieselSubscriptionRepository {
    async fn create(&self, subscription: &Subscription) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewSubscriptionRow {
            follower_id: *subscription.follower().as_uuid(),
            author_id: *subscription.author().as_uuid(),
            date_added: subscription.date_added(),
        };
        diesel::insert_into(subscriptions::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete(&self, follower: &UserId, author: &UserId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            subscriptions::table
                .filter(subscriptions::follower_id.eq(follower.as_uuid()))
                .filter(subscriptions::author_id.eq(author.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn author_ids(&self, follower: &UserId) -> Result<Vec<UserId>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<Uuid> = subscriptions::table
            .filter(subscriptions::follower_id.eq(follower.as_uuid()))
            .order_by((subscriptions::date_added, subscriptions::id))
            .select(subscriptions::author_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }
}
