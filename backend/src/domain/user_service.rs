//! User accounts and subscriptions.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::ports::{RecipeRepository, Repositories, SubscriptionRepository, UserRepository};
use crate::domain::repository_errors::map_repository_error;
use crate::domain::{
    DomainError, Subscription, SubscriptionSummary, User, UserId, UserPatch, UserProfile,
    UserRegistration,
};

/// Registration, profile management and follower subscriptions.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    recipes: Arc<dyn RecipeRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl UserService {
    /// Create a service over the given ports.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        recipes: Arc<dyn RecipeRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            users,
            recipes,
            subscriptions,
        }
    }

    /// Pick the ports this service needs from a bundle.
    #[must_use]
    pub fn from_repositories(repositories: &Repositories) -> Self {
        Self::new(
            repositories.users.clone(),
            repositories.recipes.clone(),
            repositories.subscriptions.clone(),
        )
    }

    async fn followed_by(&self, caller: Option<&UserId>) -> Result<HashSet<UserId>, DomainError> {
        let Some(viewer) = caller else {
            return Ok(HashSet::new());
        };
        let ids = self
            .subscriptions
            .author_ids(viewer)
            .await
            .map_err(map_repository_error)?;
        Ok(ids.into_iter().collect())
    }

    async fn require_user(&self, id: &UserId) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| DomainError::not_found("user not found"))
    }

    /// Register a new account.
    pub async fn register(&self, registration: UserRegistration) -> Result<User, DomainError> {
        let user = User::register(UserId::random(), registration);
        self.users
            .create(&user)
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// All users, annotated for `viewer`.
    pub async fn list(&self, viewer: Option<&UserId>) -> Result<Vec<UserProfile>, DomainError> {
        let followed = self.followed_by(viewer).await?;
        let users = self.users.list().await.map_err(map_repository_error)?;
        Ok(users
            .into_iter()
            .map(|user| UserProfile {
                is_subscribed: followed.contains(&user.id),
                user,
            })
            .collect())
    }

    /// One user, annotated for `viewer`.
    pub async fn get(&self, viewer: Option<&UserId>, id: &UserId) -> Result<UserProfile, DomainError> {
        let user = self.require_user(id).await?;
        let followed = self.followed_by(viewer).await?;
        Ok(UserProfile {
            is_subscribed: followed.contains(&user.id),
            user,
        })
    }

    /// The caller's own profile.
    pub async fn me(&self, id: &UserId) -> Result<User, DomainError> {
        self.require_user(id).await
    }

    /// Apply a partial profile update to the caller.
    pub async fn update_me(&self, id: &UserId, patch: UserPatch) -> Result<User, DomainError> {
        let current = self.require_user(id).await?;
        if patch.is_empty() {
            return Ok(current);
        }
        let updated = current.patched(patch);
        let found = self
            .users
            .update(&updated)
            .await
            .map_err(map_repository_error)?;
        if !found {
            return Err(DomainError::not_found("user not found"));
        }
        info!(user_id = %id, "user profile updated");
        Ok(updated)
    }

    /// Delete the caller's account and everything it owns.
    pub async fn delete_me(&self, id: &UserId) -> Result<(), DomainError> {
        let deleted = self.users.delete(id).await.map_err(map_repository_error)?;
        if !deleted {
            return Err(DomainError::not_found("user not found"));
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    async fn summarise(
        &self,
        author: User,
        recipes_limit: Option<usize>,
    ) -> Result<SubscriptionSummary, DomainError> {
        let recipes = self
            .recipes
            .summaries_by_author(&author.id, recipes_limit)
            .await
            .map_err(map_repository_error)?;
        let recipes_count = self
            .recipes
            .count_by_author(&author.id)
            .await
            .map_err(map_repository_error)?;
        Ok(SubscriptionSummary {
            author,
            recipes,
            recipes_count,
        })
    }

    /// Follow `author`.
    ///
    /// Self-subscription is rejected before any storage access.
    pub async fn subscribe(
        &self,
        follower: &UserId,
        author: &UserId,
        recipes_limit: Option<usize>,
    ) -> Result<SubscriptionSummary, DomainError> {
        let subscription = Subscription::new(*follower, *author, Utc::now())?;
        let author_user = self
            .users
            .find_by_id(author)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| DomainError::not_found("author not found"))?;
        self.subscriptions
            .create(&subscription)
            .await
            .map_err(map_repository_error)?;
        info!(follower_id = %follower, author_id = %author, "subscription created");
        self.summarise(author_user, recipes_limit).await
    }

    /// Stop following `author`.
    pub async fn unsubscribe(&self, follower: &UserId, author: &UserId) -> Result<(), DomainError> {
        let removed = self
            .subscriptions
            .delete(follower, author)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(DomainError::not_found("not subscribed to this author"));
        }
        info!(follower_id = %follower, author_id = %author, "subscription removed");
        Ok(())
    }

    /// Authors the follower subscribes to, oldest subscription first.
    pub async fn subscriptions(
        &self,
        follower: &UserId,
        recipes_limit: Option<usize>,
    ) -> Result<Vec<SubscriptionSummary>, DomainError> {
        let author_ids = self
            .subscriptions
            .author_ids(follower)
            .await
            .map_err(map_repository_error)?;
        let mut authors: HashMap<UserId, User> = self
            .users
            .find_by_ids(&author_ids)
            .await
            .map_err(map_repository_error)?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        let mut summaries = Vec::with_capacity(author_ids.len());
        for author_id in &author_ids {
            if let Some(author) = authors.remove(author_id) {
                summaries.push(self.summarise(author, recipes_limit).await?);
            }
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    //! Service-level tests using mocked ports.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        MockRecipeRepository, MockSubscriptionRepository, MockUserRepository, RepositoryError,
        constraints,
    };

    fn user(name: &str) -> User {
        let registration = UserRegistration::try_from_parts(
            &format!("{name}@example.com"),
            name,
            "First",
            "Last",
        )
        .expect("valid registration");
        User::register(UserId::random(), registration)
    }

    fn service(
        users: MockUserRepository,
        recipes: MockRecipeRepository,
        subscriptions: MockSubscriptionRepository,
    ) -> UserService {
        UserService::new(Arc::new(users), Arc::new(recipes), Arc::new(subscriptions))
    }

    #[tokio::test]
    async fn self_subscription_never_reaches_storage() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().times(0);
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions.expect_create().times(0);

        let svc = service(users, MockRecipeRepository::new(), subscriptions);
        let me = UserId::random();
        let err = svc.subscribe(&me, &me, None).await.expect_err("rejected");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn duplicate_subscription_is_conflict() {
        let author = user("author");
        let author_id = author.id;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(author)));
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions.expect_create().return_once(|_| {
            Err(RepositoryError::unique_violation(
                constraints::SUBSCRIPTIONS_FOLLOWER_AUTHOR,
            ))
        });

        let svc = service(users, MockRecipeRepository::new(), subscriptions);
        let err = svc
            .subscribe(&UserId::random(), &author_id, None)
            .await
            .expect_err("duplicate");

        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn subscribe_to_unknown_author_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(None));
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions.expect_create().times(0);

        let svc = service(users, MockRecipeRepository::new(), subscriptions);
        let err = svc
            .subscribe(&UserId::random(), &UserId::random(), None)
            .await
            .expect_err("missing author");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn subscription_summary_reports_limit_and_total() {
        let author = user("baker");
        let author_id = author.id;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(author)));
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions.expect_create().return_once(|_| Ok(()));
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_summaries_by_author()
            .withf(|_, limit| *limit == Some(2))
            .return_once(|_, _| Ok(Vec::new()));
        recipes.expect_count_by_author().return_once(|_| Ok(7));

        let svc = service(users, recipes, subscriptions);
        let summary = svc
            .subscribe(&UserId::random(), &author_id, Some(2))
            .await
            .expect("subscribed");

        assert_eq!(summary.author.id, author_id);
        assert_eq!(summary.recipes_count, 7);
    }

    #[tokio::test]
    async fn storage_outage_is_service_unavailable() {
        let mut users = MockUserRepository::new();
        users
            .expect_list()
            .return_once(|| Err(RepositoryError::connection("refused")));

        let svc = service(
            users,
            MockRecipeRepository::new(),
            MockSubscriptionRepository::new(),
        );
        let err = svc.list(None).await.expect_err("outage");

        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[tokio::test]
    async fn empty_patch_skips_update() {
        let me = user("quiet");
        let id = me.id;
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(move |_| Ok(Some(me)));
        users.expect_update().times(0);

        let svc = service(
            users,
            MockRecipeRepository::new(),
            MockSubscriptionRepository::new(),
        );
        let unchanged = svc
            .update_me(&id, UserPatch::default())
            .await
            .expect("no-op patch");

        assert_eq!(unchanged.id, id);
    }
}
