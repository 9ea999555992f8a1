//! Login adapter that accepts one configured password for every account.
//!
//! Credential storage lives outside this service. Until it is wired in, any
//! registered user may sign in with the deployment's shared password. With no
//! password configured every attempt is refused.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{LoginService, UserRepository};
use crate::domain::repository_errors::map_repository_error;
use crate::domain::{DomainError, LoginCredentials, UserId};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// [`LoginService`] backed by the user repository and a shared password.
pub struct SharedPasswordLoginService {
    users: Arc<dyn UserRepository>,
    password: Option<Zeroizing<String>>,
}

impl SharedPasswordLoginService {
    /// Build the service. `None` disables login.
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, configured: Option<Zeroizing<String>>) -> Self {
        let password = configured.filter(|value| !value.is_empty());
        if password.is_none() {
            warn!("no login password configured; all login attempts will be rejected");
        }
        Self { users, password }
    }
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[async_trait]
impl LoginService for SharedPasswordLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, DomainError> {
        let Some(expected) = self.password.as_ref() else {
            return Err(DomainError::unauthorized(INVALID_CREDENTIALS));
        };
        let found = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_repository_error)?;
        let Some(user) = found else {
            return Err(DomainError::unauthorized(INVALID_CREDENTIALS));
        };
        if !constant_time_eq(credentials.password().as_bytes(), expected.as_bytes()) {
            return Err(DomainError::unauthorized(INVALID_CREDENTIALS));
        }
        info!(user_id = %user.id, "login succeeded");
        Ok(user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::{ErrorCode, User, UserRegistration};
    use rstest::rstest;

    fn stored_user() -> User {
        let registration =
            UserRegistration::try_from_parts("ada@example.com", "ada", "Ada", "Lovelace")
                .expect("valid registration");
        User::register(UserId::random(), registration)
    }

    fn credentials(password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts("ada@example.com", password).expect("credentials")
    }

    #[tokio::test]
    async fn accepts_shared_password_for_known_user() {
        let user = stored_user();
        let id = user.id;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .return_once(move |_| Ok(Some(user)));
        let service =
            SharedPasswordLoginService::new(Arc::new(users), Some(Zeroizing::new("s3cret".into())));

        let authenticated = service
            .authenticate(&credentials("s3cret"))
            .await
            .expect("login");

        assert_eq!(authenticated, id);
    }

    #[rstest]
    #[case::wrong_password(Some("s3cret"), "guess")]
    #[case::no_password_configured(None, "s3cret")]
    #[case::empty_password_configured(Some(""), "s3cret")]
    #[tokio::test]
    async fn rejects_other_attempts(#[case] configured: Option<&str>, #[case] attempt: &str) {
        let user = stored_user();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        let service = SharedPasswordLoginService::new(
            Arc::new(users),
            configured.map(|value| Zeroizing::new(value.to_owned())),
        );

        let err = service
            .authenticate(&credentials(attempt))
            .await
            .expect_err("rejected");

        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn unknown_email_is_unauthorized() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().return_once(|_| Ok(None));
        let service =
            SharedPasswordLoginService::new(Arc::new(users), Some(Zeroizing::new("s3cret".into())));

        let err = service
            .authenticate(&credentials("s3cret"))
            .await
            .expect_err("unknown user");

        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
