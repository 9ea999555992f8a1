//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call this port to authenticate credentials without
//! knowing how passwords are verified. Credential storage is outside this
//! service; the shipped implementation checks a single configured password
//! (see [`crate::domain::SharedPasswordLoginService`]).

use async_trait::async_trait;

use crate::domain::{DomainError, LoginCredentials, UserId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, DomainError>;
}
