//! Login credentials accepted by the authentication port.
//!
//! Handlers build [`LoginCredentials`] from request payloads so services never
//! see unvalidated strings. The password is wiped from memory on drop.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{Email, DomainError};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or malformed.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

impl From<LoginValidationError> for DomainError {
    fn from(value: LoginValidationError) -> Self {
        let field = match value {
            LoginValidationError::InvalidEmail => "email",
            LoginValidationError::EmptyPassword => "password",
        };
        Self::invalid_field(field, "invalid", value.to_string())
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` satisfies [`Email`] validation.
/// - `password` is non-empty; whitespace is preserved as typed.
///
/// # Examples
/// ```
/// use foodgram::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("cook@example.com", "secret").unwrap();
/// assert_eq!(creds.email().as_ref(), "cook@example.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(raw_email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = Email::new(raw_email).map_err(|_| LoginValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used to look up the account.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Password supplied by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
