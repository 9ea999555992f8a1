//! User data model.
//!
//! Users are identified by a UUID and carry a unique email and username plus
//! display names. Credentials never live here; see [`crate::domain::ports::LoginService`].

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{DomainError, UserId};

/// Maximum email length accepted at registration.
pub const EMAIL_MAX: usize = 254;
/// Maximum username length.
pub const USERNAME_MAX: usize = 150;
/// Maximum first or last name length.
pub const PERSON_NAME_MAX: usize = 150;

/// Validation errors returned by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyEmail,
    EmailTooLong { max: usize },
    InvalidEmail,
    EmptyUsername,
    UsernameTooLong { max: usize },
    UsernameInvalidCharacters,
    EmptyFirstName,
    FirstNameTooLong { max: usize },
    EmptyLastName,
    LastNameTooLong { max: usize },
}

impl UserValidationError {
    /// Request field the failure relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::EmailTooLong { .. } | Self::InvalidEmail => "email",
            Self::EmptyUsername | Self::UsernameTooLong { .. } | Self::UsernameInvalidCharacters => {
                "username"
            }
            Self::EmptyFirstName | Self::FirstNameTooLong { .. } => "firstName",
            Self::EmptyLastName | Self::LastNameTooLong { .. } => "lastName",
        }
    }

    const fn code(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::EmptyUsername | Self::EmptyFirstName | Self::EmptyLastName => {
                "empty"
            }
            Self::EmailTooLong { .. }
            | Self::UsernameTooLong { .. }
            | Self::FirstNameTooLong { .. }
            | Self::LastNameTooLong { .. } => "too_long",
            Self::InvalidEmail | Self::UsernameInvalidCharacters => "invalid_format",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::InvalidEmail => write!(f, "email must look like name@domain"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, digits and @/./+/-/_ characters",
            ),
            Self::EmptyFirstName => write!(f, "first name must not be empty"),
            Self::FirstNameTooLong { max } => {
                write!(f, "first name must be at most {max} characters")
            }
            Self::EmptyLastName => write!(f, "last name must not be empty"),
            Self::LastNameTooLong { max } => {
                write!(f, "last name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

impl From<UserValidationError> for DomainError {
    fn from(value: UserValidationError) -> Self {
        Self::invalid_field(value.field(), value.code(), value.to_string())
    }
}

/// Unique contact address used as the login identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`]. Surrounding whitespace is trimmed.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let email = raw.as_ref().trim();
        if email.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if email.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        let Some((local, domain)) = email.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        if local.is_empty()
            || domain.is_empty()
            || domain.contains('@')
            || email.chars().any(char::is_whitespace)
        {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Email {
    /// Borrow the validated value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Public handle shown next to recipes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        Regex::new(r"^[\w.@+-]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let username = raw.as_ref().trim();
        if username.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if username.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(username) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(username.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Username {
    /// Borrow the validated value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// First or last name of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a first name.
    pub fn first(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::validate(
            name.as_ref(),
            UserValidationError::EmptyFirstName,
            UserValidationError::FirstNameTooLong {
                max: PERSON_NAME_MAX,
            },
        )
    }

    /// Validate a last name.
    pub fn last(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::validate(
            name.as_ref(),
            UserValidationError::EmptyLastName,
            UserValidationError::LastNameTooLong {
                max: PERSON_NAME_MAX,
            },
        )
    }

    fn validate(
        name: &str,
        empty: UserValidationError,
        too_long: UserValidationError,
    ) -> Result<Self, UserValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(empty);
        }
        if name.chars().count() > PERSON_NAME_MAX {
            return Err(too_long);
        }
        Ok(Self(name.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl PersonName {
    /// Borrow the validated value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated registration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRegistration {
    pub email: Email,
    pub username: Username,
    pub first_name: PersonName,
    pub last_name: PersonName,
}

impl UserRegistration {
    /// Validate raw registration fields.
    pub fn try_from_parts(
        email: &str,
        username: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            email: Email::new(email)?,
            username: Username::new(username)?,
            first_name: PersonName::first(first_name)?,
            last_name: PersonName::last(last_name)?,
        })
    }
}

/// Partial profile update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub email: Option<Email>,
    pub username: Option<Username>,
    pub first_name: Option<PersonName>,
    pub last_name: Option<PersonName>,
}

impl UserPatch {
    /// True when the patch would not change anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.username.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
    }
}

/// Registered application user.
///
/// ## Invariants
/// - `email` and `username` are unique across all users; storage enforces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub username: Username,
    pub first_name: PersonName,
    pub last_name: PersonName,
}

impl User {
    /// Build a user from an identifier and a validated registration.
    #[must_use]
    pub fn register(id: UserId, registration: UserRegistration) -> Self {
        let UserRegistration {
            email,
            username,
            first_name,
            last_name,
        } = registration;
        Self {
            id,
            email,
            username,
            first_name,
            last_name,
        }
    }

    /// Return a copy with `patch` applied.
    #[must_use]
    pub fn patched(mut self, patch: UserPatch) -> Self {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        self
    }
}

/// A user as seen by a particular caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user: User,
    /// Whether the caller follows this user; always `false` for anonymous
    /// callers and for the caller's own profile.
    pub is_subscribed: bool,
}
