//! User identity and profile data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 255;
/// Maximum allowed length for a full name.
pub const FULL_NAME_MAX: usize = 120;

/// Validation errors returned by [`NewUser::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyEmail,
    InvalidEmail,
    EmailTooLong { max: usize },
    FullNameTooLong { max: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must contain a local part and a domain"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::FullNameTooLong { max } => {
                write!(f, "full name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier backed by the serial primary key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a raw identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for UserId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// A registered marketplace user.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    email: String,
    full_name: Option<String>,
    created_at: DateTime<Utc>,
}

impl User {
    /// Construct a user from persisted parts, revalidating the profile fields.
    pub fn from_parts(
        id: UserId,
        email: String,
        full_name: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, UserValidationError> {
        validate_email(&email)?;
        validate_full_name(full_name.as_deref())?;
        Ok(Self {
            id,
            email,
            full_name,
            created_at,
        })
    }

    /// Returns the user id.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the unique email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the optional display name.
    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    /// Returns the registration timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Validated payload for registering a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    email: String,
    full_name: Option<String>,
}

impl NewUser {
    /// Validate and construct a registration payload.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::NewUser;
    ///
    /// let user = NewUser::new("ada@example.org", Some("Ada Lovelace".to_owned()))?;
    /// assert_eq!(user.email(), "ada@example.org");
    /// # Ok::<(), backend::domain::UserValidationError>(())
    /// ```
    pub fn new(
        email: impl Into<String>,
        full_name: Option<String>,
    ) -> Result<Self, UserValidationError> {
        let email = email.into();
        validate_email(&email)?;
        validate_full_name(full_name.as_deref())?;
        Ok(Self { email, full_name })
    }

    /// Returns the email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the optional display name.
    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }
}

fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }
    if email.len() > EMAIL_MAX {
        return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
    }
    // Shape check only; deliverability is the mail system's problem.
    let Some((local, domain)) = email.split_once('@') else {
        return Err(UserValidationError::InvalidEmail);
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return Err(UserValidationError::InvalidEmail);
    }
    Ok(())
}

fn validate_full_name(full_name: Option<&str>) -> Result<(), UserValidationError> {
    if let Some(name) = full_name
        && name.len() > FULL_NAME_MAX
    {
        return Err(UserValidationError::FullNameTooLong { max: FULL_NAME_MAX });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::plain("ada@example.org")]
    #[case::subdomain("grace.hopper@mail.navy.mil")]
    fn accepts_valid_emails(#[case] email: &str) {
        let user = NewUser::new(email, None).expect("valid email");
        assert_eq!(user.email(), email);
    }

    #[rstest]
    #[case::empty("", UserValidationError::EmptyEmail)]
    #[case::no_at("ada.example.org", UserValidationError::InvalidEmail)]
    #[case::no_local("@example.org", UserValidationError::InvalidEmail)]
    #[case::no_domain("ada@", UserValidationError::InvalidEmail)]
    #[case::double_at("ada@b@c", UserValidationError::InvalidEmail)]
    #[case::whitespace("ada lovelace@example.org", UserValidationError::InvalidEmail)]
    fn rejects_invalid_emails(#[case] email: &str, #[case] expected: UserValidationError) {
        let error = NewUser::new(email, None).expect_err("invalid email");
        assert_eq!(error, expected);
    }

    #[rstest]
    fn rejects_oversized_email() {
        let email = format!("{}@example.org", "a".repeat(EMAIL_MAX));
        let error = NewUser::new(email, None).expect_err("oversized email");
        assert_eq!(error, UserValidationError::EmailTooLong { max: EMAIL_MAX });
    }

    #[rstest]
    fn rejects_oversized_full_name() {
        let error = NewUser::new("ada@example.org", Some("x".repeat(FULL_NAME_MAX + 1)))
            .expect_err("oversized name");
        assert_eq!(
            error,
            UserValidationError::FullNameTooLong { max: FULL_NAME_MAX }
        );
    }
}
