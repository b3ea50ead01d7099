//! Driven port for user persistence and existence checks.

use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId};

use super::Page;

/// Errors raised by user registry adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRegistryError {
    /// Registry connection could not be established.
    #[error("user registry connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("user registry query failed: {message}")]
    Query { message: String },

    /// The email address is already registered.
    #[error("email {email} is already registered")]
    DuplicateEmail { email: String },
}

impl UserRegistryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a duplicate email error.
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }
}

/// Port for registering and looking up users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRegistry: Send + Sync {
    /// Insert a new user and its audit record atomically.
    async fn create(&self, user: &NewUser) -> Result<User, UserRegistryError>;

    /// Point lookup by id.
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, UserRegistryError>;

    /// Page through users ordered by id.
    async fn list(&self, page: Page) -> Result<Vec<User>, UserRegistryError>;

    /// Pure existence probe against the current committed state.
    async fn exists(&self, user_id: UserId) -> Result<bool, UserRegistryError>;
}
