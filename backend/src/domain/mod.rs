//! Domain primitives, aggregates, and use-case ports.
//!
//! Purpose: define strongly typed domain entities used by the inbound and
//! persistence layers. Types are immutable; invariants live in validating
//! constructors and are documented on each type.

pub mod audit;
pub mod collab;
pub mod error;
pub mod ports;
pub mod skill;
pub mod user;

pub use self::audit::{
    AuditAction, AuditEvent, COLLAB_REQUESTS_ENTITY, SKILLS_ENTITY, USERS_ENTITY,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::skill::{NewSkill, Skill, SkillId, SkillValidationError, slugify};
pub use self::user::{NewUser, User, UserId, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// # let _ = handler();
/// ```
pub type ApiResult<T> = Result<T, Error>;
