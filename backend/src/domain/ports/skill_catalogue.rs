//! Driven port for skill persistence and existence checks.

use async_trait::async_trait;

use crate::domain::{NewSkill, Skill, SkillId};

use super::Page;

/// Errors raised by skill catalogue adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkillCatalogueError {
    /// Catalogue connection could not be established.
    #[error("skill catalogue connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("skill catalogue query failed: {message}")]
    Query { message: String },

    /// The slug is already taken by another skill.
    #[error("slug {slug} is already in use")]
    DuplicateSlug { slug: String },
}

impl SkillCatalogueError {
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

    /// Create a duplicate slug error.
    pub fn duplicate_slug(slug: impl Into<String>) -> Self {
        Self::DuplicateSlug { slug: slug.into() }
    }
}

/// Search terms applied to skill listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillSearch {
    /// Case-insensitive substring match over name, slug, and category.
    pub query: Option<String>,
    /// Restrict to active skills. Defaults to true at the HTTP boundary.
    pub only_active: bool,
}

/// Port for listing and looking up teachable skills.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SkillCatalogue: Send + Sync {
    /// Insert a new skill and its audit record atomically.
    async fn create(&self, skill: &NewSkill) -> Result<Skill, SkillCatalogueError>;

    /// Point lookup by id.
    async fn find_by_id(&self, skill_id: SkillId) -> Result<Option<Skill>, SkillCatalogueError>;

    /// Search ordered by name.
    async fn search(
        &self,
        search: &SkillSearch,
        page: Page,
    ) -> Result<Vec<Skill>, SkillCatalogueError>;

    /// Pure existence probe against the current committed state.
    async fn exists(&self, skill_id: SkillId) -> Result<bool, SkillCatalogueError>;
}
