//! Skill catalogue data model and slug generation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Minimum allowed length for a skill name.
pub const SKILL_NAME_MIN: usize = 2;
/// Maximum allowed length for a skill name.
pub const SKILL_NAME_MAX: usize = 100;
/// Maximum allowed length for a skill category.
pub const SKILL_CATEGORY_MAX: usize = 80;
/// Maximum allowed length for a skill slug.
pub const SKILL_SLUG_MAX: usize = 120;

/// Validation errors returned by [`NewSkill::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillValidationError {
    NameTooShort { min: usize },
    NameTooLong { max: usize },
    CategoryTooLong { max: usize },
    SlugTooLong { max: usize },
    EmptySlug,
}

impl fmt::Display for SkillValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameTooShort { min } => write!(f, "name must be at least {min} characters"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::CategoryTooLong { max } => {
                write!(f, "category must be at most {max} characters")
            }
            Self::SlugTooLong { max } => write!(f, "slug must be at most {max} characters"),
            Self::EmptySlug => write!(f, "slug must contain at least one letter or digit"),
        }
    }
}

impl std::error::Error for SkillValidationError {}

/// Stable skill identifier backed by the serial primary key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct SkillId(i32);

impl SkillId {
    /// Wrap a raw identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Access the raw identifier.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for SkillId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// Reduce free text to a URL-safe slug: lowercase, runs of anything that is
/// not `[a-z0-9]` collapse into single dashes, outer dashes stripped.
///
/// # Examples
/// ```
/// use backend::domain::slugify;
///
/// assert_eq!(slugify("  Sourdough Baking! "), "sourdough-baking");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.trim().to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// A teachable skill listed in the catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    id: SkillId,
    name: String,
    slug: String,
    category: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl Skill {
    /// Construct a skill from persisted parts.
    pub fn from_parts(
        id: SkillId,
        name: String,
        slug: String,
        category: Option<String>,
        is_active: bool,
        created_at: DateTime<Utc>,
    ) -> Result<Self, SkillValidationError> {
        validate_name(&name)?;
        validate_category(category.as_deref())?;
        validate_slug(&slug)?;
        Ok(Self {
            id,
            name,
            slug,
            category,
            is_active,
            created_at,
        })
    }

    /// Returns the skill id.
    pub fn id(&self) -> SkillId {
        self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the unique slug.
    pub fn slug(&self) -> &str {
        self.slug.as_str()
    }

    /// Returns the optional category.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Returns whether the skill is listed in default searches.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Validated payload for listing a skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSkill {
    name: String,
    slug: String,
    category: Option<String>,
}

impl NewSkill {
    /// Validate and construct a listing payload. When `slug` is omitted it is
    /// derived from the name.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::NewSkill;
    ///
    /// let skill = NewSkill::new("Knife Sharpening", None, None)?;
    /// assert_eq!(skill.slug(), "knife-sharpening");
    /// # Ok::<(), backend::domain::SkillValidationError>(())
    /// ```
    pub fn new(
        name: impl Into<String>,
        category: Option<String>,
        slug: Option<String>,
    ) -> Result<Self, SkillValidationError> {
        let name = name.into();
        validate_name(&name)?;
        validate_category(category.as_deref())?;
        let slug = match slug {
            Some(slug) => slug,
            None => slugify(&name),
        };
        validate_slug(&slug)?;
        Ok(Self {
            name,
            slug,
            category,
        })
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the slug, supplied or derived.
    pub fn slug(&self) -> &str {
        self.slug.as_str()
    }

    /// Returns the optional category.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

fn validate_name(name: &str) -> Result<(), SkillValidationError> {
    if name.len() < SKILL_NAME_MIN {
        return Err(SkillValidationError::NameTooShort {
            min: SKILL_NAME_MIN,
        });
    }
    if name.len() > SKILL_NAME_MAX {
        return Err(SkillValidationError::NameTooLong {
            max: SKILL_NAME_MAX,
        });
    }
    Ok(())
}

fn validate_category(category: Option<&str>) -> Result<(), SkillValidationError> {
    if let Some(category) = category
        && category.len() > SKILL_CATEGORY_MAX
    {
        return Err(SkillValidationError::CategoryTooLong {
            max: SKILL_CATEGORY_MAX,
        });
    }
    Ok(())
}

fn validate_slug(slug: &str) -> Result<(), SkillValidationError> {
    if slug.is_empty() {
        return Err(SkillValidationError::EmptySlug);
    }
    if slug.len() > SKILL_SLUG_MAX {
        return Err(SkillValidationError::SlugTooLong {
            max: SKILL_SLUG_MAX,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::plain("Sourdough Baking", "sourdough-baking")]
    #[case::punctuation("C++ & Rust!", "c-rust")]
    #[case::whitespace("  weld,   braze  ", "weld-braze")]
    #[case::unicode("crème brûlée", "cr-me-br-l-e")]
    fn slugify_normalizes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(slugify(input), expected);
    }

    #[rstest]
    fn derives_slug_when_omitted() {
        let skill = NewSkill::new("Knife Sharpening", None, None).expect("valid skill");
        assert_eq!(skill.slug(), "knife-sharpening");
    }

    #[rstest]
    fn keeps_supplied_slug() {
        let skill = NewSkill::new("Knife Sharpening", None, Some("knives".to_owned()))
            .expect("valid skill");
        assert_eq!(skill.slug(), "knives");
    }

    #[rstest]
    fn rejects_short_name() {
        let error = NewSkill::new("x", None, None).expect_err("short name");
        assert_eq!(
            error,
            SkillValidationError::NameTooShort {
                min: SKILL_NAME_MIN
            }
        );
    }

    #[rstest]
    fn rejects_symbol_only_name() {
        let error = NewSkill::new("!!", None, None).expect_err("slug degenerates");
        assert_eq!(error, SkillValidationError::EmptySlug);
    }

    #[rstest]
    fn rejects_oversized_category() {
        let error = NewSkill::new("Baking", Some("c".repeat(SKILL_CATEGORY_MAX + 1)), None)
            .expect_err("oversized category");
        assert_eq!(
            error,
            SkillValidationError::CategoryTooLong {
                max: SKILL_CATEGORY_MAX
            }
        );
    }
}
