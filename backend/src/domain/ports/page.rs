//! Offset pagination carrier shared by listing ports.

use std::fmt;

/// Default page size when the caller does not specify one.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;
/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Validation errors returned by [`Page::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageValidationError {
    LimitOutOfRange { min: i64, max: i64 },
    NegativeOffset,
}

impl fmt::Display for PageValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LimitOutOfRange { min, max } => {
                write!(f, "limit must be between {min} and {max}")
            }
            Self::NegativeOffset => write!(f, "offset must not be negative"),
        }
    }
}

impl std::error::Error for PageValidationError {}

/// A validated limit/offset window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: i64,
    offset: i64,
}

impl Page {
    /// Validate and construct a window.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::ports::Page;
    ///
    /// let page = Page::new(50, 100)?;
    /// assert_eq!(page.limit(), 50);
    /// # Ok::<(), backend::domain::ports::PageValidationError>(())
    /// ```
    pub fn new(limit: i64, offset: i64) -> Result<Self, PageValidationError> {
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(PageValidationError::LimitOutOfRange {
                min: 1,
                max: MAX_PAGE_LIMIT,
            });
        }
        if offset < 0 {
            return Err(PageValidationError::NegativeOffset);
        }
        Ok(Self { limit, offset })
    }

    /// Returns the page size.
    pub fn limit(self) -> i64 {
        self.limit
    }

    /// Returns the number of rows to skip.
    pub fn offset(self) -> i64 {
        self.offset
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}
