//! Page request construction and validation.
//!
//! Offsets and limits arrive as signed integers (query strings, CLI flags,
//! JSON) so that negative input can be rejected instead of wrapping around.

use thiserror::Error;

use super::sort::Sort;

/// Invalid pagination input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("page offset must not be negative, got {0}")]
    NegativeOffset(i64),

    #[error("page number must not be negative, got {0}")]
    NegativePage(i64),

    #[error("page size must be positive, got {0}")]
    NonPositiveLimit(i64),

    #[error("page size {limit} exceeds the maximum of {max}")]
    LimitTooLarge { limit: u64, max: u64 },

    #[error("page {page} of size {size} overflows the offset range")]
    Overflow { page: i64, size: i64 },

    #[error("invalid sort expression: {0}")]
    InvalidSort(String),
}

/// A validated offset/limit window.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct PageRequest {
    offset: u64,
    limit: u64,
    sort: Sort,
}

impl PageRequest {
    /// Build a request from a raw offset and limit.
    ///
    /// # Errors
    /// `PageError::NegativeOffset` if `offset < 0`, `PageError::NonPositiveLimit`
    /// if `limit <= 0`.
    pub fn new(offset: i64, limit: i64) -> Result<Self, PageError> {
        let offset = u64::try_from(offset).map_err(|_| PageError::NegativeOffset(offset))?;
        let limit = match u64::try_from(limit) {
            Ok(l) if l > 0 => l,
            _ => return Err(PageError::NonPositiveLimit(limit)),
        };
        Ok(Self {
            offset,
            limit,
            sort: Sort::unsorted(),
        })
    }

    /// Build a request for the 0-based page `page` of `size` rows.
    ///
    /// # Errors
    /// `PageError::NegativePage`, `PageError::NonPositiveLimit`, or
    /// `PageError::Overflow` when `page * size` does not fit an offset.
    pub fn of(page: i64, size: i64) -> Result<Self, PageError> {
        if page < 0 {
            return Err(PageError::NegativePage(page));
        }
        if size <= 0 {
            return Err(PageError::NonPositiveLimit(size));
        }
        let offset = page
            .checked_mul(size)
            .ok_or(PageError::Overflow { page, size })?;
        Self::new(offset, size)
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    #[must_use]
    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    /// 0-based page index the window starts in.
    #[must_use]
    pub fn page_number(&self) -> u64 {
        self.offset.checked_div(self.limit).unwrap_or_default()
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.offset == 0
    }

    /// Request for the window right after this one, keeping size and sort.
    pub fn next(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            limit: self.limit,
            sort: self.sort.clone(),
        }
    }
}

/// Upper bound on page sizes accepted from callers.
///
/// Oversized requests are rejected, never clamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PagingLimits {
    pub max_page_size: u64,
}

impl Default for PagingLimits {
    fn default() -> Self {
        Self {
            max_page_size: 1000,
        }
    }
}

impl PagingLimits {
    /// # Errors
    /// `PageError::LimitTooLarge` when the request's limit exceeds `max_page_size`.
    pub fn check(&self, req: &PageRequest) -> Result<(), PageError> {
        if req.limit() > self.max_page_size {
            return Err(PageError::LimitTooLarge {
                limit: req.limit(),
                max: self.max_page_size,
            });
        }
        Ok(())
    }
}
