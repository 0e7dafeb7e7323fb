use serde::{Deserialize, Serialize};

use super::request::PageRequest;

/// One window of results plus totals across all pages.
///
/// Serialized as `{content, totalElements, totalPages, number, size}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    /// 0-based index of this page.
    pub number: u64,
    /// Requested page size (not the length of `content`).
    pub size: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(content: Vec<T>, req: &PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            total_elements,
            total_pages: total_elements.div_ceil(req.limit()),
            number: req.page_number(),
            size: req.limit(),
        }
    }

    /// A page with no content and a zero total.
    #[must_use]
    pub fn empty(req: &PageRequest) -> Self {
        Self::new(Vec::new(), req, 0)
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.number == 0
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.number.saturating_add(1) < self.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
        }
    }
}
