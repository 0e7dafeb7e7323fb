//! Total-count optimizer.
//!
//! A paged read normally needs a second `COUNT(*)` round trip. When the
//! fetched window is shorter than the requested page size there is no next
//! page, so the total follows from the window alone:
//!
//! | page        | window length          | total               |
//! |-------------|------------------------|---------------------|
//! | first       | `< limit`              | `window`            |
//! | later       | `0 < window < limit`   | `offset + window`   |
//! | any other   |                        | run the count query |
//!
//! An empty window on a later page says nothing about the total (the offset
//! may simply be past the end), so it always falls back to counting.

use std::future::Future;

use super::page::Page;
use super::request::PageRequest;

/// Infer the total row count from the window, or `None` if a count query is needed.
#[must_use]
pub fn infer_total(req: &PageRequest, window_len: usize) -> Option<u64> {
    let len = u64::try_from(window_len).ok()?;
    if len >= req.limit() {
        return None;
    }
    if req.is_first() {
        return Some(len);
    }
    (len > 0).then(|| req.offset().saturating_add(len))
}

/// Build a page, awaiting `count` only when the total cannot be inferred.
///
/// # Errors
/// Propagates the error of the `count` future unchanged.
pub async fn page_with_count<T, F, Fut, Err>(
    content: Vec<T>,
    req: &PageRequest,
    count: F,
) -> Result<Page<T>, Err>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<u64, Err>>,
{
    let total = if let Some(total) = infer_total(req, content.len()) {
        tracing::trace!(
            offset = req.offset(),
            limit = req.limit(),
            total,
            "total inferred from window, count query skipped"
        );
        total
    } else {
        count().await?
    };
    Ok(Page::new(content, req, total))
}
