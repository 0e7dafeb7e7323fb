//! Offset/limit pagination for `SeaORM` selects.
//!
//! This module provides:
//! - `PageRequest`: a validated offset/limit window with optional sort keys
//! - `Page<T>`: window content plus total element/page counts
//! - `count`: the total-count optimizer (skip the `COUNT` query when the total
//!   can be inferred from the window itself)
//! - `sort`: property name → column mapping for client-supplied sort keys
//! - `pager`: `OffsetPager`, a fluent builder running all of the above
//!
//! # Modules
//!
//! - `request`: page request construction and validation
//! - `page`: the page result type
//! - `count`: pure count-inference decision plus its async wrapper
//! - `sort`: sort keys and `SortMap`
//! - `pager`: eager (window function) and optimized (inferred) count strategies

pub mod count;
pub mod page;
pub mod pager;
pub mod request;
pub mod sort;

pub use count::{infer_total, page_with_count};
pub use page::Page;
pub use pager::OffsetPager;
pub use request::{PageError, PageRequest, PagingLimits};
pub use sort::{OrderKey, Sort, SortDir, SortMap};

use thiserror::Error;

/// Errors raised while running a paged query.
#[derive(Debug, Error)]
pub enum PagingError {
    #[error(transparent)]
    InvalidRequest(#[from] PageError),

    #[error("unsupported sort property: {0}")]
    UnknownSortProperty(String),

    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}
