//! Fluent builder running offset pagination against any `SeaORM` select.
//!
//! The caller hands over a select that is already filtered and projected
//! (but not ordered or windowed). The pager:
//! - checks the request against [`PagingLimits`]
//! - applies the request's sort keys through a [`SortMap`] and appends a
//!   tiebreaker so windows are deterministic
//! - applies `OFFSET`/`LIMIT`
//! - computes the total in one of two ways (see [`OffsetPager::fetch_eager`]
//!   and [`OffsetPager::fetch_optimized`])
//!
//! # Quick Start
//!
//! ```ignore
//! use roster_db::paging::{OffsetPager, PageRequest, SortDir, SortMap};
//!
//! fn member_sort_map() -> SortMap<member::Entity> {
//!     SortMap::new()
//!         .insert("id", member::Column::Id)
//!         .insert("name", member::Column::Name)
//!         .insert("age", member::Column::Age)
//! }
//!
//! let select = member::Entity::find()
//!     .select_only()
//!     .columns([member::Column::Name, member::Column::Age])
//!     .filter(condition);
//!
//! let page = OffsetPager::new(db.conn(), &member_sort_map())
//!     .tiebreaker("id", SortDir::Asc)
//!     .fetch_optimized::<MemberDto>(select, &PageRequest::of(0, 3)?)
//!     .await?;
//! ```

use sea_orm::{
    ConnectionTrait, DbErr, EntityTrait, FromQueryResult, PaginatorTrait, QueryResult,
    QuerySelect, Select, sea_query::Expr,
};

use super::count::page_with_count;
use super::page::Page;
use super::request::{PageRequest, PagingLimits};
use super::sort::{SortDir, SortMap};
use super::PagingError;

/// Alias of the window-function column carrying the total in eager mode.
pub const TOTAL_COUNT_ALIAS: &str = "__total_count";

/// A projected row paired with the `COUNT(*) OVER ()` value from the same row.
struct Counted<M> {
    row: M,
    total: i64,
}

impl<M: FromQueryResult> FromQueryResult for Counted<M> {
    fn from_query_result(res: &QueryResult, pre: &str) -> Result<Self, DbErr> {
        Ok(Self {
            row: M::from_query_result(res, pre)?,
            total: res.try_get(pre, TOTAL_COUNT_ALIAS)?,
        })
    }
}

/// Offset pager over a filtered select of `E`.
///
/// # Default Behavior
///
/// - Tiebreaker: `("id", SortDir::Asc)`
/// - Limits: `{ max_page_size: 1000 }`
#[must_use]
pub struct OffsetPager<'a, E, C>
where
    E: EntityTrait,
    C: ConnectionTrait + Send + Sync,
{
    conn: &'a C,
    sort_map: &'a SortMap<E>,
    tiebreaker: (&'a str, SortDir),
    limits: PagingLimits,
}

impl<'a, E, C> OffsetPager<'a, E, C>
where
    E: EntityTrait,
    E::Column: Copy,
    E::Model: Sync,
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: &'a C, sort_map: &'a SortMap<E>) -> Self {
        Self {
            conn,
            sort_map,
            tiebreaker: ("id", SortDir::Asc),
            limits: PagingLimits::default(),
        }
    }

    /// Override the default tiebreaker ("id", Asc).
    ///
    /// The tiebreaker must be a property known to the `SortMap`.
    pub fn tiebreaker(mut self, property: &'a str, dir: SortDir) -> Self {
        self.tiebreaker = (property, dir);
        self
    }

    pub fn limits(mut self, limits: PagingLimits) -> Self {
        self.limits = limits;
        self
    }

    fn windowed(&self, select: Select<E>, req: &PageRequest) -> Result<Select<E>, PagingError> {
        self.limits.check(req)?;
        let sort = req
            .sort()
            .clone()
            .ensure_tiebreaker(self.tiebreaker.0, self.tiebreaker.1);
        tracing::debug!(
            offset = req.offset(),
            limit = req.limit(),
            sort = %sort,
            "paging select"
        );
        let ordered = self.sort_map.apply(select, &sort)?;
        Ok(ordered.offset(req.offset()).limit(req.limit()))
    }

    /// Count every row matched by `select` (no ordering, no window).
    ///
    /// # Errors
    /// Returns `PagingError::Db` if the count query fails.
    pub async fn count(&self, select: Select<E>) -> Result<u64, PagingError> {
        Ok(select.count(self.conn).await?)
    }

    /// Fetch only the window rows, without any total.
    ///
    /// # Errors
    /// Returns `PagingError` for a rejected request or a failed query.
    pub async fn fetch_window<M>(
        &self,
        select: Select<E>,
        req: &PageRequest,
    ) -> Result<Vec<M>, PagingError>
    where
        M: FromQueryResult + Send + Sync,
    {
        let windowed = self.windowed(select, req)?;
        Ok(windowed.into_model::<M>().all(self.conn).await?)
    }

    /// Window rows plus the total from one round trip.
    ///
    /// The total is read from a `COUNT(*) OVER ()` column selected alongside
    /// the projection; window functions are evaluated before `LIMIT`, so every
    /// row carries the full match count. When the window is empty on a page
    /// other than the first there is no row to read it from, and a separate
    /// count query is issued.
    ///
    /// # Errors
    /// Returns `PagingError` for a rejected request or a failed query.
    pub async fn fetch_eager<M>(
        &self,
        select: Select<E>,
        req: &PageRequest,
    ) -> Result<Page<M>, PagingError>
    where
        M: FromQueryResult + Send + Sync,
    {
        let windowed = self
            .windowed(select.clone(), req)?
            .expr_as(Expr::cust("COUNT(*) OVER ()"), TOTAL_COUNT_ALIAS);

        let rows = windowed.into_model::<Counted<M>>().all(self.conn).await?;

        let total = match rows.first() {
            Some(first) => u64::try_from(first.total).unwrap_or_default(),
            None if req.is_first() => return Ok(Page::empty(req)),
            None => self.count(select).await?,
        };

        let content = rows.into_iter().map(|c| c.row).collect();
        Ok(Page::new(content, req, total))
    }

    /// Window rows; the count query runs only if the total cannot be inferred.
    ///
    /// # Errors
    /// Returns `PagingError` for a rejected request or a failed query.
    pub async fn fetch_optimized<M>(
        &self,
        select: Select<E>,
        req: &PageRequest,
    ) -> Result<Page<M>, PagingError>
    where
        M: FromQueryResult + Send + Sync,
    {
        let windowed = self.windowed(select.clone(), req)?;
        let content = windowed.into_model::<M>().all(self.conn).await?;
        page_with_count(content, req, move || self.count(select)).await
    }
}
