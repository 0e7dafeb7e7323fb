use async_trait::async_trait;
use roster_db::paging::{Page, PageRequest};

use super::error::RosterError;
use super::model::{MemberDto, MemberRecord, Roster, SavedRoster, TeamView};
use super::search::MemberSearchCondition;

/// Persistence port for members and their teams.
///
/// Every read and bulk write takes the same [`MemberSearchCondition`]; unset
/// criteria never narrow the result.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// All matching members, in storage order.
    async fn search(&self, cond: &MemberSearchCondition) -> Result<Vec<MemberDto>, RosterError>;

    /// One page of matching members; the total comes back with the rows.
    async fn paging_search(
        &self,
        cond: &MemberSearchCondition,
        req: &PageRequest,
    ) -> Result<Page<MemberDto>, RosterError>;

    /// One page of matching members; the count query runs only when needed.
    async fn paging_search_optimized(
        &self,
        cond: &MemberSearchCondition,
        req: &PageRequest,
    ) -> Result<Page<MemberDto>, RosterError>;

    async fn count(&self, cond: &MemberSearchCondition) -> Result<u64, RosterError>;

    /// Insert every team, then every member, in one transaction.
    async fn save_roster(&self, roster: &Roster) -> Result<SavedRoster, RosterError>;

    async fn find_team(&self, team_id: i64) -> Result<Option<TeamView>, RosterError>;

    /// Point `member_id` at `team_id`.
    async fn change_team(&self, member_id: i64, team_id: i64)
        -> Result<MemberRecord, RosterError>;

    /// Add `delta` to the age of every matching member; returns rows affected.
    async fn bulk_add_age(
        &self,
        cond: &MemberSearchCondition,
        delta: i32,
    ) -> Result<u64, RosterError>;

    /// Delete every matching member; returns rows affected.
    async fn bulk_delete(&self, cond: &MemberSearchCondition) -> Result<u64, RosterError>;
}
