//! Roster domain service.
//!
//! Thin orchestration over a [`MemberRepository`]: builds and caps page
//! requests from raw caller input, resolves "not found" cases and logs.

use std::sync::Arc;

use roster_db::paging::{Page, PageRequest, PagingLimits, Sort};
use tracing::{debug, info, instrument};

use super::error::RosterError;
use super::fixtures::demo_roster;
use super::model::{MemberDto, MemberRecord, Roster, SavedRoster, TeamView};
use super::repo::MemberRepository;
use super::search::MemberSearchCondition;
use crate::config::PagingConfig;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from(&PagingConfig::default())
    }
}

impl From<&PagingConfig> for ServiceConfig {
    fn from(cfg: &PagingConfig) -> Self {
        Self {
            default_page_size: cfg.default_page_size,
            max_page_size: cfg.max_page_size,
        }
    }
}

pub struct RosterService {
    repo: Arc<dyn MemberRepository>,
    config: ServiceConfig,
}

impl RosterService {
    #[must_use]
    pub fn new(repo: Arc<dyn MemberRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    fn limits(&self) -> PagingLimits {
        PagingLimits {
            max_page_size: self.config.max_page_size,
        }
    }

    /// Build a page request from optional caller input.
    ///
    /// `page` defaults to 0 and `size` to the configured default; `sort` uses
    /// the signed form `"name,-age"`.
    ///
    /// # Errors
    /// `RosterError::InvalidArgument` for a negative page, a non-positive or
    /// oversized page size, or a malformed sort expression.
    pub fn page_request(
        &self,
        page: Option<i64>,
        size: Option<i64>,
        sort: Option<&str>,
    ) -> Result<PageRequest, RosterError> {
        let size = match size {
            Some(size) => size,
            None => i64::try_from(self.config.default_page_size).map_err(|_| {
                RosterError::invalid_argument("default page size is out of range")
            })?,
        };
        let mut req = PageRequest::of(page.unwrap_or(0), size)?;
        if let Some(sort) = sort {
            req = req.with_sort(Sort::parse(sort)?);
        }
        self.limits().check(&req)?;
        Ok(req)
    }

    /// # Errors
    /// Propagates repository errors.
    #[instrument(skip_all, fields(terms = cond.terms().len()))]
    pub async fn search(
        &self,
        cond: &MemberSearchCondition,
    ) -> Result<Vec<MemberDto>, RosterError> {
        let members = self.repo.search(cond).await?;
        debug!(found = members.len(), "member search done");
        Ok(members)
    }

    /// Page through matching members, reading the total in the same query.
    ///
    /// # Errors
    /// `RosterError::InvalidArgument` when the request exceeds the size cap,
    /// otherwise repository errors.
    #[instrument(skip_all, fields(offset = req.offset(), limit = req.limit()))]
    pub async fn paging_search(
        &self,
        cond: &MemberSearchCondition,
        req: &PageRequest,
    ) -> Result<Page<MemberDto>, RosterError> {
        self.limits().check(req)?;
        self.repo.paging_search(cond, req).await
    }

    /// Page through matching members, skipping the count query when possible.
    ///
    /// # Errors
    /// `RosterError::InvalidArgument` when the request exceeds the size cap,
    /// otherwise repository errors.
    #[instrument(skip_all, fields(offset = req.offset(), limit = req.limit()))]
    pub async fn paging_search_optimized(
        &self,
        cond: &MemberSearchCondition,
        req: &PageRequest,
    ) -> Result<Page<MemberDto>, RosterError> {
        self.limits().check(req)?;
        self.repo.paging_search_optimized(cond, req).await
    }

    /// # Errors
    /// Propagates repository errors.
    pub async fn count(&self, cond: &MemberSearchCondition) -> Result<u64, RosterError> {
        self.repo.count(cond).await
    }

    /// # Errors
    /// Propagates repository errors; nothing is saved on failure.
    pub async fn save_roster(&self, roster: &Roster) -> Result<SavedRoster, RosterError> {
        let saved = self.repo.save_roster(roster).await?;
        info!(
            teams = saved.teams.len(),
            members = saved.members.len(),
            "roster saved"
        );
        Ok(saved)
    }

    /// Save the demo roster (two teams, five members).
    ///
    /// # Errors
    /// Propagates repository errors.
    pub async fn seed_demo(&self) -> Result<SavedRoster, RosterError> {
        let roster = demo_roster()?;
        self.save_roster(&roster).await
    }

    /// # Errors
    /// `RosterError::TeamNotFound` if no team has `team_id`.
    pub async fn get_team(&self, team_id: i64) -> Result<TeamView, RosterError> {
        self.repo
            .find_team(team_id)
            .await?
            .ok_or(RosterError::TeamNotFound(team_id))
    }

    /// # Errors
    /// `RosterError::MemberNotFound` / `RosterError::TeamNotFound` for unknown ids.
    #[instrument(skip(self))]
    pub async fn change_team(
        &self,
        member_id: i64,
        team_id: i64,
    ) -> Result<MemberRecord, RosterError> {
        let member = self.repo.change_team(member_id, team_id).await?;
        info!("member moved to another team");
        Ok(member)
    }

    /// # Errors
    /// Propagates repository errors.
    pub async fn bulk_add_age(
        &self,
        cond: &MemberSearchCondition,
        delta: i32,
    ) -> Result<u64, RosterError> {
        let affected = self.repo.bulk_add_age(cond, delta).await?;
        info!(delta, affected, "bulk age update");
        Ok(affected)
    }

    /// # Errors
    /// Propagates repository errors.
    pub async fn bulk_delete(&self, cond: &MemberSearchCondition) -> Result<u64, RosterError> {
        if cond.is_unconstrained() {
            tracing::warn!("bulk delete without criteria removes every member");
        }
        let affected = self.repo.bulk_delete(cond).await?;
        info!(affected, "bulk delete");
        Ok(affected)
    }
}
