//! `SeaORM` implementation of `MemberRepository`.

use async_trait::async_trait;
use roster_db::paging::{OffsetPager, Page, PageRequest, PagingLimits, SortDir, SortMap};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue, DatabaseConnection, EntityTrait, PaginatorTrait, QuerySelect,
    Select, TransactionTrait,
};
use tracing::debug;

use super::entity::{member, team};
use super::mapper::{MemberRow, team_with_members};
use super::predicate::apply_condition;
use crate::domain::error::RosterError;
use crate::domain::model::{
    MemberDto, MemberRecord, ModelError, Roster, SavedRoster, TeamView,
};
use crate::domain::repo::MemberRepository;
use crate::domain::search::MemberSearchCondition;

/// Sort properties accepted by paged member searches.
#[must_use]
pub fn member_sort_map() -> SortMap<member::Entity> {
    SortMap::new()
        .insert("id", member::Column::Id)
        .insert("name", member::Column::Name)
        .insert("age", member::Column::Age)
        .insert("teamId", member::Column::TeamId)
}

pub struct SeaOrmMemberRepository {
    conn: DatabaseConnection,
    sort_map: SortMap<member::Entity>,
    limits: PagingLimits,
}

impl SeaOrmMemberRepository {
    #[must_use]
    pub fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            sort_map: member_sort_map(),
            limits: PagingLimits::default(),
        }
    }

    #[must_use]
    pub fn with_limits(mut self, limits: PagingLimits) -> Self {
        self.limits = limits;
        self
    }

    fn pager(&self) -> OffsetPager<'_, member::Entity, DatabaseConnection> {
        OffsetPager::new(&self.conn, &self.sort_map)
            .tiebreaker("id", SortDir::Asc)
            .limits(self.limits)
    }

    /// Filtered `(name, age)` projection; not ordered, not windowed.
    fn projected(cond: &MemberSearchCondition) -> Select<member::Entity> {
        let select = member::Entity::find()
            .select_only()
            .columns([member::Column::Name, member::Column::Age]);
        apply_condition(select, cond)
    }
}

#[async_trait]
impl MemberRepository for SeaOrmMemberRepository {
    async fn search(&self, cond: &MemberSearchCondition) -> Result<Vec<MemberDto>, RosterError> {
        debug!(terms = cond.terms().len(), "member search");
        let rows = Self::projected(cond)
            .into_model::<MemberRow>()
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(MemberDto::from).collect())
    }

    async fn paging_search(
        &self,
        cond: &MemberSearchCondition,
        req: &PageRequest,
    ) -> Result<Page<MemberDto>, RosterError> {
        debug!(terms = cond.terms().len(), "member page, eager count");
        let page = self
            .pager()
            .fetch_eager::<MemberRow>(Self::projected(cond), req)
            .await?;
        Ok(page.map(MemberDto::from))
    }

    async fn paging_search_optimized(
        &self,
        cond: &MemberSearchCondition,
        req: &PageRequest,
    ) -> Result<Page<MemberDto>, RosterError> {
        debug!(terms = cond.terms().len(), "member page, optimized count");
        let page = self
            .pager()
            .fetch_optimized::<MemberRow>(Self::projected(cond), req)
            .await?;
        Ok(page.map(MemberDto::from))
    }

    async fn count(&self, cond: &MemberSearchCondition) -> Result<u64, RosterError> {
        Ok(apply_condition(member::Entity::find(), cond)
            .count(&self.conn)
            .await?)
    }

    async fn save_roster(&self, roster: &Roster) -> Result<SavedRoster, RosterError> {
        let txn = self.conn.begin().await?;
        let mut saved = SavedRoster::default();

        for (key, t) in roster.teams() {
            let model = team::ActiveModel {
                name: ActiveValue::Set(t.name().to_owned()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            saved.teams.push((key, model.id));
        }

        for (key, m) in roster.members() {
            let team_id = m
                .team()
                .map(|k| saved.team_id(k).ok_or(ModelError::UnknownTeam(k)))
                .transpose()?;
            let model = member::ActiveModel {
                name: ActiveValue::Set(m.name().map(str::to_owned)),
                age: ActiveValue::Set(m.age()),
                team_id: ActiveValue::Set(team_id),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            saved.members.push((key, model.id));
        }

        txn.commit().await?;
        Ok(saved)
    }

    async fn find_team(&self, team_id: i64) -> Result<Option<TeamView>, RosterError> {
        let found = team::Entity::find_by_id(team_id)
            .find_with_related(member::Entity)
            .all(&self.conn)
            .await?;
        Ok(found
            .into_iter()
            .next()
            .map(|(team, members)| team_with_members(team, members)))
    }

    async fn change_team(
        &self,
        member_id: i64,
        team_id: i64,
    ) -> Result<MemberRecord, RosterError> {
        let member = member::Entity::find_by_id(member_id)
            .one(&self.conn)
            .await?
            .ok_or(RosterError::MemberNotFound(member_id))?;
        if team::Entity::find_by_id(team_id)
            .one(&self.conn)
            .await?
            .is_none()
        {
            return Err(RosterError::TeamNotFound(team_id));
        }

        let mut active: member::ActiveModel = member.into();
        active.team_id = ActiveValue::Set(Some(team_id));
        let updated = active.update(&self.conn).await?;
        Ok(updated.into())
    }

    async fn bulk_add_age(
        &self,
        cond: &MemberSearchCondition,
        delta: i32,
    ) -> Result<u64, RosterError> {
        let update = member::Entity::update_many().col_expr(
            member::Column::Age,
            Expr::col(member::Column::Age).add(delta),
        );
        let res = apply_condition(update, cond).exec(&self.conn).await?;
        Ok(res.rows_affected)
    }

    async fn bulk_delete(&self, cond: &MemberSearchCondition) -> Result<u64, RosterError> {
        let res = apply_condition(member::Entity::delete_many(), cond)
            .exec(&self.conn)
            .await?;
        Ok(res.rows_affected)
    }
}
