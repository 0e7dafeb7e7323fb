//! Entity to domain model mappers.

use sea_orm::FromQueryResult;

use super::entity::{member, team};
use crate::domain::model::{MemberDto, MemberRecord, TeamView};

/// The `(name, age)` projection read by member searches.
#[derive(Debug, Clone, FromQueryResult)]
pub struct MemberRow {
    pub name: Option<String>,
    pub age: i32,
}

impl From<MemberRow> for MemberDto {
    fn from(row: MemberRow) -> Self {
        Self {
            name: row.name,
            age: row.age,
        }
    }
}

impl From<member::Model> for MemberRecord {
    fn from(model: member::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            age: model.age,
            team_id: model.team_id,
        }
    }
}

/// Convert a team and its loaded members, ordered by member id.
pub fn team_with_members(model: team::Model, members: Vec<member::Model>) -> TeamView {
    let mut members: Vec<MemberRecord> = members.into_iter().map(MemberRecord::from).collect();
    members.sort_by_key(|m| m.id);
    TeamView {
        id: model.id,
        name: model.name,
        members,
    }
}
