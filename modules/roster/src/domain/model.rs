//! In-memory roster of teams and members.
//!
//! Members and teams reference each other: a member points at its team and a
//! team lists its members. Both sides live in one [`Roster`] arena and are
//! addressed by typed keys, so the cycle is plain data. The member's `team`
//! is the owning side; a team's member list is derived and can only change
//! through [`Roster::add_member`] and [`Roster::change_team`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key of a team inside a [`Roster`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TeamKey(usize);

/// Key of a member inside a [`Roster`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberKey(usize);

impl fmt::Display for TeamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team#{}", self.0)
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "member#{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown team key {0}")]
    UnknownTeam(TeamKey),

    #[error("unknown member key {0}")]
    UnknownMember(MemberKey),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Team {
    name: String,
    members: Vec<MemberKey>,
}

impl Team {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members currently assigned to this team, in assignment order.
    #[must_use]
    pub fn members(&self) -> &[MemberKey] {
        &self.members
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    name: Option<String>,
    age: i32,
    team: Option<TeamKey>,
}

impl Member {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn age(&self) -> i32 {
        self.age
    }

    #[must_use]
    pub fn team(&self) -> Option<TeamKey> {
        self.team
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn set_age(&mut self, age: i32) {
        self.age = age;
    }
}

/// Arena owning every team and member of one roster.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    teams: Vec<Team>,
    members: Vec<Member>,
}

impl Roster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_team(&mut self, name: impl Into<String>) -> TeamKey {
        self.teams.push(Team {
            name: name.into(),
            members: Vec::new(),
        });
        TeamKey(self.teams.len() - 1)
    }

    /// Add a named member, optionally assigned to `team`.
    ///
    /// # Errors
    /// `ModelError::UnknownTeam` if `team` does not belong to this roster.
    pub fn add_member(
        &mut self,
        name: impl Into<String>,
        age: i32,
        team: Option<TeamKey>,
    ) -> Result<MemberKey, ModelError> {
        self.insert_member(Some(name.into()), age, team)
    }

    /// Add a member without a name.
    ///
    /// # Errors
    /// `ModelError::UnknownTeam` if `team` does not belong to this roster.
    pub fn add_unnamed_member(
        &mut self,
        age: i32,
        team: Option<TeamKey>,
    ) -> Result<MemberKey, ModelError> {
        self.insert_member(None, age, team)
    }

    fn insert_member(
        &mut self,
        name: Option<String>,
        age: i32,
        team: Option<TeamKey>,
    ) -> Result<MemberKey, ModelError> {
        if let Some(team) = team {
            self.team_entry(team)?;
        }
        self.members.push(Member {
            name,
            age,
            team: None,
        });
        let key = MemberKey(self.members.len() - 1);
        if let Some(team) = team {
            self.change_team(key, team)?;
        }
        Ok(key)
    }

    /// Assign `member` to `team`, keeping both sides of the link in sync.
    ///
    /// The member is removed from its previous team's list first, so it is
    /// never listed by two teams. Reassigning to the current team is a no-op.
    ///
    /// # Errors
    /// `ModelError::UnknownMember` / `ModelError::UnknownTeam` for foreign keys.
    pub fn change_team(&mut self, member: MemberKey, team: TeamKey) -> Result<(), ModelError> {
        self.team_entry(team)?;
        let previous = self
            .members
            .get(member.0)
            .ok_or(ModelError::UnknownMember(member))?
            .team;

        if previous == Some(team) {
            return Ok(());
        }
        if let Some(prev) = previous {
            self.team_entry(prev)?.members.retain(|m| *m != member);
        }
        self.team_entry(team)?.members.push(member);
        if let Some(m) = self.members.get_mut(member.0) {
            m.team = Some(team);
        }
        Ok(())
    }

    fn team_entry(&mut self, key: TeamKey) -> Result<&mut Team, ModelError> {
        self.teams
            .get_mut(key.0)
            .ok_or(ModelError::UnknownTeam(key))
    }

    #[must_use]
    pub fn team(&self, key: TeamKey) -> Option<&Team> {
        self.teams.get(key.0)
    }

    #[must_use]
    pub fn member(&self, key: MemberKey) -> Option<&Member> {
        self.members.get(key.0)
    }

    /// Field access only; the team link changes through [`Roster::change_team`].
    pub fn team_mut(&mut self, key: TeamKey) -> Option<&mut Team> {
        self.teams.get_mut(key.0)
    }

    /// Field access only; the team link changes through [`Roster::change_team`].
    pub fn member_mut(&mut self, key: MemberKey) -> Option<&mut Member> {
        self.members.get_mut(key.0)
    }

    pub fn teams(&self) -> impl Iterator<Item = (TeamKey, &Team)> {
        self.teams.iter().enumerate().map(|(i, t)| (TeamKey(i), t))
    }

    pub fn members(&self) -> impl Iterator<Item = (MemberKey, &Member)> {
        self.members
            .iter()
            .enumerate()
            .map(|(i, m)| (MemberKey(i), m))
    }

    /// Members of `team` resolved through the team's member list.
    pub fn members_of(&self, team: TeamKey) -> impl Iterator<Item = (MemberKey, &Member)> {
        self.team(team)
            .map(Team::members)
            .unwrap_or_default()
            .iter()
            .filter_map(|k| self.member(*k).map(|m| (*k, m)))
    }

    #[must_use]
    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// Member projection returned by searches: name and age only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDto {
    pub name: Option<String>,
    pub age: i32,
}

impl MemberDto {
    #[must_use]
    pub fn new(name: impl Into<String>, age: i32) -> Self {
        Self {
            name: Some(name.into()),
            age,
        }
    }
}

/// A persisted member row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub id: i64,
    pub name: Option<String>,
    pub age: i32,
    pub team_id: Option<i64>,
}

/// A persisted team with its members, loaded through the foreign key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamView {
    pub id: i64,
    pub name: String,
    pub members: Vec<MemberRecord>,
}

/// Database ids assigned while saving a [`Roster`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SavedRoster {
    pub teams: Vec<(TeamKey, i64)>,
    pub members: Vec<(MemberKey, i64)>,
}

impl SavedRoster {
    #[must_use]
    pub fn team_id(&self, key: TeamKey) -> Option<i64> {
        self.teams.iter().find(|(k, _)| *k == key).map(|(_, id)| *id)
    }

    #[must_use]
    pub fn member_id(&self, key: MemberKey) -> Option<i64> {
        self.members
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, id)| *id)
    }
}
