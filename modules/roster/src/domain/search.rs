//! Member search condition and its per-field terms.
//!
//! Every criterion is optional. An absent criterion contributes no term at
//! all, so an empty condition matches every member. The terms here are plain
//! data; `infra::storage::predicate` turns them into SQL expressions.

use serde::{Deserialize, Serialize};

/// Optional filter criteria for member searches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemberSearchCondition {
    /// `LIKE` pattern matched against the member name, used verbatim
    /// (include `%` / `_` wildcards yourself).
    pub member_name: Option<String>,
    /// Exact name of the member's team.
    pub team_name: Option<String>,
    /// Inclusive lower age bound.
    pub age_goe: Option<i32>,
    /// Inclusive upper age bound.
    pub age_loe: Option<i32>,
}

/// One constraint of a member search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberTerm {
    NameLike(String),
    TeamNameEq(String),
    AgeGoe(i32),
    AgeLoe(i32),
}

impl MemberSearchCondition {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn member_name(mut self, pattern: impl Into<String>) -> Self {
        self.member_name = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn team_name(mut self, name: impl Into<String>) -> Self {
        self.team_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn age_goe(mut self, age: i32) -> Self {
        self.age_goe = Some(age);
        self
    }

    #[must_use]
    pub fn age_loe(mut self, age: i32) -> Self {
        self.age_loe = Some(age);
        self
    }

    #[must_use]
    pub fn name_term(&self) -> Option<MemberTerm> {
        self.member_name.clone().map(MemberTerm::NameLike)
    }

    #[must_use]
    pub fn team_term(&self) -> Option<MemberTerm> {
        self.team_name.clone().map(MemberTerm::TeamNameEq)
    }

    #[must_use]
    pub fn age_goe_term(&self) -> Option<MemberTerm> {
        self.age_goe.map(MemberTerm::AgeGoe)
    }

    #[must_use]
    pub fn age_loe_term(&self) -> Option<MemberTerm> {
        self.age_loe.map(MemberTerm::AgeLoe)
    }

    /// Present terms in fixed order: name, team, lower age, upper age.
    #[must_use]
    pub fn terms(&self) -> Vec<MemberTerm> {
        [
            self.name_term(),
            self.team_term(),
            self.age_goe_term(),
            self.age_loe_term(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// True when no criterion is set (the condition matches every member).
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.member_name.is_none()
            && self.team_name.is_none()
            && self.age_goe.is_none()
            && self.age_loe.is_none()
    }
}
