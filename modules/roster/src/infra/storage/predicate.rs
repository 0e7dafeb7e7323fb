//! Search terms to SQL.
//!
//! The team term is a sub-select on `teams` rather than a join, so the same
//! condition filters `SELECT`, `UPDATE` and `DELETE` statements on `members`.

use sea_orm::sea_query::{Query, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, QueryFilter};

use super::entity::{member, team};
use crate::domain::search::{MemberSearchCondition, MemberTerm};

/// SQL expression for a single term.
#[must_use]
pub fn term_expr(term: MemberTerm) -> SimpleExpr {
    match term {
        MemberTerm::NameLike(pattern) => member::Column::Name.like(pattern),
        MemberTerm::TeamNameEq(name) => member::Column::TeamId.in_subquery(
            Query::select()
                .column(team::Column::Id)
                .from(team::Entity)
                .and_where(team::Column::Name.eq(name))
                .to_owned(),
        ),
        MemberTerm::AgeGoe(age) => member::Column::Age.gte(age),
        MemberTerm::AgeLoe(age) => member::Column::Age.lte(age),
    }
}

/// AND of every present term; empty when the condition is unconstrained.
#[must_use]
pub fn build_condition(cond: &MemberSearchCondition) -> Condition {
    cond.terms()
        .into_iter()
        .map(term_expr)
        .fold(Condition::all(), |acc, expr| acc.add(expr))
}

/// Apply `cond` to any filterable `members` statement. An unconstrained
/// condition leaves the statement without a `WHERE` clause.
pub fn apply_condition<Q: QueryFilter>(query: Q, cond: &MemberSearchCondition) -> Q {
    let condition = build_condition(cond);
    if condition.is_empty() {
        query
    } else {
        query.filter(condition)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, EntityTrait, QueryTrait};

    fn select_sql(cond: &MemberSearchCondition) -> String {
        apply_condition(member::Entity::find(), cond)
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn unconstrained_condition_has_no_where_clause() {
        let sql = select_sql(&MemberSearchCondition::new());
        assert!(!sql.contains("WHERE"), "{sql}");
        assert!(build_condition(&MemberSearchCondition::new()).is_empty());
    }

    #[test]
    fn name_pattern_is_used_verbatim() {
        let sql = select_sql(&MemberSearchCondition::new().member_name("%mem_ber%"));
        assert!(sql.contains(r#""members"."name" LIKE '%mem_ber%'"#), "{sql}");
    }

    #[test]
    fn age_bounds_are_inclusive() {
        let sql = select_sql(&MemberSearchCondition::new().age_goe(10).age_loe(20));
        assert!(sql.contains(r#""members"."age" >= 10"#), "{sql}");
        assert!(sql.contains(r#""members"."age" <= 20"#), "{sql}");
        assert!(sql.contains(" AND "), "{sql}");
    }

    #[test]
    fn team_name_becomes_subquery() {
        let sql = select_sql(&MemberSearchCondition::new().team_name("team1"));
        assert!(sql.contains(r#""members"."team_id" IN (SELECT"#), "{sql}");
        assert!(sql.contains(r#"FROM "teams""#), "{sql}");
        assert!(sql.contains(r#""teams"."name" = 'team1'"#), "{sql}");
    }

    #[test]
    fn condition_serves_bulk_writes() {
        let cond = MemberSearchCondition::new().team_name("team2").age_goe(18);
        let delete = apply_condition(member::Entity::delete_many(), &cond)
            .build(DbBackend::Sqlite)
            .to_string();
        assert!(delete.starts_with(r#"DELETE FROM "members""#), "{delete}");
        assert!(delete.contains(r#""teams"."name" = 'team2'"#), "{delete}");
        assert!(delete.contains(r#""members"."age" >= 18"#), "{delete}");
    }

    #[test]
    fn one_expression_per_present_term() {
        let cond = MemberSearchCondition::new().member_name("m%").age_loe(30);
        assert_eq!(build_condition(&cond).len(), 2);
    }
}
