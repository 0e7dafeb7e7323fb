//! Canonical demo data: two teams, five members aged 5 to 25.

use super::model::{ModelError, Roster};

/// `team1` holds member1 (5) and member2 (10); `team2` holds member3 (15),
/// member4 (20) and member5 (25).
///
/// # Errors
/// Propagates `ModelError` from the arena; every key used here is its own.
pub fn demo_roster() -> Result<Roster, ModelError> {
    let mut roster = Roster::new();
    let team1 = roster.add_team("team1");
    let team2 = roster.add_team("team2");

    roster.add_member("member1", 5, Some(team1))?;
    roster.add_member("member2", 10, Some(team1))?;
    roster.add_member("member3", 15, Some(team2))?;
    roster.add_member("member4", 20, Some(team2))?;
    roster.add_member("member5", 25, Some(team2))?;
    Ok(roster)
}
