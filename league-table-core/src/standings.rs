//! Standings aggregation: folds match results into a ranked league table.
//!
//! Teams are discovered from the matches themselves (home side first, then
//! guest side, in input order), so a team with no played match never shows up.
//! The table is sorted by league points, then by point difference, both
//! descending. Remaining ties keep discovery order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// League points awarded to the winner of a match.
pub const POINTS_PER_WIN: u32 = 2;

/// One played match with its final score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub home_team: String,
    pub guest_team: String,
    pub home_points: u32,
    pub guest_points: u32,
}

impl MatchRecord {
    pub fn new(
        home_team: impl Into<String>,
        guest_team: impl Into<String>,
        home_points: u32,
        guest_points: u32,
    ) -> Self {
        Self {
            home_team: home_team.into(),
            guest_team: guest_team.into(),
            home_points,
            guest_points,
        }
    }

    /// `true` when the home side scored strictly more. An exact tie counts
    /// as a guest win.
    pub fn home_wins(&self) -> bool {
        self.home_points > self.guest_points
    }
}

/// Accumulated statistics for one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStats {
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub points: u32,
    pub points_made: u64,
    pub points_conceded: u64,
    pub diff: i64,
}

impl TeamStats {
    /// Applies one match from this team's point of view.
    fn record(&mut self, scored: u32, conceded: u32, won: bool) {
        self.games += 1;
        self.points_made += u64::from(scored);
        self.points_conceded += u64::from(conceded);
        self.diff += i64::from(scored) - i64::from(conceded);
        if won {
            self.wins += 1;
            self.points += POINTS_PER_WIN;
        } else {
            self.losses += 1;
        }
    }
}

/// A team and its statistics, one row of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub team: String,
    pub stats: TeamStats,
}

/// Ranked standings for one league. Built once, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StandingsTable {
    rows: Vec<Standing>,
}

impl StandingsTable {
    /// Rebuilds a table from rows that are already in ranked order.
    pub fn from_ranked(rows: Vec<Standing>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Standing] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Standing> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, team: &str) -> Option<&TeamStats> {
        self.rows
            .iter()
            .find(|row| row.team == team)
            .map(|row| &row.stats)
    }

    /// 1-based rank of `team`, if present.
    pub fn position(&self, team: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.team == team).map(|i| i + 1)
    }
}

impl<'a> IntoIterator for &'a StandingsTable {
    type Item = &'a Standing;
    type IntoIter = std::slice::Iter<'a, Standing>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Folds `matches` into a ranked [`StandingsTable`].
///
/// An empty slice gives an empty table.
pub fn compute_standings(matches: &[MatchRecord]) -> StandingsTable {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<Standing> = Vec::new();

    for m in matches {
        for team in [m.home_team.as_str(), m.guest_team.as_str()] {
            if !index.contains_key(team) {
                index.insert(team, rows.len());
                rows.push(Standing {
                    team: team.to_string(),
                    stats: TeamStats::default(),
                });
            }
        }
    }

    for m in matches {
        let home_wins = m.home_wins();
        let home = index[m.home_team.as_str()];
        let guest = index[m.guest_team.as_str()];
        rows[home]
            .stats
            .record(m.home_points, m.guest_points, home_wins);
        rows[guest]
            .stats
            .record(m.guest_points, m.home_points, !home_wins);
    }

    // Stable sort: equal (points, diff) keep discovery order.
    rows.sort_by(|a, b| {
        b.stats
            .points
            .cmp(&a.stats.points)
            .then(b.stats.diff.cmp(&a.stats.diff))
    });

    StandingsTable { rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_tracks_a_loss() {
        let mut stats = TeamStats::default();
        stats.record(52, 73, false);
        assert_eq!(
            stats,
            TeamStats {
                games: 1,
                wins: 0,
                losses: 1,
                points: 0,
                points_made: 52,
                points_conceded: 73,
                diff: -21,
            }
        );
    }

    #[test]
    fn equal_score_is_not_a_home_win() {
        assert!(!MatchRecord::new("A", "B", 40, 40).home_wins());
        assert!(MatchRecord::new("A", "B", 41, 40).home_wins());
    }
}
