//! Totals Snapshot
//!
//! The most recently fetched team totals. A snapshot is always complete:
//! every registry team has an entry, zero when the server sent none.

use std::collections::HashMap;

use crate::teams::{Team, TEAMS};

/// A team's cumulative points
pub type Score = u64;

/// Mapping from team name to score, replaced wholesale on every fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsSnapshot {
    scores: HashMap<String, Score>,
}

impl Default for TotalsSnapshot {
    fn default() -> Self {
        Self {
            scores: TEAMS
                .iter()
                .map(|team| (team.name.to_string(), 0))
                .collect(),
        }
    }
}

impl TotalsSnapshot {
    /// Build a snapshot from a server `totals` mapping.
    ///
    /// Registry teams missing from `totals` read as zero. Unknown names are
    /// kept but never rendered.
    pub fn from_totals(totals: HashMap<String, Score>) -> Self {
        let mut snapshot = Self::default();
        snapshot.scores.extend(totals);
        snapshot
    }

    /// Score for a team name, zero if unknown
    pub fn score(&self, name: &str) -> Score {
        self.scores.get(name).copied().unwrap_or(0)
    }

    /// Score for a registry team
    pub fn score_of(&self, team: &Team) -> Score {
        self.score(team.name)
    }

    /// Highest score among registry teams
    pub fn max_score(&self) -> Score {
        TEAMS.iter().map(|t| self.score_of(t)).max().unwrap_or(0)
    }

    /// Sum of registry team scores
    pub fn total(&self) -> Score {
        TEAMS
            .iter()
            .fold(0, |acc: Score, t| acc.saturating_add(self.score_of(t)))
    }

    /// Registry teams with their scores, in render order
    pub fn standings(&self) -> impl Iterator<Item = (&'static Team, Score)> + '_ {
        TEAMS.iter().map(move |team| (team, self.score_of(team)))
    }
}
