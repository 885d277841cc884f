//! Run-level control flow. Each run enumerates its units of work (games on a
//! date, players in a list), then fetches, parses, resolves and persists one
//! unit at a time. A failing unit is logged and counted; only a failure to
//! enumerate the units aborts the run.

pub mod career;
pub mod games;
pub mod setup;

use crate::db::Database;
use crate::settings::Settings;
use chrono::NaiveDate;
use nba_stats_api::StatsProvider;
use std::fmt;

pub use career::CareerSelection;
pub use games::LoadMode;

pub struct Pipeline<P> {
    db: Database,
    provider: P,
    settings: Settings,
}

impl<P: StatsProvider> Pipeline<P> {
    pub fn new(db: Database, provider: P, settings: Settings) -> Self {
        Self { db, provider, settings }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

/// Counts for one run, logged when it finishes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub games: usize,
    /// Team-level rows written: teams, team box scores or team advanced lines.
    pub team_rows: usize,
    /// Player-level rows written: roster players or per-game player lines.
    pub player_rows: usize,
    pub career_rows: usize,
    pub players_created: usize,
    /// Player lines dropped because their player could not be resolved.
    pub rows_dropped: usize,
    pub units_failed: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} games, {} team rows, {} player rows, {} career rows, {} players created, \
             {} rows dropped, {} failed units",
            self.games,
            self.team_rows,
            self.player_rows,
            self.career_rows,
            self.players_created,
            self.rows_dropped,
            self.units_failed
        )
    }
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateSpan {
    pub fn single(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    /// `None` when `end` is before `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start
            .iter_days()
            .take_while(move |day| *day <= self.end)
    }

    pub fn day_count(&self) -> usize {
        let span = self.end.signed_duration_since(self.start).num_days();
        usize::try_from(span).map_or(0, |d| d + 1)
    }
}

impl fmt::Display for DateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} to {}", self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn spans_are_inclusive() {
        let span = DateSpan::new(date(2024, 2, 28), date(2024, 3, 1)).unwrap();
        let days: Vec<NaiveDate> = span.days().collect();
        assert_eq!(days, vec![date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]);
        assert_eq!(span.day_count(), 3);
        assert_eq!(span.to_string(), "2024-02-28 to 2024-03-01");
    }

    #[test]
    fn reversed_spans_are_rejected() {
        assert!(DateSpan::new(date(2024, 3, 2), date(2024, 3, 1)).is_none());
        let single = DateSpan::single(date(2024, 3, 1));
        assert_eq!(single.days().count(), 1);
        assert_eq!(single.to_string(), "2024-03-01");
    }
}
