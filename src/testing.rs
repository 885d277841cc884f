//! Fixtures shared by the unit tests: on-disk databases and a canned provider.

use crate::db::Database;
use crate::models::{Player, Team};
use chrono::NaiveDate;
use nba_stats_api::{ApiError, ApiResult, BoxScoreKind, ResultSet, ResultSets, StatsProvider};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use tempfile::TempDir;

pub fn table(name: &str, headers: &[&str], rows: Vec<Vec<Value>>) -> ResultSet {
    ResultSet {
        name: name.to_string(),
        headers: headers.iter().map(|h| h.to_string()).collect(),
        rows,
    }
}

pub fn player(id: &str, team_id: Option<&str>) -> Player {
    Player {
        id: id.into(),
        name: format!("Player {id}"),
        team_id: team_id.map(str::to_string),
        age: Some(25),
        position: "G".into(),
        height_inches: 78,
        weight_pounds: 210,
        years_experience: 3,
    }
}

/// Fresh database in a temp dir, schema only.
pub async fn empty_db() -> (TempDir, Database) {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}", dir.path().join("test.db").display());
    let db = Database::connect(&url).await.expect("connect");
    (dir, db)
}

/// Fresh database with the thirty franchises loaded.
pub async fn seeded_db() -> (TempDir, Database) {
    let (dir, db) = empty_db().await;
    let teams: Vec<Team> = nba_stats_api::teams::all().iter().map(Team::from).collect();
    db.upsert_teams(&teams).await.expect("seed teams");
    (dir, db)
}

/// Provider answering from in-memory payloads. Anything not registered is a
/// `NotFound`; calls are recorded so tests can assert on traffic.
#[derive(Default)]
pub struct FakeProvider {
    pub scoreboards: HashMap<NaiveDate, ResultSets>,
    pub box_scores: HashMap<(String, &'static str), ResultSets>,
    pub player_infos: HashMap<String, ResultSets>,
    pub rosters: HashMap<String, ResultSets>,
    pub careers: HashMap<String, ResultSets>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeProvider {
    pub fn with_scoreboard(mut self, date: NaiveDate, sets: ResultSets) -> Self {
        self.scoreboards.insert(date, sets);
        self
    }

    pub fn with_box_score(mut self, game_id: &str, kind: BoxScoreKind, sets: ResultSets) -> Self {
        self.box_scores.insert((game_id.to_string(), kind.label()), sets);
        self
    }

    pub fn with_player_info(mut self, player_id: &str, sets: ResultSets) -> Self {
        self.player_infos.insert(player_id.to_string(), sets);
        self
    }

    pub fn with_roster(mut self, team_id: &str, sets: ResultSets) -> Self {
        self.rosters.insert(team_id.to_string(), sets);
        self
    }

    pub fn with_career(mut self, player_id: &str, sets: ResultSets) -> Self {
        self.careers.insert(player_id.to_string(), sets);
        self
    }

    pub fn calls_to(&self, prefix: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn answer(&self, call: String, found: Option<&ResultSets>) -> ApiResult<ResultSets> {
        let result = found.cloned().ok_or_else(|| ApiError::NotFound(call.clone()));
        self.calls.borrow_mut().push(call);
        result
    }
}

impl StatsProvider for FakeProvider {
    async fn scoreboard(&self, date: NaiveDate) -> ApiResult<ResultSets> {
        self.answer(format!("scoreboard {date}"), self.scoreboards.get(&date))
    }

    async fn box_score(&self, game_id: &str, kind: BoxScoreKind) -> ApiResult<ResultSets> {
        let found = self.box_scores.get(&(game_id.to_string(), kind.label()));
        self.answer(format!("box_score {} {game_id}", kind.label()), found)
    }

    async fn player_info(&self, player_id: &str) -> ApiResult<ResultSets> {
        self.answer(format!("player_info {player_id}"), self.player_infos.get(player_id))
    }

    async fn team_roster(&self, team_id: &str, _season: &str) -> ApiResult<ResultSets> {
        self.answer(format!("team_roster {team_id}"), self.rosters.get(team_id))
    }

    async fn player_career(&self, player_id: &str) -> ApiResult<ResultSets> {
        self.answer(format!("player_career {player_id}"), self.careers.get(player_id))
    }
}
