//! Batched insert-or-merge. Each record type declares its natural key and
//! column order; one statement shape serves every table.

use crate::models::{
    CareerTotals, Efficiency, Game, GameStatus, Player, PlayerAdvancedStats, PlayerGameStats,
    Ranks, SeasonRankings, SeasonTotals, ShootingLine, Team, TeamAdvancedStats, TeamGameStats,
    Totals,
};
use sqlx::query_builder::Separated;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

/// SQLite's ceiling on bound parameters per statement.
const MAX_BINDS: usize = 32_766;

type Binder<'qb, 'args> = Separated<'qb, 'args, Sqlite, &'static str>;

pub trait Upsert {
    /// Natural key; conflicts on these columns merge instead of failing.
    const KEY: &'static [&'static str];

    /// Column names in the order [`Upsert::bind`] pushes values.
    fn columns() -> Vec<&'static str>;

    fn bind(&self, row: &mut Binder<'_, '_>);
}

/// Write `rows` into `table` in one transaction.
pub async fn upsert<R: Upsert>(pool: &SqlitePool, table: &str, rows: &[R]) -> sqlx::Result<u64> {
    if rows.is_empty() {
        return Ok(0);
    }
    let mut tx = pool.begin().await?;
    let written = upsert_in(&mut tx, table, rows).await?;
    tx.commit().await?;
    Ok(written)
}

/// [`upsert`] against a connection the caller already holds, usually an open
/// transaction.
pub async fn upsert_in<R: Upsert>(
    conn: &mut SqliteConnection,
    table: &str,
    rows: &[R],
) -> sqlx::Result<u64> {
    let columns = R::columns();
    let head = format!("INSERT INTO {table} ({}) ", columns.join(", "));
    let tail = conflict_clause(R::KEY, &columns);
    let per_statement = (MAX_BINDS / columns.len()).max(1);

    for chunk in rows.chunks(per_statement) {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(&head);
        query.push_values(chunk, |mut row, record| record.bind(&mut row));
        query.push(&tail);
        query.build().execute(&mut *conn).await?;
    }
    Ok(rows.len() as u64)
}

fn conflict_clause(key: &[&str], columns: &[&str]) -> String {
    let assignments: Vec<String> = columns
        .iter()
        .filter(|c| !key.contains(c))
        .map(|c| format!("{c} = excluded.{c}"))
        .collect();
    format!(
        " ON CONFLICT ({}) DO UPDATE SET {}, updated_at = CURRENT_TIMESTAMP",
        key.join(", "),
        assignments.join(", ")
    )
}

// ---------------------------------------------------------------------------
// Shared column groups
// ---------------------------------------------------------------------------

const SHOOTING: [&str; 18] = [
    "field_goals_made",
    "field_goals_attempted",
    "field_goal_percentage",
    "three_pointers_made",
    "three_pointers_attempted",
    "three_point_percentage",
    "free_throws_made",
    "free_throws_attempted",
    "free_throw_percentage",
    "offensive_rebounds",
    "defensive_rebounds",
    "total_rebounds",
    "assists",
    "steals",
    "blocks",
    "turnovers",
    "personal_fouls",
    "plus_minus",
];

fn bind_shooting(row: &mut Binder<'_, '_>, line: &ShootingLine) {
    row.push_bind(line.field_goals_made)
        .push_bind(line.field_goals_attempted)
        .push_bind(line.field_goal_percentage)
        .push_bind(line.three_pointers_made)
        .push_bind(line.three_pointers_attempted)
        .push_bind(line.three_point_percentage)
        .push_bind(line.free_throws_made)
        .push_bind(line.free_throws_attempted)
        .push_bind(line.free_throw_percentage)
        .push_bind(line.offensive_rebounds)
        .push_bind(line.defensive_rebounds)
        .push_bind(line.total_rebounds)
        .push_bind(line.assists)
        .push_bind(line.steals)
        .push_bind(line.blocks)
        .push_bind(line.turnovers)
        .push_bind(line.personal_fouls)
        .push_bind(line.plus_minus);
}

const EFFICIENCY: [&str; 13] = [
    "offensive_rating",
    "defensive_rating",
    "net_rating",
    "assist_percentage",
    "assist_turnover_ratio",
    "offensive_rebound_percentage",
    "defensive_rebound_percentage",
    "rebound_percentage",
    "turnover_percentage",
    "effective_field_goal_percentage",
    "true_shooting_percentage",
    "pace",
    "pie",
];

fn bind_efficiency(row: &mut Binder<'_, '_>, e: &Efficiency) {
    row.push_bind(e.offensive_rating)
        .push_bind(e.defensive_rating)
        .push_bind(e.net_rating)
        .push_bind(e.assist_percentage)
        .push_bind(e.assist_turnover_ratio)
        .push_bind(e.offensive_rebound_percentage)
        .push_bind(e.defensive_rebound_percentage)
        .push_bind(e.rebound_percentage)
        .push_bind(e.turnover_percentage)
        .push_bind(e.effective_field_goal_percentage)
        .push_bind(e.true_shooting_percentage)
        .push_bind(e.pace)
        .push_bind(e.pie);
}

const TOTALS: [&str; 21] = [
    "games_played",
    "games_started",
    "minutes_played",
    "field_goals_made",
    "field_goals_attempted",
    "field_goal_percentage",
    "three_pointers_made",
    "three_pointers_attempted",
    "three_point_percentage",
    "free_throws_made",
    "free_throws_attempted",
    "free_throw_percentage",
    "offensive_rebounds",
    "defensive_rebounds",
    "total_rebounds",
    "assists",
    "steals",
    "blocks",
    "turnovers",
    "personal_fouls",
    "points",
];

fn bind_totals(row: &mut Binder<'_, '_>, t: &Totals) {
    row.push_bind(t.games_played)
        .push_bind(t.games_started)
        .push_bind(t.minutes_played)
        .push_bind(t.field_goals_made)
        .push_bind(t.field_goals_attempted)
        .push_bind(t.field_goal_percentage)
        .push_bind(t.three_pointers_made)
        .push_bind(t.three_pointers_attempted)
        .push_bind(t.three_point_percentage)
        .push_bind(t.free_throws_made)
        .push_bind(t.free_throws_attempted)
        .push_bind(t.free_throw_percentage)
        .push_bind(t.offensive_rebounds)
        .push_bind(t.defensive_rebounds)
        .push_bind(t.total_rebounds)
        .push_bind(t.assists)
        .push_bind(t.steals)
        .push_bind(t.blocks)
        .push_bind(t.turnovers)
        .push_bind(t.personal_fouls)
        .push_bind(t.points);
}

const RANKS: [&str; 21] = [
    "games_played_rank",
    "games_started_rank",
    "minutes_played_rank",
    "field_goals_made_rank",
    "field_goals_attempted_rank",
    "field_goal_percentage_rank",
    "three_pointers_made_rank",
    "three_pointers_attempted_rank",
    "three_point_percentage_rank",
    "free_throws_made_rank",
    "free_throws_attempted_rank",
    "free_throw_percentage_rank",
    "offensive_rebounds_rank",
    "defensive_rebounds_rank",
    "total_rebounds_rank",
    "assists_rank",
    "steals_rank",
    "blocks_rank",
    "turnovers_rank",
    "personal_fouls_rank",
    "points_rank",
];

fn bind_ranks(row: &mut Binder<'_, '_>, r: &Ranks) {
    row.push_bind(r.games_played)
        .push_bind(r.games_started)
        .push_bind(r.minutes_played)
        .push_bind(r.field_goals_made)
        .push_bind(r.field_goals_attempted)
        .push_bind(r.field_goal_percentage)
        .push_bind(r.three_pointers_made)
        .push_bind(r.three_pointers_attempted)
        .push_bind(r.three_point_percentage)
        .push_bind(r.free_throws_made)
        .push_bind(r.free_throws_attempted)
        .push_bind(r.free_throw_percentage)
        .push_bind(r.offensive_rebounds)
        .push_bind(r.defensive_rebounds)
        .push_bind(r.total_rebounds)
        .push_bind(r.assists)
        .push_bind(r.steals)
        .push_bind(r.blocks)
        .push_bind(r.turnovers)
        .push_bind(r.personal_fouls)
        .push_bind(r.points);
}

fn columns(groups: &[&[&'static str]]) -> Vec<&'static str> {
    groups.concat()
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

impl Upsert for Team {
    const KEY: &'static [&'static str] = &["id"];

    fn columns() -> Vec<&'static str> {
        vec!["id", "team_code", "team_name", "city", "conference", "division"]
    }

    fn bind(&self, row: &mut Binder<'_, '_>) {
        row.push_bind(self.id.clone())
            .push_bind(self.code.clone())
            .push_bind(self.name.clone())
            .push_bind(self.city.clone())
            .push_bind(self.conference.clone())
            .push_bind(self.division.clone());
    }
}

impl Upsert for Player {
    const KEY: &'static [&'static str] = &["id"];

    fn columns() -> Vec<&'static str> {
        vec![
            "id",
            "name",
            "team_id",
            "age",
            "position",
            "height_inches",
            "weight_pounds",
            "years_experience",
        ]
    }

    fn bind(&self, row: &mut Binder<'_, '_>) {
        row.push_bind(self.id.clone())
            .push_bind(self.name.clone())
            .push_bind(self.team_id.clone())
            .push_bind(self.age)
            .push_bind(self.position.clone())
            .push_bind(self.height_inches)
            .push_bind(self.weight_pounds)
            .push_bind(self.years_experience);
    }
}

impl Upsert for Game {
    const KEY: &'static [&'static str] = &["id"];

    // Game numbers are owned by the season renumbering pass, not by the row.
    fn columns() -> Vec<&'static str> {
        vec![
            "id",
            "game_date",
            "season",
            "status",
            "game_type",
            "home_team_id",
            "away_team_id",
            "home_score",
            "away_score",
        ]
    }

    fn bind(&self, row: &mut Binder<'_, '_>) {
        let completed = self.status == GameStatus::Completed;
        row.push_bind(self.id.clone())
            .push_bind(self.date)
            .push_bind(self.season.clone())
            .push_bind(self.status.as_str())
            .push_bind(self.game_type.as_str())
            .push_bind(self.home_team_id.clone())
            .push_bind(self.away_team_id.clone())
            .push_bind(self.home_score.filter(|_| completed))
            .push_bind(self.away_score.filter(|_| completed));
    }
}

impl Upsert for TeamGameStats {
    const KEY: &'static [&'static str] = &["team_id", "game_id"];

    fn columns() -> Vec<&'static str> {
        columns(&[&["team_id", "game_id", "points", "opponent_points", "win"], &SHOOTING, &["venue"]])
    }

    fn bind(&self, row: &mut Binder<'_, '_>) {
        row.push_bind(self.team_id.clone())
            .push_bind(self.game_id.clone())
            .push_bind(self.points)
            .push_bind(self.opponent_points)
            .push_bind(self.win);
        bind_shooting(row, &self.line);
        row.push_bind(self.venue.as_str());
    }
}

impl Upsert for PlayerGameStats {
    const KEY: &'static [&'static str] = &["player_id", "game_id"];

    fn columns() -> Vec<&'static str> {
        columns(&[
            &["player_id", "game_id", "team_id", "minutes_played", "points"],
            &SHOOTING,
            &["started", "venue"],
        ])
    }

    fn bind(&self, row: &mut Binder<'_, '_>) {
        row.push_bind(self.player_id.clone())
            .push_bind(self.game_id.clone())
            .push_bind(self.team_id.clone())
            .push_bind(self.minutes_played)
            .push_bind(self.points);
        bind_shooting(row, &self.line);
        row.push_bind(self.started).push_bind(self.venue.as_str());
    }
}

impl Upsert for TeamAdvancedStats {
    const KEY: &'static [&'static str] = &["team_id", "game_id"];

    fn columns() -> Vec<&'static str> {
        columns(&[&["team_id", "game_id"], &EFFICIENCY, &["venue"]])
    }

    fn bind(&self, row: &mut Binder<'_, '_>) {
        row.push_bind(self.team_id.clone()).push_bind(self.game_id.clone());
        bind_efficiency(row, &self.efficiency);
        row.push_bind(self.venue.as_str());
    }
}

impl Upsert for PlayerAdvancedStats {
    const KEY: &'static [&'static str] = &["player_id", "game_id"];

    fn columns() -> Vec<&'static str> {
        columns(&[
            &["player_id", "game_id", "team_id"],
            &EFFICIENCY,
            &["assist_ratio", "usage_percentage", "venue"],
        ])
    }

    fn bind(&self, row: &mut Binder<'_, '_>) {
        row.push_bind(self.player_id.clone())
            .push_bind(self.game_id.clone())
            .push_bind(self.team_id.clone());
        bind_efficiency(row, &self.efficiency);
        row.push_bind(self.assist_ratio)
            .push_bind(self.usage_percentage)
            .push_bind(self.venue.as_str());
    }
}

const SEASON_PREFIX: [&str; 6] = [
    "player_id",
    "season_id",
    "league_id",
    "team_id",
    "team_abbreviation",
    "player_age",
];

impl Upsert for SeasonTotals {
    const KEY: &'static [&'static str] = &["player_id", "season_id", "team_abbreviation"];

    fn columns() -> Vec<&'static str> {
        columns(&[&SEASON_PREFIX, &TOTALS])
    }

    fn bind(&self, row: &mut Binder<'_, '_>) {
        row.push_bind(self.player_id.clone())
            .push_bind(self.season_id.clone())
            .push_bind(self.league_id.clone())
            .push_bind(self.team_id.clone())
            .push_bind(self.team_abbreviation.clone())
            .push_bind(self.player_age);
        bind_totals(row, &self.totals);
    }
}

impl Upsert for CareerTotals {
    const KEY: &'static [&'static str] = &["player_id"];

    fn columns() -> Vec<&'static str> {
        columns(&[&["player_id", "league_id"], &TOTALS])
    }

    fn bind(&self, row: &mut Binder<'_, '_>) {
        row.push_bind(self.player_id.clone()).push_bind(self.league_id.clone());
        bind_totals(row, &self.totals);
    }
}

impl Upsert for SeasonRankings {
    const KEY: &'static [&'static str] = &["player_id", "season_id", "team_abbreviation"];

    fn columns() -> Vec<&'static str> {
        columns(&[&SEASON_PREFIX, &RANKS])
    }

    fn bind(&self, row: &mut Binder<'_, '_>) {
        row.push_bind(self.player_id.clone())
            .push_bind(self.season_id.clone())
            .push_bind(self.league_id.clone())
            .push_bind(self.team_id.clone())
            .push_bind(self.team_abbreviation.clone())
            .push_bind(self.player_age);
        bind_ranks(row, &self.ranks);
    }
}
