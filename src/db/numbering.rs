//! Per-team game numbers. A completed game's number for a team is its
//! position among that team's completed games in the season, ordered by
//! date then id; the type number restarts for each game type. Numbers are
//! recomputed for the whole season, so loading dates out of order or twice
//! lands on the same result.

use sqlx::{Row, SqliteConnection};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedGame {
    pub id: String,
    pub date: String,
    pub game_type: String,
    pub home_team_id: String,
    pub away_team_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameNumbers {
    pub home_game_number: i32,
    pub away_game_number: i32,
    pub home_type_number: i32,
    pub away_type_number: i32,
}

pub fn number_season(games: &[CompletedGame]) -> HashMap<String, GameNumbers> {
    let mut ordered: Vec<&CompletedGame> = games.iter().collect();
    ordered.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

    let mut per_team: HashMap<&str, i32> = HashMap::new();
    let mut per_type: HashMap<(&str, &str), i32> = HashMap::new();
    let mut numbered = HashMap::with_capacity(ordered.len());
    for g in ordered {
        let (home_game_number, home_type_number) =
            bump(&mut per_team, &mut per_type, &g.home_team_id, &g.game_type);
        let (away_game_number, away_type_number) =
            bump(&mut per_team, &mut per_type, &g.away_team_id, &g.game_type);
        numbered.insert(
            g.id.clone(),
            GameNumbers { home_game_number, away_game_number, home_type_number, away_type_number },
        );
    }
    numbered
}

fn bump<'a>(
    per_team: &mut HashMap<&'a str, i32>,
    per_type: &mut HashMap<(&'a str, &'a str), i32>,
    team: &'a str,
    game_type: &'a str,
) -> (i32, i32) {
    let n = per_team.entry(team).or_default();
    *n += 1;
    let t = per_type.entry((team, game_type)).or_default();
    *t += 1;
    (*n, *t)
}

/// Rewrite game numbers for every game in `season`.
pub async fn renumber_season(conn: &mut SqliteConnection, season: &str) -> sqlx::Result<()> {
    let rows = sqlx::query(
        "SELECT id, game_date, game_type, home_team_id, away_team_id
         FROM games WHERE season = ? AND status = 'completed'",
    )
    .bind(season)
    .fetch_all(&mut *conn)
    .await?;

    let games: Vec<CompletedGame> = rows
        .iter()
        .map(|row| CompletedGame {
            id: row.get("id"),
            date: row.get("game_date"),
            game_type: row.get("game_type"),
            home_team_id: row.get("home_team_id"),
            away_team_id: row.get("away_team_id"),
        })
        .collect();

    sqlx::query(
        "UPDATE games SET home_team_game_number = NULL, away_team_game_number = NULL,
             home_team_game_type_number = NULL, away_team_game_type_number = NULL
         WHERE season = ? AND status != 'completed'",
    )
    .bind(season)
    .execute(&mut *conn)
    .await?;

    for (game_id, n) in number_season(&games) {
        sqlx::query(
            "UPDATE games SET home_team_game_number = ?, away_team_game_number = ?,
                 home_team_game_type_number = ?, away_team_game_type_number = ?
             WHERE id = ?",
        )
        .bind(n.home_game_number)
        .bind(n.away_game_number)
        .bind(n.home_type_number)
        .bind(n.away_type_number)
        .bind(game_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
