pub mod numbering;
pub mod schema;
pub mod upsert;

use crate::models::{
    CareerTotals, Game, GameRef, Player, PlayerAdvancedStats, PlayerGameStats, SeasonKind,
    SeasonRankings, SeasonTotals, Team, TeamAdvancedStats, TeamGameStats,
};
use chrono::NaiveDate;
use log::debug;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;
use upsert::upsert;

/// Handle to the local store. Every operation checks a connection out of the
/// pool and commits before returning; nothing spans units of work.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database at `url` and make sure the
    /// schema exists.
    pub async fn connect(url: &str) -> sqlx::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;
        schema::create(&pool).await?;
        debug!("connected to {url}");
        Ok(Self { pool })
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn existing_player_ids(&self) -> sqlx::Result<HashSet<String>> {
        let ids: Vec<String> = sqlx::query_scalar("SELECT id FROM players")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().collect())
    }

    pub async fn team_exists(&self, team_id: &str) -> sqlx::Result<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM teams WHERE id = ?")
            .bind(team_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    pub async fn completed_games_for_date(&self, date: NaiveDate) -> sqlx::Result<Vec<GameRef>> {
        let rows = sqlx::query(
            "SELECT id, home_team_id, away_team_id FROM games
             WHERE game_date = ? AND status = 'completed'
             ORDER BY id",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| GameRef {
                id: row.get("id"),
                home_team_id: row.get("home_team_id"),
                away_team_id: row.get("away_team_id"),
            })
            .collect())
    }

    /// Every stored player id in id order, optionally capped.
    pub async fn all_player_ids(&self, limit: Option<u32>) -> sqlx::Result<Vec<String>> {
        // SQLite reads a negative LIMIT as "no limit".
        let limit = limit.map(i64::from).unwrap_or(-1);
        sqlx::query_scalar("SELECT id FROM players ORDER BY id LIMIT ?")
            .bind(limit)
            .fetch_all(&self.pool)
            .await
    }

    /// Players currently on a team.
    pub async fn active_player_ids(&self) -> sqlx::Result<Vec<String>> {
        sqlx::query_scalar("SELECT id FROM players WHERE team_id IS NOT NULL ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn count_rows(&self, table: &str) -> sqlx::Result<i64> {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Reset
    // -----------------------------------------------------------------------

    pub async fn clear_all(&self) -> sqlx::Result<()> {
        self.clear(&schema::ALL_TABLES_CHILDREN_FIRST).await
    }

    pub async fn clear_players(&self) -> sqlx::Result<()> {
        self.clear(&schema::PLAYER_TABLES_CHILDREN_FIRST).await
    }

    async fn clear(&self, tables: &[&str]) -> sqlx::Result<()> {
        let mut tx = self.pool.begin().await?;
        for table in tables {
            let deleted = sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?
                .rows_affected();
            debug!("cleared {deleted} rows from {table}");
        }
        tx.commit().await
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    pub async fn upsert_teams(&self, teams: &[Team]) -> sqlx::Result<u64> {
        upsert(&self.pool, "teams", teams).await
    }

    pub async fn upsert_players(&self, players: &[Player]) -> sqlx::Result<u64> {
        upsert(&self.pool, "players", players).await
    }

    /// Write games, then renumber every season the batch touched, all in one
    /// transaction.
    pub async fn upsert_games(&self, games: &[Game]) -> sqlx::Result<u64> {
        if games.is_empty() {
            return Ok(0);
        }
        let mut tx = self.pool.begin().await?;
        let written = upsert::upsert_in(&mut tx, "games", games).await?;
        let seasons: BTreeSet<&str> = games.iter().map(|g| g.season.as_str()).collect();
        for season in seasons {
            numbering::renumber_season(&mut tx, season).await?;
        }
        tx.commit().await?;
        Ok(written)
    }

    pub async fn upsert_team_game_stats(&self, stats: &[TeamGameStats]) -> sqlx::Result<u64> {
        upsert(&self.pool, "team_game_stats", stats).await
    }

    pub async fn upsert_player_game_stats(&self, stats: &[PlayerGameStats]) -> sqlx::Result<u64> {
        upsert(&self.pool, "player_game_stats", stats).await
    }

    pub async fn upsert_team_advanced_stats(&self, stats: &[TeamAdvancedStats]) -> sqlx::Result<u64> {
        upsert(&self.pool, "team_advanced_stats", stats).await
    }

    pub async fn upsert_player_advanced_stats(
        &self,
        stats: &[PlayerAdvancedStats],
    ) -> sqlx::Result<u64> {
        upsert(&self.pool, "player_advanced_stats", stats).await
    }

    pub async fn upsert_season_totals(
        &self,
        kind: SeasonKind,
        totals: &[SeasonTotals],
    ) -> sqlx::Result<u64> {
        let table = format!("player_season_totals_{}", kind.suffix());
        upsert(&self.pool, &table, totals).await
    }

    pub async fn upsert_career_totals(
        &self,
        kind: SeasonKind,
        totals: &[CareerTotals],
    ) -> sqlx::Result<u64> {
        let table = format!("player_career_totals_{}", kind.suffix());
        upsert(&self.pool, &table, totals).await
    }

    pub async fn upsert_season_rankings(
        &self,
        kind: SeasonKind,
        rankings: &[SeasonRankings],
    ) -> sqlx::Result<u64> {
        let table = format!("player_season_rankings_{}", kind.suffix());
        upsert(&self.pool, &table, rankings).await
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameStatus, GameType, ShootingLine, Venue};
    use crate::testing::{player, seeded_db};

    fn game(id: &str, date: (i32, u32, u32), status: GameStatus, home: &str, away: &str) -> Game {
        Game {
            id: id.into(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            season: "2023".into(),
            home_team_id: home.into(),
            away_team_id: away.into(),
            home_score: Some(110),
            away_score: Some(100),
            status,
            game_type: GameType::from_game_id(id),
        }
    }

    #[tokio::test]
    async fn upserting_the_same_batch_twice_is_a_no_op() {
        let (_dir, db) = seeded_db().await;
        let players = vec![player("2544", Some("1610612747")), player("201939", Some("1610612744"))];

        db.upsert_players(&players).await.unwrap();
        db.upsert_players(&players).await.unwrap();

        assert_eq!(db.count_rows("players").await.unwrap(), 2);
        let ids = db.existing_player_ids().await.unwrap();
        assert!(ids.contains("2544") && ids.contains("201939"));
    }

    #[tokio::test]
    async fn later_writes_replace_every_non_key_field() {
        let (_dir, db) = seeded_db().await;
        let mut lebron = player("2544", Some("1610612747"));
        db.upsert_players(&[lebron.clone()]).await.unwrap();

        lebron.team_id = Some("1610612738".into());
        lebron.position = "F".into();
        db.upsert_players(&[lebron]).await.unwrap();

        let (team_id, position): (String, String) =
            sqlx::query_as("SELECT team_id, position FROM players WHERE id = '2544'")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(team_id, "1610612738");
        assert_eq!(position, "F");
    }

    #[tokio::test]
    async fn a_failing_row_rolls_back_the_whole_batch() {
        let (_dir, db) = seeded_db().await;
        let batch = vec![player("1", Some("1610612747")), player("2", Some("no-such-team"))];

        assert!(db.upsert_players(&batch).await.is_err());
        assert_eq!(db.count_rows("players").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn team_stats_merge_on_team_and_game() {
        let (_dir, db) = seeded_db().await;
        let g = game("0022300584", (2024, 1, 15), GameStatus::Completed, "1610612738", "1610612752");
        db.upsert_games(&[g]).await.unwrap();

        let mut line = TeamGameStats {
            team_id: "1610612738".into(),
            game_id: "0022300584".into(),
            points: 110,
            opponent_points: 100,
            win: true,
            line: ShootingLine::default(),
            venue: Venue::Home,
        };
        db.upsert_team_game_stats(&[line.clone()]).await.unwrap();
        line.points = 112;
        db.upsert_team_game_stats(&[line]).await.unwrap();

        let points: i64 = sqlx::query_scalar("SELECT points FROM team_game_stats")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(points, 112);
        assert_eq!(db.count_rows("team_game_stats").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn games_are_numbered_per_team_once_completed() {
        let (_dir, db) = seeded_db().await;
        let bos = "1610612738";
        let nyk = "1610612752";
        let mia = "1610612748";

        // Loaded newest first to show numbering does not depend on load order.
        db.upsert_games(&[game("0022300030", (2024, 1, 20), GameStatus::Completed, mia, bos)])
            .await
            .unwrap();
        db.upsert_games(&[
            game("0022300010", (2024, 1, 10), GameStatus::Completed, bos, nyk),
            game("0022300040", (2024, 1, 25), GameStatus::Scheduled, bos, mia),
        ])
        .await
        .unwrap();
        // Re-running a date must not shift anything.
        db.upsert_games(&[game("0022300010", (2024, 1, 10), GameStatus::Completed, bos, nyk)])
            .await
            .unwrap();

        let numbers: Vec<(String, Option<i64>, Option<i64>, Option<i64>)> = sqlx::query_as(
            "SELECT id, home_team_game_number, away_team_game_number, home_score
             FROM games ORDER BY id",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        assert_eq!(numbers[0], ("0022300010".to_string(), Some(1), Some(1), Some(110)));
        assert_eq!(numbers[1], ("0022300030".to_string(), Some(1), Some(2), Some(110)));
        assert_eq!(numbers[2], ("0022300040".to_string(), None, None, None));
    }

    #[tokio::test]
    async fn completed_games_for_date_ignores_other_statuses() {
        let (_dir, db) = seeded_db().await;
        db.upsert_games(&[
            game("0022300010", (2024, 1, 10), GameStatus::Completed, "1610612738", "1610612752"),
            game("0022300011", (2024, 1, 10), GameStatus::InProgress, "1610612747", "1610612744"),
            game("0022300012", (2024, 1, 11), GameStatus::Completed, "1610612747", "1610612744"),
        ])
        .await
        .unwrap();

        let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let games = db.completed_games_for_date(day).await.unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].home_team_id, "1610612738");
    }

    #[tokio::test]
    async fn player_enumeration_and_reset() {
        let (_dir, db) = seeded_db().await;
        db.upsert_players(&[
            player("3", Some("1610612738")),
            player("1", None),
            player("2", Some("1610612747")),
        ])
        .await
        .unwrap();

        assert_eq!(db.all_player_ids(None).await.unwrap(), vec!["1", "2", "3"]);
        assert_eq!(db.all_player_ids(Some(2)).await.unwrap(), vec!["1", "2"]);
        assert_eq!(db.active_player_ids().await.unwrap(), vec!["2", "3"]);

        db.clear_players().await.unwrap();
        assert_eq!(db.count_rows("players").await.unwrap(), 0);
        assert!(db.team_exists("1610612738").await.unwrap());

        db.clear_all().await.unwrap();
        assert!(!db.team_exists("1610612738").await.unwrap());
    }
}
