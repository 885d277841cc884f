use super::{Pipeline, RunSummary};
use crate::models::{CareerStats, SeasonKind};
use crate::parse;
use anyhow::{Context, Result};
use log::{error, info};
use nba_stats_api::StatsProvider;

/// Which stored players a career run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CareerSelection {
    All { limit: Option<u32> },
    Active,
    Players(Vec<String>),
}

impl<P: StatsProvider> Pipeline<P> {
    pub async fn load_careers(&self, selection: CareerSelection) -> Result<RunSummary> {
        let player_ids = match selection {
            CareerSelection::All { limit } => self.db.all_player_ids(limit).await,
            CareerSelection::Active => self.db.active_player_ids().await,
            CareerSelection::Players(ids) => Ok(ids),
        }
        .context("listing players for career load")?;
        info!("loading careers for {} players", player_ids.len());

        let mut summary = RunSummary::default();
        let total = player_ids.len();
        for (i, player_id) in player_ids.iter().enumerate() {
            info!("career {}/{total}: player {player_id}", i + 1);
            match self.load_career(player_id).await {
                Ok(rows) => summary.career_rows += rows,
                Err(e) => {
                    error!("career for player {player_id} failed: {e:#}");
                    summary.units_failed += 1;
                }
            }
        }

        info!("finished careers: {summary}");
        Ok(summary)
    }

    /// Fetch and store all six career tables for one player.
    async fn load_career(&self, player_id: &str) -> Result<usize> {
        let sets = self
            .provider
            .player_career(player_id)
            .await
            .context("fetching career")?;
        let career = parse::career_stats(&sets, player_id);
        self.write_career(&career).await
    }

    async fn write_career(&self, career: &CareerStats) -> Result<usize> {
        let mut rows = 0;
        for (kind, totals) in [
            (SeasonKind::Regular, &career.season_totals_regular),
            (SeasonKind::Playoffs, &career.season_totals_playoffs),
        ] {
            self.db
                .upsert_season_totals(kind, totals)
                .await
                .with_context(|| format!("writing {} season totals", kind.suffix()))?;
            rows += totals.len();
        }
        for (kind, totals) in [
            (SeasonKind::Regular, &career.career_totals_regular),
            (SeasonKind::Playoffs, &career.career_totals_playoffs),
        ] {
            let Some(totals) = totals else { continue };
            self.db
                .upsert_career_totals(kind, std::slice::from_ref(totals))
                .await
                .with_context(|| format!("writing {} career totals", kind.suffix()))?;
            rows += 1;
        }
        for (kind, rankings) in [
            (SeasonKind::Regular, &career.season_rankings_regular),
            (SeasonKind::Playoffs, &career.season_rankings_playoffs),
        ] {
            self.db
                .upsert_season_rankings(kind, rankings)
                .await
                .with_context(|| format!("writing {} season rankings", kind.suffix()))?;
            rows += rankings.len();
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::testing::{FakeProvider, player, seeded_db, table};
    use chrono::NaiveDate;
    use nba_stats_api::ResultSets;
    use serde_json::json;

    const SEASON_HEADERS: [&str; 7] =
        ["SEASON_ID", "LEAGUE_ID", "TEAM_ID", "TEAM_ABBREVIATION", "PLAYER_AGE", "GP", "PTS"];

    fn settings() -> Settings {
        Settings::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    fn career() -> ResultSets {
        let season = vec![
            json!("2023-24"),
            json!("00"),
            json!(1610612738),
            json!("BOS"),
            json!(26.0),
            json!(74),
            json!(1987),
        ];
        ResultSets::new(vec![
            table("SeasonTotalsRegularSeason", &SEASON_HEADERS, vec![season.clone()]),
            table("SeasonTotalsPostSeason", &SEASON_HEADERS, vec![season.clone()]),
            table("CareerTotalsRegularSeason", &["LEAGUE_ID", "GP", "PTS"], vec![vec![json!("00"), json!(500), json!(12000)]]),
            table("CareerTotalsPostSeason", &["LEAGUE_ID", "GP", "PTS"], vec![vec![json!("00"), json!(90), json!(2300)]]),
            table(
                "SeasonRankingsRegularSeason",
                &["SEASON_ID", "TEAM_ID", "TEAM_ABBREVIATION", "PLAYER_AGE", "RANK_PTS"],
                vec![vec![json!("2023-24"), json!(1610612738), json!("BOS"), json!(26), json!(6)]],
            ),
            table(
                "SeasonRankingsPostSeason",
                &["SEASON_ID", "TEAM_ID", "TEAM_ABBREVIATION", "PLAYER_AGE", "PTS_RANK"],
                vec![vec![json!("2023-24"), json!(1610612738), json!("BOS"), json!(26), json!("NR")]],
            ),
        ])
    }

    #[tokio::test]
    async fn career_fills_all_six_tables() {
        let (_dir, db) = seeded_db().await;
        db.upsert_players(&[player("1628369", Some("1610612738"))]).await.unwrap();
        let provider = FakeProvider::default().with_career("1628369", career());
        let pipeline = Pipeline::new(db, provider, settings());

        let summary = pipeline
            .load_careers(CareerSelection::Players(vec!["1628369".into()]))
            .await
            .unwrap();
        assert_eq!(summary.career_rows, 6);
        assert_eq!(summary.units_failed, 0);

        let db = pipeline.database();
        for table in [
            "player_season_totals_regular",
            "player_season_totals_playoffs",
            "player_career_totals_regular",
            "player_career_totals_playoffs",
            "player_season_rankings_regular",
            "player_season_rankings_playoffs",
        ] {
            assert_eq!(db.count_rows(table).await.unwrap(), 1, "{table}");
        }
        let playoff_rank: Option<i64> =
            sqlx::query_scalar("SELECT points_rank FROM player_season_rankings_playoffs")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(playoff_rank, None);

        // Reloading merges rather than duplicating.
        pipeline
            .load_careers(CareerSelection::Players(vec!["1628369".into()]))
            .await
            .unwrap();
        assert_eq!(db.count_rows("player_season_totals_regular").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn one_failing_player_does_not_stop_the_run() {
        let (_dir, db) = seeded_db().await;
        db.upsert_players(&[player("1", Some("1610612738")), player("2", None), player("3", None)])
            .await
            .unwrap();
        let provider = FakeProvider::default()
            .with_career("1", career())
            .with_career("3", career());
        let pipeline = Pipeline::new(db, provider, settings());

        let summary = pipeline.load_careers(CareerSelection::All { limit: None }).await.unwrap();
        assert_eq!(summary.units_failed, 1);
        assert_eq!(summary.career_rows, 12);
    }

    #[tokio::test]
    async fn active_selection_skips_free_agents() {
        let (_dir, db) = seeded_db().await;
        db.upsert_players(&[player("1", Some("1610612738")), player("2", None)])
            .await
            .unwrap();
        let provider = FakeProvider::default().with_career("1", career());
        let pipeline = Pipeline::new(db, provider, settings());

        let summary = pipeline.load_careers(CareerSelection::Active).await.unwrap();
        assert_eq!(summary.units_failed, 0);
        assert_eq!(pipeline.provider.calls_to("player_career"), 1);
    }
}
