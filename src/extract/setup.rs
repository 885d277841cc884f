use super::{Pipeline, RunSummary};
use crate::models::Team;
use crate::parse;
use anyhow::{Context, Result};
use log::{error, info};
use nba_stats_api::{StatsProvider, teams};

impl<P: StatsProvider> Pipeline<P> {
    /// Load the thirty franchises from the bundled team list.
    pub async fn setup_teams(&self) -> Result<RunSummary> {
        let rows: Vec<Team> = teams::all().iter().map(Team::from).collect();
        self.db.upsert_teams(&rows).await.context("writing teams")?;

        let summary = RunSummary { team_rows: rows.len(), ..RunSummary::default() };
        info!("teams loaded: {summary}");
        Ok(summary)
    }

    /// Load every team's current roster. A team whose roster can't be
    /// fetched or stored is skipped.
    pub async fn setup_players(&self) -> Result<RunSummary> {
        let season = &self.settings.season;
        info!("loading {season} rosters");

        let mut summary = RunSummary::default();
        for team in teams::all() {
            match self.load_roster(team.id, season).await {
                Ok(count) => {
                    info!("{}: {count} players", team.abbreviation);
                    summary.player_rows += count;
                }
                Err(e) => {
                    error!("roster for {} failed: {e:#}", team.abbreviation);
                    summary.units_failed += 1;
                }
            }
        }

        info!("rosters loaded: {summary}");
        Ok(summary)
    }

    async fn load_roster(&self, team_id: &str, season: &str) -> Result<usize> {
        let sets = self
            .provider
            .team_roster(team_id, season)
            .await
            .context("fetching roster")?;
        let players = parse::roster_players(&sets, team_id);
        self.db.upsert_players(&players).await.context("writing roster")?;
        Ok(players.len())
    }
}
