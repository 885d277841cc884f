use super::{DateSpan, Pipeline, RunSummary};
use crate::models::{Game, GameRef, GameStatus};
use crate::parse::{self, PlayerRef};
use crate::resolver::{KnownPlayers, Resolution, Resolver};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use nba_stats_api::{BoxScoreKind, StatsProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Games, traditional box scores, then advanced box scores.
    Full,
    /// Games and traditional box scores.
    Basic,
    /// Advanced box scores for completed games already stored.
    Advanced,
}

/// State threaded through one run.
struct Run<'a, P> {
    resolver: Resolver<'a, P>,
    known: KnownPlayers,
    summary: RunSummary,
}

impl<P: StatsProvider> Pipeline<P> {
    pub async fn load_dates(&self, span: DateSpan, mode: LoadMode) -> Result<RunSummary> {
        info!("loading {span} ({mode:?}, {} days)", span.day_count());
        let known = self
            .db
            .existing_player_ids()
            .await
            .context("reading known players")?;
        info!("{} players already stored", known.len());

        let mut run = Run {
            resolver: Resolver::new(&self.db, &self.provider, self.settings.today),
            known,
            summary: RunSummary::default(),
        };

        for date in span.days() {
            match mode {
                LoadMode::Full | LoadMode::Basic => self.load_scoreboard(date, mode, &mut run).await?,
                LoadMode::Advanced => self.load_stored_games(date, &mut run).await?,
            }
        }

        info!("finished {span}: {}", run.summary);
        Ok(run.summary)
    }

    async fn load_scoreboard(&self, date: NaiveDate, mode: LoadMode, run: &mut Run<'_, P>) -> Result<()> {
        let sets = self
            .provider
            .scoreboard(date)
            .await
            .with_context(|| format!("fetching scoreboard for {date}"))?;
        let games = parse::games(&sets, date);
        if games.is_empty() {
            info!("no games on {date}");
            return Ok(());
        }
        info!("{} games on {date}", games.len());

        for game in games {
            let game_id = game.id.clone();
            if let Err(e) = self.load_game(game, mode, run).await {
                error!("game {game_id} failed: {e:#}");
                run.summary.units_failed += 1;
            }
        }
        Ok(())
    }

    async fn load_stored_games(&self, date: NaiveDate, run: &mut Run<'_, P>) -> Result<()> {
        let games = self
            .db
            .completed_games_for_date(date)
            .await
            .with_context(|| format!("reading stored games for {date}"))?;
        if games.is_empty() {
            info!("no completed games stored for {date}");
            return Ok(());
        }
        info!("{} completed games stored for {date}", games.len());

        for game in games {
            if let Err(e) = self.load_advanced(&game, run).await {
                error!("advanced stats for game {} failed: {e:#}", game.id);
                run.summary.units_failed += 1;
            }
        }
        Ok(())
    }

    /// One scoreboard game: the game row, its box score and, in full mode,
    /// its advanced box score. The game row is written even when the box
    /// score can't be fetched.
    async fn load_game(&self, mut game: Game, mode: LoadMode, run: &mut Run<'_, P>) -> Result<()> {
        if game.status != GameStatus::Completed {
            debug!("game {} is {}, storing schedule only", game.id, game.status.as_str());
            self.db.upsert_games(std::slice::from_ref(&game)).await?;
            run.summary.games += 1;
            return Ok(());
        }

        let reference = game.reference();
        let box_score = self.provider.box_score(&game.id, BoxScoreKind::Traditional).await;
        let sets = match box_score {
            Ok(sets) => sets,
            Err(e) => {
                self.db.upsert_games(std::slice::from_ref(&game)).await?;
                run.summary.games += 1;
                return Err(e).context("fetching traditional box score");
            }
        };

        let team_stats = parse::team_game_stats(&sets, &reference);
        game.apply_scores(&team_stats);
        self.db.upsert_games(std::slice::from_ref(&game)).await?;
        run.summary.games += 1;

        self.db
            .upsert_team_game_stats(&team_stats)
            .await
            .context("writing team box score")?;
        run.summary.team_rows += team_stats.len();

        let lines = parse::player_game_stats(&sets, &reference);
        let accepted = self.accept(lines, run).await;
        self.db
            .upsert_player_game_stats(&accepted)
            .await
            .context("writing player box score")?;
        run.summary.player_rows += accepted.len();
        info!(
            "game {}: {} team lines, {} player lines",
            game.id,
            team_stats.len(),
            accepted.len()
        );

        if mode == LoadMode::Full {
            self.load_advanced(&reference, run).await?;
        }
        Ok(())
    }

    async fn load_advanced(&self, game: &GameRef, run: &mut Run<'_, P>) -> Result<()> {
        let sets = self
            .provider
            .box_score(&game.id, BoxScoreKind::Advanced)
            .await
            .context("fetching advanced box score")?;

        let team_stats = parse::team_advanced_stats(&sets, game);
        self.db
            .upsert_team_advanced_stats(&team_stats)
            .await
            .context("writing team advanced stats")?;
        run.summary.team_rows += team_stats.len();

        let lines = parse::player_advanced_stats(&sets, game);
        let accepted = self.accept(lines, run).await;
        self.db
            .upsert_player_advanced_stats(&accepted)
            .await
            .context("writing player advanced stats")?;
        run.summary.player_rows += accepted.len();
        info!(
            "game {} advanced ({} at {}): {} team lines, {} player lines",
            game.id,
            game.away_team_id,
            game.home_team_id,
            team_stats.len(),
            accepted.len()
        );
        Ok(())
    }

    /// Resolve each line's player, keeping the lines whose player now exists.
    async fn accept<T>(&self, lines: Vec<(PlayerRef, T)>, run: &mut Run<'_, P>) -> Vec<T> {
        let mut accepted = Vec::with_capacity(lines.len());
        for (player, stats) in lines {
            match run.resolver.resolve(&player, &player.team_id, &mut run.known).await {
                Ok(Resolution::AlreadyKnown) => accepted.push(stats),
                Ok(Resolution::Created(_)) => {
                    run.summary.players_created += 1;
                    accepted.push(stats);
                }
                Err(e) => {
                    warn!("dropping line for player {}: {e}", player.id);
                    run.summary.rows_dropped += 1;
                }
            }
        }
        accepted
    }
}
