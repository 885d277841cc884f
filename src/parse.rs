//! Decoded rows → typed records. Missing tables are zero rows; rows without
//! their identifying fields are skipped.

use crate::models::{
    CareerStats, CareerTotals, Efficiency, Game, GameRef, GameStatus, GameType, Player,
    PlayerAdvancedStats, PlayerGameStats, Ranks, SeasonRankings, SeasonTotals, ShootingLine,
    TeamAdvancedStats, TeamGameStats, Totals, Venue,
};
use crate::normalize::{
    age_from_birthdate, height_to_inches, minutes_to_decimal, normalize_position,
    parse_experience, parse_weight, rank_value,
};
use chrono::NaiveDate;
use log::debug;
use nba_stats_api::{ResultSets, Row};

pub const GAME_HEADER: &str = "GameHeader";
pub const PLAYER_STATS: &str = "PlayerStats";
pub const TEAM_STATS: &str = "TeamStats";
pub const COMMON_PLAYER_INFO: &str = "CommonPlayerInfo";
pub const COMMON_TEAM_ROSTER: &str = "CommonTeamRoster";

const SEASON_TOTALS_REGULAR: &str = "SeasonTotalsRegularSeason";
const SEASON_TOTALS_POST: &str = "SeasonTotalsPostSeason";
const CAREER_TOTALS_REGULAR: &str = "CareerTotalsRegularSeason";
const CAREER_TOTALS_POST: &str = "CareerTotalsPostSeason";
const SEASON_RANKINGS_REGULAR: &str = "SeasonRankingsRegularSeason";
const SEASON_RANKINGS_POST: &str = "SeasonRankingsPostSeason";

/// Multi-team seasons carry a combined row alongside the per-team ones.
const COMBINED_TEAM: &str = "TOT";
const DEFAULT_LEAGUE: &str = "00";

/// The player a box score row refers to, before resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRef {
    pub id: String,
    pub name: Option<String>,
    pub team_id: String,
}

/// Biographical data from `commonplayerinfo`. `listed_team_id` is whatever
/// the endpoint reported, unvalidated.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerDetail {
    pub name: Option<String>,
    pub listed_team_id: Option<String>,
    pub age: Option<i32>,
    pub position: String,
    pub height_inches: i32,
    pub weight_pounds: i32,
    pub years_experience: i32,
}

// ---------------------------------------------------------------------------
// Scoreboard
// ---------------------------------------------------------------------------

pub fn games(sets: &ResultSets, date: NaiveDate) -> Vec<Game> {
    sets.rows(GAME_HEADER)
        .iter()
        .filter_map(|row| game(row, date))
        .collect()
}

fn game(row: &Row, date: NaiveDate) -> Option<Game> {
    let id = row.non_empty("GAME_ID")?;
    let home_team_id = row.non_empty("HOME_TEAM_ID")?;
    let away_team_id = row.non_empty("VISITOR_TEAM_ID")?;
    Some(Game {
        game_type: GameType::from_game_id(&id),
        id,
        date,
        season: row.text("SEASON").unwrap_or_default(),
        home_team_id,
        away_team_id,
        home_score: None,
        away_score: None,
        status: GameStatus::from_status_id(row.int("GAME_STATUS_ID")),
    })
}

// ---------------------------------------------------------------------------
// Traditional box score
// ---------------------------------------------------------------------------

fn shooting_line(row: &Row) -> ShootingLine {
    ShootingLine {
        field_goals_made: row.count("FGM"),
        field_goals_attempted: row.count("FGA"),
        field_goal_percentage: row.rate("FG_PCT"),
        three_pointers_made: row.count("FG3M"),
        three_pointers_attempted: row.count("FG3A"),
        three_point_percentage: row.rate("FG3_PCT"),
        free_throws_made: row.count("FTM"),
        free_throws_attempted: row.count("FTA"),
        free_throw_percentage: row.rate("FT_PCT"),
        offensive_rebounds: row.count("OREB"),
        defensive_rebounds: row.count("DREB"),
        total_rebounds: row.count("REB"),
        assists: row.count("AST"),
        steals: row.count("STL"),
        blocks: row.count("BLK"),
        turnovers: row.count("TO"),
        personal_fouls: row.count("PF"),
        plus_minus: row.rate("PLUS_MINUS"),
    }
}

/// Team lines for one game. With exactly two teams each side learns the
/// other's points and whether it won.
pub fn team_game_stats(sets: &ResultSets, game: &GameRef) -> Vec<TeamGameStats> {
    let mut stats: Vec<TeamGameStats> = sets
        .rows(TEAM_STATS)
        .iter()
        .filter_map(|row| {
            let team_id = row.non_empty("TEAM_ID")?;
            Some(TeamGameStats {
                venue: Venue::of(&team_id, &game.home_team_id),
                team_id,
                game_id: game.id.clone(),
                points: row.count("PTS"),
                opponent_points: 0,
                win: false,
                line: shooting_line(row),
            })
        })
        .collect();

    if let [a, b] = stats.as_mut_slice() {
        a.opponent_points = b.points;
        b.opponent_points = a.points;
        a.win = a.points > b.points;
        b.win = b.points > a.points;
    }
    stats
}

/// Did the row's player actually take the floor?
fn played(row: &Row) -> bool {
    match row.text("MIN") {
        Some(min) => !min.trim().is_empty() && min.trim() != "0:00",
        None => false,
    }
}

fn player_ref(row: &Row) -> Option<PlayerRef> {
    Some(PlayerRef {
        id: row.non_empty("PLAYER_ID")?,
        name: row.non_empty("PLAYER_NAME"),
        team_id: row.non_empty("TEAM_ID")?,
    })
}

pub fn player_game_stats(sets: &ResultSets, game: &GameRef) -> Vec<(PlayerRef, PlayerGameStats)> {
    sets.rows(PLAYER_STATS)
        .iter()
        .filter(|row| played(row))
        .filter_map(|row| {
            let player = player_ref(row)?;
            let stats = PlayerGameStats {
                player_id: player.id.clone(),
                game_id: game.id.clone(),
                team_id: player.team_id.clone(),
                minutes_played: minutes_to_decimal(row.text("MIN").as_deref()),
                points: row.count("PTS"),
                line: shooting_line(row),
                started: row.non_empty("START_POSITION").is_some(),
                venue: Venue::of(&player.team_id, &game.home_team_id),
            };
            Some((player, stats))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Advanced box score
// ---------------------------------------------------------------------------

fn efficiency(row: &Row, turnover_field: &str) -> Efficiency {
    Efficiency {
        offensive_rating: row.rate("OFF_RATING"),
        defensive_rating: row.rate("DEF_RATING"),
        net_rating: row.rate("NET_RATING"),
        assist_percentage: row.rate("AST_PCT"),
        assist_turnover_ratio: row.rate("AST_TO"),
        offensive_rebound_percentage: row.rate("OREB_PCT"),
        defensive_rebound_percentage: row.rate("DREB_PCT"),
        rebound_percentage: row.rate("REB_PCT"),
        turnover_percentage: row.rate(turnover_field),
        effective_field_goal_percentage: row.rate("EFG_PCT"),
        true_shooting_percentage: row.rate("TS_PCT"),
        pace: row.rate("PACE"),
        pie: row.rate("PIE"),
    }
}

pub fn team_advanced_stats(sets: &ResultSets, game: &GameRef) -> Vec<TeamAdvancedStats> {
    sets.rows(TEAM_STATS)
        .iter()
        .filter_map(|row| {
            let team_id = row.non_empty("TEAM_ID")?;
            Some(TeamAdvancedStats {
                venue: Venue::of(&team_id, &game.home_team_id),
                team_id,
                game_id: game.id.clone(),
                efficiency: efficiency(row, "TM_TOV_PCT"),
            })
        })
        .collect()
}

pub fn player_advanced_stats(
    sets: &ResultSets,
    game: &GameRef,
) -> Vec<(PlayerRef, PlayerAdvancedStats)> {
    sets.rows(PLAYER_STATS)
        .iter()
        .filter(|row| played(row))
        .filter_map(|row| {
            let player = player_ref(row)?;
            let stats = PlayerAdvancedStats {
                player_id: player.id.clone(),
                game_id: game.id.clone(),
                team_id: player.team_id.clone(),
                efficiency: efficiency(row, "TOV_PCT"),
                assist_ratio: row.rate("AST_RATIO"),
                usage_percentage: row.rate("USG_PCT"),
                venue: Venue::of(&player.team_id, &game.home_team_id),
            };
            Some((player, stats))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

/// First `CommonPlayerInfo` row, if the payload has one.
pub fn player_detail(sets: &ResultSets, today: NaiveDate) -> Option<PlayerDetail> {
    let rows = sets.rows(COMMON_PLAYER_INFO);
    let row = rows.first()?;
    Some(PlayerDetail {
        name: row.non_empty("DISPLAY_FIRST_LAST"),
        listed_team_id: row.text("TEAM_ID"),
        age: age_from_birthdate(row.text("BIRTHDATE").as_deref(), today),
        position: normalize_position(row.text("POSITION").as_deref()),
        height_inches: height_to_inches(row.text("HEIGHT").as_deref()),
        weight_pounds: parse_weight(row.text("WEIGHT").as_deref()),
        years_experience: parse_experience(row.text("SEASON_EXP").as_deref()),
    })
}

pub fn roster_players(sets: &ResultSets, team_id: &str) -> Vec<Player> {
    sets.rows(COMMON_TEAM_ROSTER)
        .iter()
        .filter_map(|row| {
            let id = row.non_empty("PLAYER_ID")?;
            Some(Player {
                name: row.non_empty("PLAYER").unwrap_or_else(|| format!("Player {id}")),
                id,
                team_id: Some(team_id.to_string()),
                age: row.int("AGE").and_then(|a| i32::try_from(a).ok()),
                position: normalize_position(row.text("POSITION").as_deref()),
                height_inches: height_to_inches(row.text("HEIGHT").as_deref()),
                weight_pounds: parse_weight(row.text("WEIGHT").as_deref()),
                years_experience: parse_experience(row.text("EXP").as_deref()),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Career
// ---------------------------------------------------------------------------

fn totals(row: &Row) -> Totals {
    Totals {
        games_played: row.count("GP"),
        games_started: row.count("GS"),
        minutes_played: row.rate("MIN"),
        field_goals_made: row.count("FGM"),
        field_goals_attempted: row.count("FGA"),
        field_goal_percentage: row.rate("FG_PCT"),
        three_pointers_made: row.count("FG3M"),
        three_pointers_attempted: row.count("FG3A"),
        three_point_percentage: row.rate("FG3_PCT"),
        free_throws_made: row.count("FTM"),
        free_throws_attempted: row.count("FTA"),
        free_throw_percentage: row.rate("FT_PCT"),
        offensive_rebounds: row.count("OREB"),
        defensive_rebounds: row.count("DREB"),
        total_rebounds: row.count("REB"),
        assists: row.count("AST"),
        steals: row.count("STL"),
        blocks: row.count("BLK"),
        turnovers: row.count("TOV"),
        personal_fouls: row.count("PF"),
        points: row.count("PTS"),
    }
}

/// Rank columns appear as `RANK_PTS` on current payloads and `PTS_RANK` on
/// older ones.
fn rank(row: &Row, stat: &str) -> Option<i32> {
    rank_value(
        row.value(&format!("RANK_{stat}"))
            .or_else(|| row.value(&format!("{stat}_RANK"))),
    )
}

fn ranks(row: &Row) -> Ranks {
    Ranks {
        games_played: rank(row, "GP"),
        games_started: rank(row, "GS"),
        minutes_played: rank(row, "MIN"),
        field_goals_made: rank(row, "FGM"),
        field_goals_attempted: rank(row, "FGA"),
        field_goal_percentage: rank(row, "FG_PCT"),
        three_pointers_made: rank(row, "FG3M"),
        three_pointers_attempted: rank(row, "FG3A"),
        three_point_percentage: rank(row, "FG3_PCT"),
        free_throws_made: rank(row, "FTM"),
        free_throws_attempted: rank(row, "FTA"),
        free_throw_percentage: rank(row, "FT_PCT"),
        offensive_rebounds: rank(row, "OREB"),
        defensive_rebounds: rank(row, "DREB"),
        total_rebounds: rank(row, "REB"),
        assists: rank(row, "AST"),
        steals: rank(row, "STL"),
        blocks: rank(row, "BLK"),
        turnovers: rank(row, "TOV"),
        personal_fouls: rank(row, "PF"),
        points: rank(row, "PTS"),
    }
}

/// Season-scoped columns common to totals and rankings, or `None` for the
/// combined multi-team row.
struct SeasonKey {
    season_id: String,
    league_id: String,
    team_id: Option<String>,
    team_abbreviation: String,
    player_age: Option<i32>,
}

fn season_key(row: &Row, player_id: &str) -> Option<SeasonKey> {
    let team_abbreviation = row.text("TEAM_ABBREVIATION").unwrap_or_default();
    let season_id = row.text("SEASON_ID").unwrap_or_default();
    if team_abbreviation == COMBINED_TEAM {
        debug!("skipping {COMBINED_TEAM} row for player {player_id} in {season_id}");
        return None;
    }
    Some(SeasonKey {
        season_id,
        league_id: row.text("LEAGUE_ID").unwrap_or_else(|| DEFAULT_LEAGUE.into()),
        team_id: row.non_empty("TEAM_ID").filter(|t| t != "0"),
        team_abbreviation,
        player_age: rank_value(row.value("PLAYER_AGE")),
    })
}

fn season_totals(sets: &ResultSets, table: &str, player_id: &str) -> Vec<SeasonTotals> {
    sets.rows(table)
        .iter()
        .filter_map(|row| {
            let key = season_key(row, player_id)?;
            Some(SeasonTotals {
                player_id: player_id.to_string(),
                season_id: key.season_id,
                league_id: key.league_id,
                team_id: key.team_id,
                team_abbreviation: key.team_abbreviation,
                player_age: key.player_age,
                totals: totals(row),
            })
        })
        .collect()
}

fn career_totals(sets: &ResultSets, table: &str, player_id: &str) -> Option<CareerTotals> {
    let rows = sets.rows(table);
    let row = rows.first()?;
    Some(CareerTotals {
        player_id: player_id.to_string(),
        league_id: row.text("LEAGUE_ID").unwrap_or_else(|| DEFAULT_LEAGUE.into()),
        totals: totals(row),
    })
}

fn season_rankings(sets: &ResultSets, table: &str, player_id: &str) -> Vec<SeasonRankings> {
    sets.rows(table)
        .iter()
        .filter_map(|row| {
            let key = season_key(row, player_id)?;
            Some(SeasonRankings {
                player_id: player_id.to_string(),
                season_id: key.season_id,
                league_id: key.league_id,
                team_id: key.team_id,
                team_abbreviation: key.team_abbreviation,
                player_age: key.player_age,
                ranks: ranks(row),
            })
        })
        .collect()
}

pub fn career_stats(sets: &ResultSets, player_id: &str) -> CareerStats {
    CareerStats {
        season_totals_regular: season_totals(sets, SEASON_TOTALS_REGULAR, player_id),
        season_totals_playoffs: season_totals(sets, SEASON_TOTALS_POST, player_id),
        career_totals_regular: career_totals(sets, CAREER_TOTALS_REGULAR, player_id),
        career_totals_playoffs: career_totals(sets, CAREER_TOTALS_POST, player_id),
        season_rankings_regular: season_rankings(sets, SEASON_RANKINGS_REGULAR, player_id),
        season_rankings_playoffs: season_rankings(sets, SEASON_RANKINGS_POST, player_id),
    }
}
