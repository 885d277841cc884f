//! Table definitions. Every statement is `IF NOT EXISTS`, so `create` runs on
//! every connect.

use sqlx::SqlitePool;

const TIMESTAMPS: &str = "
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP";

const SHOOTING: &str = "
    field_goals_made INTEGER NOT NULL,
    field_goals_attempted INTEGER NOT NULL,
    field_goal_percentage REAL NOT NULL,
    three_pointers_made INTEGER NOT NULL,
    three_pointers_attempted INTEGER NOT NULL,
    three_point_percentage REAL NOT NULL,
    free_throws_made INTEGER NOT NULL,
    free_throws_attempted INTEGER NOT NULL,
    free_throw_percentage REAL NOT NULL,
    offensive_rebounds INTEGER NOT NULL,
    defensive_rebounds INTEGER NOT NULL,
    total_rebounds INTEGER NOT NULL,
    assists INTEGER NOT NULL,
    steals INTEGER NOT NULL,
    blocks INTEGER NOT NULL,
    turnovers INTEGER NOT NULL,
    personal_fouls INTEGER NOT NULL,
    plus_minus REAL NOT NULL";

const EFFICIENCY: &str = "
    offensive_rating REAL NOT NULL,
    defensive_rating REAL NOT NULL,
    net_rating REAL NOT NULL,
    assist_percentage REAL NOT NULL,
    assist_turnover_ratio REAL NOT NULL,
    offensive_rebound_percentage REAL NOT NULL,
    defensive_rebound_percentage REAL NOT NULL,
    rebound_percentage REAL NOT NULL,
    turnover_percentage REAL NOT NULL,
    effective_field_goal_percentage REAL NOT NULL,
    true_shooting_percentage REAL NOT NULL,
    pace REAL NOT NULL,
    pie REAL NOT NULL";

const TOTALS: &str = "
    games_played INTEGER NOT NULL,
    games_started INTEGER NOT NULL,
    minutes_played REAL NOT NULL,
    field_goals_made INTEGER NOT NULL,
    field_goals_attempted INTEGER NOT NULL,
    field_goal_percentage REAL NOT NULL,
    three_pointers_made INTEGER NOT NULL,
    three_pointers_attempted INTEGER NOT NULL,
    three_point_percentage REAL NOT NULL,
    free_throws_made INTEGER NOT NULL,
    free_throws_attempted INTEGER NOT NULL,
    free_throw_percentage REAL NOT NULL,
    offensive_rebounds INTEGER NOT NULL,
    defensive_rebounds INTEGER NOT NULL,
    total_rebounds INTEGER NOT NULL,
    assists INTEGER NOT NULL,
    steals INTEGER NOT NULL,
    blocks INTEGER NOT NULL,
    turnovers INTEGER NOT NULL,
    personal_fouls INTEGER NOT NULL,
    points INTEGER NOT NULL";

const RANKS: &str = "
    games_played_rank INTEGER,
    games_started_rank INTEGER,
    minutes_played_rank INTEGER,
    field_goals_made_rank INTEGER,
    field_goals_attempted_rank INTEGER,
    field_goal_percentage_rank INTEGER,
    three_pointers_made_rank INTEGER,
    three_pointers_attempted_rank INTEGER,
    three_point_percentage_rank INTEGER,
    free_throws_made_rank INTEGER,
    free_throws_attempted_rank INTEGER,
    free_throw_percentage_rank INTEGER,
    offensive_rebounds_rank INTEGER,
    defensive_rebounds_rank INTEGER,
    total_rebounds_rank INTEGER,
    assists_rank INTEGER,
    steals_rank INTEGER,
    blocks_rank INTEGER,
    turnovers_rank INTEGER,
    personal_fouls_rank INTEGER,
    points_rank INTEGER";

/// Delete order for a full reset: dependents before the rows they point at.
pub const ALL_TABLES_CHILDREN_FIRST: [&str; 13] = [
    "player_season_rankings_playoffs",
    "player_season_rankings_regular",
    "player_career_totals_playoffs",
    "player_career_totals_regular",
    "player_season_totals_playoffs",
    "player_season_totals_regular",
    "player_advanced_stats",
    "team_advanced_stats",
    "player_game_stats",
    "team_game_stats",
    "games",
    "players",
    "teams",
];

/// Everything that references `players`, then `players` itself.
pub const PLAYER_TABLES_CHILDREN_FIRST: [&str; 9] = [
    "player_season_rankings_playoffs",
    "player_season_rankings_regular",
    "player_career_totals_playoffs",
    "player_career_totals_regular",
    "player_season_totals_playoffs",
    "player_season_totals_regular",
    "player_advanced_stats",
    "player_game_stats",
    "players",
];

fn statements() -> Vec<String> {
    let mut ddl = vec![
        format!(
            "CREATE TABLE IF NOT EXISTS teams (
                id TEXT PRIMARY KEY,
                team_code TEXT NOT NULL,
                team_name TEXT NOT NULL,
                city TEXT NOT NULL,
                conference TEXT NOT NULL,
                division TEXT NOT NULL,{TIMESTAMPS}
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS players (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                team_id TEXT REFERENCES teams(id),
                age INTEGER,
                position TEXT NOT NULL CHECK (length(position) <= 10),
                height_inches INTEGER NOT NULL,
                weight_pounds INTEGER NOT NULL,
                years_experience INTEGER NOT NULL,{TIMESTAMPS}
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS games (
                id TEXT PRIMARY KEY,
                game_date TEXT NOT NULL,
                season TEXT NOT NULL,
                status TEXT NOT NULL CHECK (status IN ('scheduled', 'in_progress', 'completed')),
                game_type TEXT NOT NULL CHECK (game_type IN ('preseason', 'regular', 'playoff')),
                home_team_id TEXT NOT NULL REFERENCES teams(id),
                away_team_id TEXT NOT NULL REFERENCES teams(id),
                home_score INTEGER,
                away_score INTEGER,
                home_team_game_number INTEGER,
                away_team_game_number INTEGER,
                home_team_game_type_number INTEGER,
                away_team_game_type_number INTEGER,{TIMESTAMPS}
            )"
        ),
        "CREATE INDEX IF NOT EXISTS idx_games_date ON games (game_date)".to_string(),
        "CREATE INDEX IF NOT EXISTS idx_games_season ON games (season, status)".to_string(),
        format!(
            "CREATE TABLE IF NOT EXISTS team_game_stats (
                team_id TEXT NOT NULL REFERENCES teams(id),
                game_id TEXT NOT NULL REFERENCES games(id),
                points INTEGER NOT NULL,
                opponent_points INTEGER NOT NULL,
                win INTEGER NOT NULL,{SHOOTING},
                venue TEXT NOT NULL,{TIMESTAMPS},
                PRIMARY KEY (team_id, game_id)
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS player_game_stats (
                player_id TEXT NOT NULL REFERENCES players(id),
                game_id TEXT NOT NULL REFERENCES games(id),
                team_id TEXT NOT NULL REFERENCES teams(id),
                minutes_played REAL NOT NULL,
                points INTEGER NOT NULL,{SHOOTING},
                started INTEGER NOT NULL,
                venue TEXT NOT NULL,{TIMESTAMPS},
                PRIMARY KEY (player_id, game_id)
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS team_advanced_stats (
                team_id TEXT NOT NULL REFERENCES teams(id),
                game_id TEXT NOT NULL REFERENCES games(id),{EFFICIENCY},
                venue TEXT NOT NULL,{TIMESTAMPS},
                PRIMARY KEY (team_id, game_id)
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS player_advanced_stats (
                player_id TEXT NOT NULL REFERENCES players(id),
                game_id TEXT NOT NULL REFERENCES games(id),
                team_id TEXT NOT NULL REFERENCES teams(id),{EFFICIENCY},
                assist_ratio REAL NOT NULL,
                usage_percentage REAL NOT NULL,
                venue TEXT NOT NULL,{TIMESTAMPS},
                PRIMARY KEY (player_id, game_id)
            )"
        ),
    ];

    for kind in ["regular", "playoffs"] {
        ddl.push(format!(
            "CREATE TABLE IF NOT EXISTS player_season_totals_{kind} (
                player_id TEXT NOT NULL REFERENCES players(id),
                season_id TEXT NOT NULL,
                league_id TEXT NOT NULL,
                team_id TEXT,
                team_abbreviation TEXT NOT NULL,
                player_age INTEGER,{TOTALS},{TIMESTAMPS},
                PRIMARY KEY (player_id, season_id, team_abbreviation)
            )"
        ));
        ddl.push(format!(
            "CREATE TABLE IF NOT EXISTS player_career_totals_{kind} (
                player_id TEXT PRIMARY KEY REFERENCES players(id),
                league_id TEXT NOT NULL,{TOTALS},{TIMESTAMPS}
            )"
        ));
        ddl.push(format!(
            "CREATE TABLE IF NOT EXISTS player_season_rankings_{kind} (
                player_id TEXT NOT NULL REFERENCES players(id),
                season_id TEXT NOT NULL,
                league_id TEXT NOT NULL,
                team_id TEXT,
                team_abbreviation TEXT NOT NULL,
                player_age INTEGER,{RANKS},{TIMESTAMPS},
                PRIMARY KEY (player_id, season_id, team_abbreviation)
            )"
        ));
    }
    ddl
}

pub async fn create(pool: &SqlitePool) -> sqlx::Result<()> {
    for statement in statements() {
        sqlx::query(&statement).execute(pool).await?;
    }
    Ok(())
}
