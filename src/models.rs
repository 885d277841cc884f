use chrono::NaiveDate;
use nba_stats_api::teams::StaticTeam;

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub id: String,
    pub code: String,
    pub name: String,
    pub city: String,
    pub conference: String,
    pub division: String,
}

impl From<&StaticTeam> for Team {
    fn from(team: &StaticTeam) -> Self {
        Self {
            id: team.id.to_string(),
            code: team.abbreviation.to_string(),
            name: team.full_name.to_string(),
            city: team.city.to_string(),
            conference: team.conference.to_string(),
            division: team.division.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub team_id: Option<String>,
    pub age: Option<i32>,
    pub position: String,
    pub height_inches: i32,
    pub weight_pounds: i32,
    pub years_experience: i32,
}

// ---------------------------------------------------------------------------
// Games
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
}

impl GameStatus {
    /// `GAME_STATUS_ID` from the scoreboard.
    pub fn from_status_id(id: Option<i64>) -> Self {
        match id {
            Some(2) => GameStatus::InProgress,
            Some(3) => GameStatus::Completed,
            _ => GameStatus::Scheduled,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "scheduled",
            GameStatus::InProgress => "in_progress",
            GameStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GameType {
    Preseason,
    #[default]
    Regular,
    Playoff,
}

impl GameType {
    /// The first three digits of a game id encode the competition:
    /// "001" preseason, "002" regular season, "004" playoffs. Anything
    /// else (all-star, play-in) is filed as regular season.
    pub fn from_game_id(game_id: &str) -> Self {
        match game_id.get(..3) {
            Some("001") => GameType::Preseason,
            Some("004") => GameType::Playoff,
            _ => GameType::Regular,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Preseason => "preseason",
            GameType::Regular => "regular",
            GameType::Playoff => "playoff",
        }
    }
}

/// Which side of the game a stats row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Venue {
    Home,
    Away,
}

impl Venue {
    pub fn of(team_id: &str, home_team_id: &str) -> Self {
        if team_id == home_team_id { Venue::Home } else { Venue::Away }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Venue::Home => "Home",
            Venue::Away => "Away",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: String,
    pub date: NaiveDate,
    pub season: String,
    pub home_team_id: String,
    pub away_team_id: String,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub status: GameStatus,
    pub game_type: GameType,
}

impl Game {
    /// Copy final scores out of the team box score. Ignored until the game
    /// is completed.
    pub fn apply_scores(&mut self, team_stats: &[TeamGameStats]) {
        if self.status != GameStatus::Completed {
            return;
        }
        if let Some(home) = team_stats.iter().find(|t| t.venue == Venue::Home) {
            self.home_score = Some(home.points);
            self.away_score = Some(home.opponent_points);
        }
    }

    pub fn reference(&self) -> GameRef {
        GameRef {
            id: self.id.clone(),
            home_team_id: self.home_team_id.clone(),
            away_team_id: self.away_team_id.clone(),
        }
    }
}

/// The slice of a stored game the advanced pass needs.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRef {
    pub id: String,
    pub home_team_id: String,
    pub away_team_id: String,
}

// ---------------------------------------------------------------------------
// Box scores
// ---------------------------------------------------------------------------

/// Counting stats shared by team and player box scores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShootingLine {
    pub field_goals_made: i32,
    pub field_goals_attempted: i32,
    pub field_goal_percentage: f64,
    pub three_pointers_made: i32,
    pub three_pointers_attempted: i32,
    pub three_point_percentage: f64,
    pub free_throws_made: i32,
    pub free_throws_attempted: i32,
    pub free_throw_percentage: f64,
    pub offensive_rebounds: i32,
    pub defensive_rebounds: i32,
    pub total_rebounds: i32,
    pub assists: i32,
    pub steals: i32,
    pub blocks: i32,
    pub turnovers: i32,
    pub personal_fouls: i32,
    pub plus_minus: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamGameStats {
    pub team_id: String,
    pub game_id: String,
    pub points: i32,
    pub opponent_points: i32,
    pub win: bool,
    pub line: ShootingLine,
    pub venue: Venue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerGameStats {
    pub player_id: String,
    pub game_id: String,
    pub team_id: String,
    pub minutes_played: f64,
    pub points: i32,
    pub line: ShootingLine,
    pub started: bool,
    pub venue: Venue,
}

/// Efficiency metrics shared by team and player advanced box scores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Efficiency {
    pub offensive_rating: f64,
    pub defensive_rating: f64,
    pub net_rating: f64,
    pub assist_percentage: f64,
    pub assist_turnover_ratio: f64,
    pub offensive_rebound_percentage: f64,
    pub defensive_rebound_percentage: f64,
    pub rebound_percentage: f64,
    pub turnover_percentage: f64,
    pub effective_field_goal_percentage: f64,
    pub true_shooting_percentage: f64,
    pub pace: f64,
    pub pie: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamAdvancedStats {
    pub team_id: String,
    pub game_id: String,
    pub efficiency: Efficiency,
    pub venue: Venue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerAdvancedStats {
    pub player_id: String,
    pub game_id: String,
    pub team_id: String,
    pub efficiency: Efficiency,
    pub assist_ratio: f64,
    pub usage_percentage: f64,
    pub venue: Venue,
}

// ---------------------------------------------------------------------------
// Career
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonKind {
    Regular,
    Playoffs,
}

impl SeasonKind {
    pub fn suffix(&self) -> &'static str {
        match self {
            SeasonKind::Regular => "regular",
            SeasonKind::Playoffs => "playoffs",
        }
    }
}

/// Totals line shared by season and career aggregates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Totals {
    pub games_played: i32,
    pub games_started: i32,
    pub minutes_played: f64,
    pub field_goals_made: i32,
    pub field_goals_attempted: i32,
    pub field_goal_percentage: f64,
    pub three_pointers_made: i32,
    pub three_pointers_attempted: i32,
    pub three_point_percentage: f64,
    pub free_throws_made: i32,
    pub free_throws_attempted: i32,
    pub free_throw_percentage: f64,
    pub offensive_rebounds: i32,
    pub defensive_rebounds: i32,
    pub total_rebounds: i32,
    pub assists: i32,
    pub steals: i32,
    pub blocks: i32,
    pub turnovers: i32,
    pub personal_fouls: i32,
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonTotals {
    pub player_id: String,
    pub season_id: String,
    pub league_id: String,
    pub team_id: Option<String>,
    pub team_abbreviation: String,
    pub player_age: Option<i32>,
    pub totals: Totals,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CareerTotals {
    pub player_id: String,
    pub league_id: String,
    pub totals: Totals,
}

/// League rank per stat; `None` where the player was not ranked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranks {
    pub games_played: Option<i32>,
    pub games_started: Option<i32>,
    pub minutes_played: Option<i32>,
    pub field_goals_made: Option<i32>,
    pub field_goals_attempted: Option<i32>,
    pub field_goal_percentage: Option<i32>,
    pub three_pointers_made: Option<i32>,
    pub three_pointers_attempted: Option<i32>,
    pub three_point_percentage: Option<i32>,
    pub free_throws_made: Option<i32>,
    pub free_throws_attempted: Option<i32>,
    pub free_throw_percentage: Option<i32>,
    pub offensive_rebounds: Option<i32>,
    pub defensive_rebounds: Option<i32>,
    pub total_rebounds: Option<i32>,
    pub assists: Option<i32>,
    pub steals: Option<i32>,
    pub blocks: Option<i32>,
    pub turnovers: Option<i32>,
    pub personal_fouls: Option<i32>,
    pub points: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonRankings {
    pub player_id: String,
    pub season_id: String,
    pub league_id: String,
    pub team_id: Option<String>,
    pub team_abbreviation: String,
    pub player_age: Option<i32>,
    pub ranks: Ranks,
}

/// Everything one `playercareerstats` call yields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CareerStats {
    pub season_totals_regular: Vec<SeasonTotals>,
    pub season_totals_playoffs: Vec<SeasonTotals>,
    pub career_totals_regular: Option<CareerTotals>,
    pub career_totals_playoffs: Option<CareerTotals>,
    pub season_rankings_regular: Vec<SeasonRankings>,
    pub season_rankings_playoffs: Vec<SeasonRankings>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_type_follows_id_prefix() {
        assert_eq!(GameType::from_game_id("0012300001"), GameType::Preseason);
        assert_eq!(GameType::from_game_id("0022300584"), GameType::Regular);
        assert_eq!(GameType::from_game_id("0042300401"), GameType::Playoff);
        assert_eq!(GameType::from_game_id("0032300001"), GameType::Regular);
        assert_eq!(GameType::from_game_id("00"), GameType::Regular);
    }

    #[test]
    fn status_ids_map_to_lifecycle() {
        assert_eq!(GameStatus::from_status_id(Some(1)), GameStatus::Scheduled);
        assert_eq!(GameStatus::from_status_id(Some(2)), GameStatus::InProgress);
        assert_eq!(GameStatus::from_status_id(Some(3)), GameStatus::Completed);
        assert_eq!(GameStatus::from_status_id(None), GameStatus::Scheduled);
    }

    fn team_line(team_id: &str, points: i32, opponent_points: i32, venue: Venue) -> TeamGameStats {
        TeamGameStats {
            team_id: team_id.into(),
            game_id: "0022300584".into(),
            points,
            opponent_points,
            win: points > opponent_points,
            line: ShootingLine::default(),
            venue,
        }
    }

    fn game(status: GameStatus) -> Game {
        Game {
            id: "0022300584".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            season: "2023".into(),
            home_team_id: "1610612738".into(),
            away_team_id: "1610612752".into(),
            home_score: None,
            away_score: None,
            status,
            game_type: GameType::Regular,
        }
    }

    #[test]
    fn scores_only_land_on_completed_games() {
        let stats = [
            team_line("1610612738", 118, 104, Venue::Home),
            team_line("1610612752", 104, 118, Venue::Away),
        ];

        let mut live = game(GameStatus::InProgress);
        live.apply_scores(&stats);
        assert_eq!(live.home_score, None);

        let mut done = game(GameStatus::Completed);
        done.apply_scores(&stats);
        assert_eq!((done.home_score, done.away_score), (Some(118), Some(104)));
    }
}
