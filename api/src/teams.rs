//! Static NBA franchise list. stats.nba.com has no endpoint for this; the ids
//! are stable and shared by every other endpoint.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticTeam {
    pub id: &'static str,
    pub abbreviation: &'static str,
    pub full_name: &'static str,
    pub city: &'static str,
    pub conference: &'static str,
    pub division: &'static str,
}

const fn team(
    id: &'static str,
    abbreviation: &'static str,
    full_name: &'static str,
    city: &'static str,
    conference: &'static str,
    division: &'static str,
) -> StaticTeam {
    StaticTeam { id, abbreviation, full_name, city, conference, division }
}

pub const TEAMS: [StaticTeam; 30] = [
    team("1610612737", "ATL", "Atlanta Hawks", "Atlanta", "Eastern", "Southeast"),
    team("1610612738", "BOS", "Boston Celtics", "Boston", "Eastern", "Atlantic"),
    team("1610612739", "CLE", "Cleveland Cavaliers", "Cleveland", "Eastern", "Central"),
    team("1610612740", "NOP", "New Orleans Pelicans", "New Orleans", "Western", "Southwest"),
    team("1610612741", "CHI", "Chicago Bulls", "Chicago", "Eastern", "Central"),
    team("1610612742", "DAL", "Dallas Mavericks", "Dallas", "Western", "Southwest"),
    team("1610612743", "DEN", "Denver Nuggets", "Denver", "Western", "Northwest"),
    team("1610612744", "GSW", "Golden State Warriors", "Golden State", "Western", "Pacific"),
    team("1610612745", "HOU", "Houston Rockets", "Houston", "Western", "Southwest"),
    team("1610612746", "LAC", "Los Angeles Clippers", "Los Angeles", "Western", "Pacific"),
    team("1610612747", "LAL", "Los Angeles Lakers", "Los Angeles", "Western", "Pacific"),
    team("1610612748", "MIA", "Miami Heat", "Miami", "Eastern", "Southeast"),
    team("1610612749", "MIL", "Milwaukee Bucks", "Milwaukee", "Eastern", "Central"),
    team("1610612750", "MIN", "Minnesota Timberwolves", "Minnesota", "Western", "Northwest"),
    team("1610612751", "BKN", "Brooklyn Nets", "Brooklyn", "Eastern", "Atlantic"),
    team("1610612752", "NYK", "New York Knicks", "New York", "Eastern", "Atlantic"),
    team("1610612753", "ORL", "Orlando Magic", "Orlando", "Eastern", "Southeast"),
    team("1610612754", "IND", "Indiana Pacers", "Indiana", "Eastern", "Central"),
    team("1610612755", "PHI", "Philadelphia 76ers", "Philadelphia", "Eastern", "Atlantic"),
    team("1610612756", "PHX", "Phoenix Suns", "Phoenix", "Western", "Pacific"),
    team("1610612757", "POR", "Portland Trail Blazers", "Portland", "Western", "Northwest"),
    team("1610612758", "SAC", "Sacramento Kings", "Sacramento", "Western", "Pacific"),
    team("1610612759", "SAS", "San Antonio Spurs", "San Antonio", "Western", "Southwest"),
    team("1610612760", "OKC", "Oklahoma City Thunder", "Oklahoma City", "Western", "Northwest"),
    team("1610612761", "TOR", "Toronto Raptors", "Toronto", "Eastern", "Atlantic"),
    team("1610612762", "UTA", "Utah Jazz", "Utah", "Western", "Northwest"),
    team("1610612763", "MEM", "Memphis Grizzlies", "Memphis", "Western", "Southwest"),
    team("1610612764", "WAS", "Washington Wizards", "Washington", "Eastern", "Southeast"),
    team("1610612765", "DET", "Detroit Pistons", "Detroit", "Eastern", "Central"),
    team("1610612766", "CHA", "Charlotte Hornets", "Charlotte", "Eastern", "Southeast"),
];

pub fn all() -> &'static [StaticTeam] {
    &TEAMS
}
