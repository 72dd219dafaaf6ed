//! Display-ready tables derived from the raw records.
//!
//! Field names serialize to the column headings the dashboard shows.

use serde::{Deserialize, Serialize};

/// Which side of the map a player was on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Radiant,
    Dire,
}

impl Side {
    /// Decode a player slot. Slots below 128 belong to Radiant.
    pub fn from_player_slot(slot: u32) -> Self {
        if slot < 128 {
            Side::Radiant
        } else {
            Side::Dire
        }
    }

    /// Decode the radiant-win flag. An absent flag counts as a Dire win.
    pub fn winner(radiant_win: Option<bool>) -> Self {
        if radiant_win == Some(true) {
            Side::Radiant
        } else {
            Side::Dire
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Radiant => write!(f, "Radiant"),
            Side::Dire => write!(f, "Dire"),
        }
    }
}

/// Match outcome from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Win,
    Loss,
}

impl MatchResult {
    pub fn from_sides(side: Side, winner: Side) -> Self {
        if side == winner {
            MatchResult::Win
        } else {
            MatchResult::Loss
        }
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchResult::Win => write!(f, "Win"),
            MatchResult::Loss => write!(f, "Loss"),
        }
    }
}

/// Skill bracket of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillLevel {
    Normal,
    High,
    #[serde(rename = "Very high")]
    VeryHigh,
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl SkillLevel {
    /// Decode the API's bracket code. Anything but 1, 2 or 3 is `N/A`.
    pub fn from_code(code: Option<f64>) -> Self {
        match code {
            Some(c) if c == 1.0 => SkillLevel::Normal,
            Some(c) if c == 2.0 => SkillLevel::High,
            Some(c) if c == 3.0 => SkillLevel::VeryHigh,
            _ => SkillLevel::NotAvailable,
        }
    }
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkillLevel::Normal => write!(f, "Normal"),
            SkillLevel::High => write!(f, "High"),
            SkillLevel::VeryHigh => write!(f, "Very high"),
            SkillLevel::NotAvailable => write!(f, "N/A"),
        }
    }
}

/// One row of the match table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRow {
    #[serde(rename = "Match ID")]
    pub match_id: u64,

    #[serde(rename = "Side")]
    pub side: Side,

    #[serde(rename = "Winner")]
    pub winner: Side,

    /// Numeric hero id as reported by the match history.
    #[serde(rename = "Hero")]
    pub hero_id: u32,

    /// Resolved hero name, when the catalog knows the id.
    #[serde(rename = "Hero name")]
    pub hero_name: Option<String>,

    #[serde(rename = "Match date")]
    pub match_date: String,

    #[serde(rename = "Duration")]
    pub duration: String,

    #[serde(rename = "Game mode")]
    pub game_mode: String,

    #[serde(rename = "Kills")]
    pub kills: u32,

    #[serde(rename = "Deaths")]
    pub deaths: u32,

    #[serde(rename = "Assists")]
    pub assists: u32,

    #[serde(rename = "Skill level")]
    pub skill_level: SkillLevel,

    #[serde(rename = "Result")]
    pub result: MatchResult,
}

impl MatchRow {
    pub fn is_win(&self) -> bool {
        self.result == MatchResult::Win
    }
}

/// One row of the hero table. Field order is the display column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroRow {
    #[serde(rename = "Hero")]
    pub hero: String,

    #[serde(rename = "Games")]
    pub games: u32,

    #[serde(rename = "Win")]
    pub win: u32,

    #[serde(rename = "Win %")]
    pub win_pct: f64,

    #[serde(rename = "Games with")]
    pub games_with: u32,

    #[serde(rename = "Wins with")]
    pub wins_with: u32,

    #[serde(rename = "Games against")]
    pub games_against: u32,

    #[serde(rename = "Win against %")]
    pub win_against_pct: f64,

    #[serde(rename = "Wins against")]
    pub wins_against: u32,
}

/// A teammate ranked by games played together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerGames {
    #[serde(rename = "Nickname")]
    pub name: String,

    #[serde(rename = "Games")]
    pub games: u32,
}

/// A teammate ranked by wins together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerWins {
    #[serde(rename = "Nickname")]
    pub name: String,

    #[serde(rename = "Wins")]
    pub wins: u32,
}

/// A single match on a hero, for the per-hero history view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroMatch {
    #[serde(rename = "Hero")]
    pub hero: String,

    #[serde(rename = "Match date")]
    pub match_date: String,

    #[serde(rename = "Kills")]
    pub kills: u32,

    #[serde(rename = "Deaths")]
    pub deaths: u32,

    #[serde(rename = "Assists")]
    pub assists: u32,
}

/// All matches played on one of the most-played heroes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroMatchHistory {
    pub hero: String,
    pub matches: Vec<HeroMatch>,
}
