//! Scalar summaries and the bundle handed to the presentation layer.

use serde::{Deserialize, Serialize};

use super::{HeroMatchHistory, HeroRow, MatchRow, PeerGames, PeerWins, RawProfile};

/// Career totals over the match table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregates {
    pub match_count: u32,
    pub wins: u32,
    pub losses: u32,
    pub total_kills: u64,
    pub total_deaths: u64,
    pub total_assists: u64,
}

/// Matches per side, for the side distribution chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideDistribution {
    pub radiant: u32,
    pub dire: u32,
}

/// Player identity shown in the dashboard header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub account_id: Option<u64>,
    pub persona_name: Option<String>,
    pub avatar_url: Option<String>,
    pub profile_url: Option<String>,
    pub rank_tier: Option<u32>,
    pub leaderboard_rank: Option<u32>,
}

impl From<RawProfile> for PlayerSummary {
    fn from(raw: RawProfile) -> Self {
        let info = raw.profile.unwrap_or_default();
        Self {
            account_id: info.account_id,
            persona_name: info.personaname,
            avatar_url: info.avatarfull,
            profile_url: info.profileurl,
            rank_tier: raw.rank_tier,
            leaderboard_rank: raw.leaderboard_rank,
        }
    }
}

/// Everything one dashboard render needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub player_id: String,
    pub player: PlayerSummary,
    pub matches: Vec<MatchRow>,
    pub heroes: Vec<HeroRow>,
    pub top_heroes_by_games: Vec<HeroRow>,
    pub top_heroes_by_win_rate: Vec<HeroRow>,
    pub top_friends: Vec<PeerGames>,
    pub top_winning_friends: Vec<PeerWins>,
    pub aggregates: Aggregates,
    pub sides: SideDistribution,
    pub top_hero_matches: Vec<HeroMatchHistory>,
}
