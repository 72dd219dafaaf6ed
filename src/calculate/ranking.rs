//! Top-N selections over heroes and teammates.
//!
//! Every ranking is a stable descending sort: rows with equal keys keep their
//! original relative order. Source slices are never reordered.

use std::cmp::Reverse;

use crate::models::{HeroMatch, HeroMatchHistory, HeroRow, MatchRow, PeerGames, PeerWins, RawPeer};
use crate::transform::UnknownHeroPolicy;

/// Number of heroes shown in the hero charts.
pub const TOP_HEROES: usize = 10;

/// Number of teammates shown in the friend charts.
pub const TOP_PEERS: usize = 3;

fn top_n_by_key<T, K, F>(items: &[T], n: usize, key: F) -> Vec<&T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut ranked: Vec<&T> = items.iter().collect();
    ranked.sort_by_key(|item| Reverse(key(item)));
    ranked.truncate(n);
    ranked
}

/// Most-played heroes, by games descending.
pub fn top_by_games(heroes: &[HeroRow], n: usize) -> Vec<&HeroRow> {
    top_n_by_key(heroes, n, |h| h.games)
}

/// Best heroes by win percentage, descending.
pub fn top_by_win_rate(heroes: &[HeroRow], n: usize) -> Vec<&HeroRow> {
    let mut ranked: Vec<&HeroRow> = heroes.iter().collect();
    ranked.sort_by(|a, b| b.win_pct.total_cmp(&a.win_pct));
    ranked.truncate(n);
    ranked
}

/// Teammates with the most games played together.
pub fn top_friends(peers: &[RawPeer], n: usize) -> Vec<PeerGames> {
    top_n_by_key(peers, n, |p| p.with_games)
        .into_iter()
        .map(|p| PeerGames {
            name: p.display_name(),
            games: p.with_games,
        })
        .collect()
}

/// Teammates with the most wins together.
pub fn top_winning_friends(peers: &[RawPeer], n: usize) -> Vec<PeerWins> {
    top_n_by_key(peers, n, |p| p.with_win)
        .into_iter()
        .map(|p| PeerWins {
            name: p.display_name(),
            wins: p.with_win,
        })
        .collect()
}

/// Matches played on each of the given heroes, in match table order.
pub fn hero_match_history(matches: &[MatchRow], heroes: &[&HeroRow]) -> Vec<HeroMatchHistory> {
    heroes
        .iter()
        .map(|hero| HeroMatchHistory {
            hero: hero.hero.clone(),
            matches: matches
                .iter()
                .filter(|m| match_hero_name(m) == hero.hero)
                .map(|m| HeroMatch {
                    hero: hero.hero.clone(),
                    match_date: m.match_date.clone(),
                    kills: m.kills,
                    deaths: m.deaths,
                    assists: m.assists,
                })
                .collect(),
        })
        .collect()
}

/// The name a match row's hero would carry in the hero table.
fn match_hero_name(row: &MatchRow) -> String {
    row.hero_name
        .clone()
        .unwrap_or_else(|| UnknownHeroPolicy::placeholder_name(row.hero_id))
}
