//! Per-hero stats to hero table.

use tracing::warn;

use super::{DecodeError, UnknownHeroPolicy};
use crate::calculate::win_percentage;
use crate::models::{HeroRow, RawHeroStat};
use crate::reference::HeroCatalog;

/// Resolve a hero id to its display name under the given policy.
pub fn resolve_hero_name(
    hero_id: u32,
    catalog: &HeroCatalog,
    policy: UnknownHeroPolicy,
) -> Result<String, DecodeError> {
    match catalog.name(hero_id) {
        Some(name) => Ok(name.to_string()),
        None => match policy {
            UnknownHeroPolicy::Placeholder => {
                warn!("Hero id {} not in catalog, using placeholder", hero_id);
                Ok(UnknownHeroPolicy::placeholder_name(hero_id))
            }
            UnknownHeroPolicy::Fail => Err(DecodeError::UnknownHero { hero_id }),
        },
    }
}

/// Map one raw hero stat onto a table row.
pub fn transform_hero(
    raw: &RawHeroStat,
    catalog: &HeroCatalog,
    policy: UnknownHeroPolicy,
) -> Result<HeroRow, DecodeError> {
    Ok(HeroRow {
        hero: resolve_hero_name(raw.hero_id, catalog, policy)?,
        games: raw.games,
        win: raw.win,
        win_pct: win_percentage(raw.win, raw.games),
        games_with: raw.with_games,
        wins_with: raw.with_win,
        games_against: raw.against_games,
        win_against_pct: win_percentage(raw.against_win, raw.against_games),
        wins_against: raw.against_win,
    })
}

/// Build the hero table. One row per raw record, in input order.
pub fn build_hero_table(
    raw: &[RawHeroStat],
    catalog: &HeroCatalog,
    policy: UnknownHeroPolicy,
) -> Result<Vec<HeroRow>, DecodeError> {
    raw.iter()
        .map(|h| transform_hero(h, catalog, policy))
        .collect()
}
