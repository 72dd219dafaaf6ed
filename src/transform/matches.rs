//! Match history to match table.

use chrono::DateTime;

use super::NOT_AVAILABLE;
use crate::models::{MatchResult, MatchRow, RawMatch, Side, SkillLevel};
use crate::reference::{GameModeCatalog, ReferenceData};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Format a duration as `HH:MM:SS`. Missing durations count as zero and
/// anything past a day wraps around.
pub fn format_duration(seconds: Option<u64>) -> String {
    let secs = seconds.unwrap_or(0) % SECONDS_PER_DAY;
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

/// Format an epoch timestamp as `YYYY-MM-DD HH:MM` in UTC.
pub fn format_match_date(start_time: Option<i64>) -> String {
    start_time
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Catalog name for a game mode; unknown ids pass through as numbers.
pub fn decode_game_mode(mode_id: Option<u32>, catalog: &GameModeCatalog) -> String {
    match mode_id {
        Some(id) => catalog
            .name(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string()),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Map one raw match onto a table row.
pub fn transform_match(raw: &RawMatch, reference: &ReferenceData) -> MatchRow {
    let side = Side::from_player_slot(raw.player_slot);
    let winner = Side::winner(raw.radiant_win);

    MatchRow {
        match_id: raw.match_id,
        side,
        winner,
        hero_id: raw.hero_id,
        hero_name: reference.heroes.name(raw.hero_id).map(str::to_string),
        match_date: format_match_date(raw.start_time),
        duration: format_duration(raw.duration),
        game_mode: decode_game_mode(raw.game_mode, &reference.game_modes),
        kills: raw.kills,
        deaths: raw.deaths,
        assists: raw.assists,
        skill_level: SkillLevel::from_code(raw.skill),
        result: MatchResult::from_sides(side, winner),
    }
}

/// Build the match table. One row per raw match, in input order.
pub fn build_match_table(raw: &[RawMatch], reference: &ReferenceData) -> Vec<MatchRow> {
    raw.iter().map(|m| transform_match(m, reference)).collect()
}
