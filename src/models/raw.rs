//! Raw records as returned by the OpenDota API.
//!
//! Every struct here is a fixed-field view of a JSON payload. Fields the
//! dashboard never reads are not modelled; serde skips them.

use serde::{Deserialize, Deserializer, Serialize};

/// One row of `/players/{id}/matches`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMatch {
    pub match_id: u64,

    /// 0-127 for Radiant slots, 128-255 for Dire slots.
    #[serde(default, deserialize_with = "null_as_default")]
    pub player_slot: u32,

    #[serde(default)]
    pub radiant_win: Option<bool>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub hero_id: u32,

    /// Match start, epoch seconds.
    #[serde(default)]
    pub start_time: Option<i64>,

    /// Match duration in seconds.
    #[serde(default)]
    pub duration: Option<u64>,

    #[serde(default)]
    pub game_mode: Option<u32>,

    /// Skill bracket code: 1 normal, 2 high, 3 very high.
    #[serde(default)]
    pub skill: Option<f64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub kills: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub deaths: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub assists: u32,
}

/// One row of `/players/{id}/heroes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHeroStat {
    #[serde(deserialize_with = "hero_id_from_number_or_string")]
    pub hero_id: u32,

    #[serde(default)]
    pub last_played: Option<i64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub games: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub win: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub with_games: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub with_win: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub against_games: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub against_win: u32,
}

/// One row of `/players/{id}/peers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPeer {
    pub account_id: u64,

    #[serde(default)]
    pub personaname: Option<String>,

    /// Games played on the same team.
    #[serde(default, deserialize_with = "null_as_default")]
    pub with_games: u32,

    /// Games won on the same team.
    #[serde(default, deserialize_with = "null_as_default")]
    pub with_win: u32,
}

impl RawPeer {
    /// Display name, falling back to the account id for private profiles.
    pub fn display_name(&self) -> String {
        match self.personaname.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => self.account_id.to_string(),
        }
    }
}

/// `/players/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProfile {
    #[serde(default)]
    pub profile: Option<ProfileInfo>,

    #[serde(default)]
    pub rank_tier: Option<u32>,

    #[serde(default)]
    pub leaderboard_rank: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileInfo {
    #[serde(default)]
    pub account_id: Option<u64>,

    #[serde(default)]
    pub personaname: Option<String>,

    #[serde(default)]
    pub avatarfull: Option<String>,

    #[serde(default)]
    pub profileurl: Option<String>,
}

/// One row of `/heroStats`, the hero catalog source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHeroEntry {
    pub id: u32,
    pub localized_name: String,
}

/// Counters arrive as `null` as well as missing; both read as zero.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The API has shipped `hero_id` both as a number and as a numeric string.
fn hero_id_from_number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum HeroId {
        Number(u32),
        Text(String),
    }

    match HeroId::deserialize(deserializer)? {
        HeroId::Number(id) => Ok(id),
        HeroId::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_match_ignores_unused_fields() {
        let json = r#"{
            "match_id": 7001,
            "player_slot": 130,
            "radiant_win": false,
            "duration": 2400,
            "game_mode": 22,
            "lobby_type": 7,
            "hero_id": 14,
            "start_time": 1700000000,
            "version": 21,
            "kills": 4,
            "deaths": 6,
            "assists": 12,
            "skill": null,
            "leaver_status": 0,
            "party_size": 1
        }"#;

        let m: RawMatch = serde_json::from_str(json).unwrap();
        assert_eq!(m.match_id, 7001);
        assert_eq!(m.player_slot, 130);
        assert_eq!(m.radiant_win, Some(false));
        assert_eq!(m.skill, None);
        assert_eq!(m.assists, 12);
    }

    #[test]
    fn test_raw_match_missing_optionals() {
        let m: RawMatch = serde_json::from_str(r#"{"match_id": 1}"#).unwrap();
        assert_eq!(m.duration, None);
        assert_eq!(m.radiant_win, None);
        assert_eq!(m.kills, 0);
    }

    #[test]
    fn test_raw_match_null_counters() {
        let json = r#"{
            "match_id": 2,
            "player_slot": null,
            "hero_id": null,
            "kills": null,
            "deaths": 3,
            "assists": null
        }"#;

        let m: RawMatch = serde_json::from_str(json).unwrap();
        assert_eq!(m.player_slot, 0);
        assert_eq!(m.hero_id, 0);
        assert_eq!(m.kills, 0);
        assert_eq!(m.deaths, 3);
        assert_eq!(m.assists, 0);
    }

    #[test]
    fn test_hero_stat_null_counters() {
        let json = r#"{
            "hero_id": 8,
            "games": 12,
            "win": null,
            "with_games": null,
            "with_win": null,
            "against_games": null,
            "against_win": 2
        }"#;

        let h: RawHeroStat = serde_json::from_str(json).unwrap();
        assert_eq!(h.games, 12);
        assert_eq!(h.win, 0);
        assert_eq!(h.with_games, 0);
        assert_eq!(h.against_games, 0);
        assert_eq!(h.against_win, 2);
    }

    #[test]
    fn test_peer_null_counters() {
        let p: RawPeer =
            serde_json::from_str(r#"{"account_id": 9, "with_games": null, "with_win": 4}"#)
                .unwrap();
        assert_eq!(p.with_games, 0);
        assert_eq!(p.with_win, 4);
    }

    #[test]
    fn test_hero_id_as_string() {
        let h: RawHeroStat =
            serde_json::from_str(r#"{"hero_id": "86", "games": 10, "win": 6}"#).unwrap();
        assert_eq!(h.hero_id, 86);
        assert_eq!(h.against_games, 0);
    }

    #[test]
    fn test_hero_id_as_number() {
        let h: RawHeroStat = serde_json::from_str(r#"{"hero_id": 86}"#).unwrap();
        assert_eq!(h.hero_id, 86);
    }

    #[test]
    fn test_hero_id_garbage_rejected() {
        let result = serde_json::from_str::<RawHeroStat>(r#"{"hero_id": "abc"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_peer_display_name_fallback() {
        let named: RawPeer =
            serde_json::from_str(r#"{"account_id": 5, "personaname": "Puppey"}"#).unwrap();
        let anonymous: RawPeer =
            serde_json::from_str(r#"{"account_id": 5, "personaname": null}"#).unwrap();

        assert_eq!(named.display_name(), "Puppey");
        assert_eq!(anonymous.display_name(), "5");
    }
}
