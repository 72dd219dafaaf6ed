//! Reference tables: hero names and game mode names.
//!
//! Both catalogs are loaded once at startup and shared read-only through
//! [`ReferenceData`]. Heroes come from the stats source, game modes from a
//! table bundled into the binary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::fetch::{FetchError, StatsSource};
use crate::models::RawHeroEntry;

const GAME_MODES_JSON: &str = include_str!("../../data/game_mode.json");

/// Length of the `game_mode_` prefix on raw game mode keys.
const GAME_MODE_PREFIX_LEN: usize = 10;

/// Errors that can occur while loading reference data.
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("Failed to fetch hero catalog: {0}")]
    HeroCatalog(#[from] FetchError),

    #[error("Hero catalog is empty")]
    EmptyHeroCatalog,

    #[error("Invalid game mode table: {0}")]
    GameModes(#[from] serde_json::Error),
}

/// Hero id to display name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeroCatalog {
    names: BTreeMap<u32, String>,
}

impl HeroCatalog {
    pub fn from_entries(entries: impl IntoIterator<Item = RawHeroEntry>) -> Self {
        Self {
            names: entries
                .into_iter()
                .map(|e| (e.id, e.localized_name))
                .collect(),
        }
    }

    pub fn name(&self, hero_id: u32) -> Option<&str> {
        self.names.get(&hero_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All heroes in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.names.iter().map(|(id, name)| (*id, name.as_str()))
    }
}

/// Raw entry of the bundled game mode table. The `balanced` flag is dropped.
#[derive(Debug, Deserialize)]
struct GameModeEntry {
    id: u32,
    name: String,
}

/// Game mode id to display name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameModeCatalog {
    names: BTreeMap<u32, String>,
}

impl GameModeCatalog {
    /// Parse a `key -> {id, name, balanced}` table.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let table: BTreeMap<String, GameModeEntry> = serde_json::from_str(json)?;
        Ok(Self {
            names: table
                .into_values()
                .map(|e| (e.id, normalize_game_mode_name(&e.name)))
                .collect(),
        })
    }

    /// The table shipped with the binary.
    pub fn bundled() -> Result<Self, serde_json::Error> {
        Self::from_json(GAME_MODES_JSON)
    }

    pub fn name(&self, mode_id: u32) -> Option<&str> {
        self.names.get(&mode_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All game modes in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.names.iter().map(|(id, name)| (*id, name.as_str()))
    }
}

/// Strip the `game_mode_` prefix and turn underscores into spaces.
pub fn normalize_game_mode_name(raw: &str) -> String {
    raw.chars()
        .skip(GAME_MODE_PREFIX_LEN)
        .map(|c| if c == '_' { ' ' } else { c })
        .collect()
}

/// Catalogs shared by every pipeline run.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub heroes: HeroCatalog,
    pub game_modes: GameModeCatalog,
}

impl ReferenceData {
    pub fn new(heroes: HeroCatalog, game_modes: GameModeCatalog) -> Self {
        Self { heroes, game_modes }
    }

    /// Fetch the hero catalog and parse the bundled game mode table.
    pub async fn load(source: &dyn StatsSource) -> Result<Self, ReferenceError> {
        let heroes = load_hero_catalog(source).await?;
        let game_modes = GameModeCatalog::bundled()?;
        info!(
            "Loaded {} heroes and {} game modes",
            heroes.len(),
            game_modes.len()
        );
        Ok(Self::new(heroes, game_modes))
    }
}

/// Fetch the hero catalog from the source.
pub async fn load_hero_catalog(source: &dyn StatsSource) -> Result<HeroCatalog, ReferenceError> {
    let entries = source.fetch_hero_catalog().await?;
    if entries.is_empty() {
        return Err(ReferenceError::EmptyHeroCatalog);
    }
    Ok(HeroCatalog::from_entries(entries))
}
