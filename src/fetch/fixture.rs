//! Offline source reading saved API responses from disk.
//!
//! Layout:
//!
//! ```text
//! <root>/heroStats.json
//! <root>/<player_id>/profile.json
//! <root>/<player_id>/matches.json
//! <root>/<player_id>/heroes.json
//! <root>/<player_id>/peers.json
//! ```
//!
//! When `<root>/<player_id>` does not exist the player files are read from
//! `<root>` directly, so a single captured player needs no subdirectory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::debug;

use super::{validate_player_id, FetchError, StatsSource};
use crate::models::{RawHeroEntry, RawHeroStat, RawMatch, RawPeer, RawProfile};

/// Reads raw records from JSON files under a root directory.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    root: PathBuf,
}

impl FixtureSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn player_dir(&self, player_id: &str) -> Result<PathBuf, FetchError> {
        let id = validate_player_id(player_id)?;
        let dir = self.root.join(id);
        Ok(if dir.is_dir() { dir } else { self.root.clone() })
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, FetchError> {
        debug!("Reading fixture {:?}", path);
        let content = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[async_trait]
impl StatsSource for FixtureSource {
    fn name(&self) -> &'static str {
        "fixtures"
    }

    async fn fetch_profile(&self, player_id: &str) -> Result<RawProfile, FetchError> {
        Self::read_json(&self.player_dir(player_id)?.join("profile.json")).await
    }

    async fn fetch_matches(&self, player_id: &str) -> Result<Vec<RawMatch>, FetchError> {
        Self::read_json(&self.player_dir(player_id)?.join("matches.json")).await
    }

    async fn fetch_hero_stats(&self, player_id: &str) -> Result<Vec<RawHeroStat>, FetchError> {
        Self::read_json(&self.player_dir(player_id)?.join("heroes.json")).await
    }

    async fn fetch_peers(&self, player_id: &str) -> Result<Vec<RawPeer>, FetchError> {
        Self::read_json(&self.player_dir(player_id)?.join("peers.json")).await
    }

    async fn fetch_hero_catalog(&self) -> Result<Vec<RawHeroEntry>, FetchError> {
        Self::read_json(&self.root.join("heroStats.json")).await
    }
}
