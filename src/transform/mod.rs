//! Raw record to display table transformations.
//!
//! - **matches**: match history -> match table
//! - **heroes**: per-hero stats + hero catalog -> hero table

mod heroes;
mod matches;

pub use heroes::*;
pub use matches::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder for cells whose source value is missing.
pub const NOT_AVAILABLE: &str = "N/A";

/// A raw row that cannot be mapped onto its display schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Unknown hero id {hero_id}")]
    UnknownHero { hero_id: u32 },
}

/// What to do with a hero id the catalog does not know.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownHeroPolicy {
    /// Substitute a marked placeholder name and carry on.
    #[default]
    Placeholder,
    /// Abort the run with a [`DecodeError`].
    Fail,
}

impl UnknownHeroPolicy {
    pub fn placeholder_name(hero_id: u32) -> String {
        format!("Unknown hero #{}", hero_id)
    }
}
