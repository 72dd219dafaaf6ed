//! # Dota Dashboard
//!
//! Builds a single-player Dota 2 statistics dashboard from the OpenDota API.
//!
//! ## Architecture
//!
//! - **fetch**: Stats sources (OpenDota HTTP client with retry, local fixtures)
//! - **reference**: Hero and game mode lookup tables
//! - **models**: Raw API records and display rows
//! - **transform**: Raw records into match and hero tables
//! - **calculate**: Aggregates, win rates and rankings
//! - **pipeline**: One fetch, transform and rank run per player
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod fetch;
pub mod models;
pub mod pipeline;
pub mod reference;
pub mod transform;

pub use models::*;
