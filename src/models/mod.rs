//! Core data models for the dashboard.

mod raw;
mod summary;
mod tables;

pub use raw::*;
pub use summary::*;
pub use tables::*;
