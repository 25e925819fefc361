//! Core data models for the catalog scraper.

mod ids;
mod product;
mod stats;

pub use ids::*;
pub use product::*;
pub use stats::*;
