//! `tedlink-recon` — Two-source cross-reference engine.
//!
//! Pure engine crate: reads headed CSV sources, aligns them on a normalized key, and
//! returns the union as fixed-schema rows. No store dependency.

pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod similarity;

pub use config::JoinConfig;
pub use engine::{load_records, merge};
pub use error::ReconError;
pub use model::{MergeOutput, MergeStats, MergedRow, SourceRecord};
pub use normalize::normalize_key;
pub use similarity::similarity;
