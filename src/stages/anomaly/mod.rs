// src/stages/anomaly/mod.rs
//! Anomaly & consistency engine.
//!
//! - `stats`: tier-relative z-score and IQR price outliers (barrier: per-tier pass)
//! - `forest`: multivariate detector seam and the seeded isolation forest
//! - `rules`: spec/price inconsistency rules with additive severities
//! - `suspicion`: OR of all signals, with the reasons that fired
pub mod forest;
pub mod rules;
pub mod stats;
pub mod suspicion;

pub use forest::{DisabledDetector, FeatureMatrix, IsolationForest, MultivariateScores, OutlierDetector};
