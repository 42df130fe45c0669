// src/stages/mod.rs
//! # Pipeline stages
//!
//! One module per stage of the enrichment pipeline. Each stage reads the fields
//! written by earlier stages and writes its own, never anything upstream.
//!
//! ## Order
//! ```text
//! normalize → gate → tier → scoring → value → anomaly::{stats, forest, rules, suspicion}
//!           → sentiment → confidence → tags
//! ```
//!
//! ## Conventions & invariants
//! - **Per-record stages are pure** (`normalize`, `tier`, `scoring`, `confidence`,
//!   `tags`): they take one record and the options, and run across records with
//!   `rayon`.
//! - **Dataset-wide stages are barriers** (`value` quantiles, tier statistics, the
//!   isolation forest): they finish a full pass before any record is written.
//! - Stages that can fail return `Result<_, StageError>`; the runner owns the
//!   fallback values (see `runner::apply_fallback`). A stage never drops records.
//! - Scores are hard-clamped to `[0, 100]` where they are produced.
pub mod anomaly;
pub mod confidence;
pub mod gate;
pub mod normalize;
pub mod scoring;
pub mod sentiment;
pub mod tags;
pub mod tier;
pub mod value;
