// src/config/consts.rs

// Paths (relative to the working directory)
pub const DEFAULT_INPUT: &str = "data/raw/raw_data.csv";
pub const DEFAULT_OUT_DIR: &str = "data/processed";
pub const DEFAULT_OUTPUT_STEM: &str = "enriched_data";
pub const DEFAULT_REPORT: &str = "data/reports/pipeline_report.txt";

// Tier thresholds (currency units)
pub const TIER_LOW: f64 = 2500.0;
pub const TIER_HIGH: f64 = 5000.0;

// Tier-relative price statistics
pub const MIN_TIER_SIZE: usize = 3;
pub const ZSCORE_THRESHOLD: f64 = 3.0;
pub const IQR_K: f64 = 1.5;

// Multivariate detector
pub const FOREST_TREES: usize = 100;
pub const FOREST_SAMPLE: usize = 256;
pub const CONTAMINATION: f64 = 0.10;
pub const SEED: u64 = 42;

// Suspicion
pub const MIN_COMPLETENESS: f64 = 40.0;
pub const EXTREME_LOW_PRICE: f64 = 500.0;
pub const EXTREME_HIGH_PRICE: f64 = 20_000.0;

// Value ratio scale: quality points per 1000 currency units
pub const VALUE_SCALE: f64 = 1000.0;
