// src/config/options.rs
//
// Runtime options. Every section deserializes with `#[serde(default)]`, so an
// options file only needs the keys it overrides.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::catalog::CatalogOptions;
use super::consts::*;
use crate::error::Result;
use crate::record::CpuFamily;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    pub tiers: TierOptions,
    pub rules: RuleOptions,
    pub suspicion: SuspicionOptions,
    pub deals: DealOptions,
    pub stats: StatsOptions,
    pub detector: DetectorOptions,
    pub catalog: CatalogOptions,
    pub export: ExportOptions,
}

impl PipelineOptions {
    /// Read a TOML options file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/* ---------------- Tier classifier ---------------- */

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TierOptions {
    pub low: f64,
    pub high: f64,
    pub premium_cpus: Vec<CpuFamily>,
    pub entry_cpus: Vec<CpuFamily>,
    pub high_ram_gb: u32,
    pub low_ram_gb: u32,
}

impl Default for TierOptions {
    fn default() -> Self {
        Self {
            low: TIER_LOW,
            high: TIER_HIGH,
            premium_cpus: premium_cpus(),
            entry_cpus: vec![CpuFamily::Celeron, CpuFamily::Pentium, CpuFamily::CoreI3],
            high_ram_gb: 16,
            low_ram_gb: 4,
        }
    }
}

fn premium_cpus() -> Vec<CpuFamily> {
    vec![CpuFamily::CoreI7, CpuFamily::CoreI9, CpuFamily::Ryzen7, CpuFamily::Ryzen9]
}

/* ---------------- Inconsistency rules ---------------- */

/// Thresholds and severities of the spec/price rules. The numbers are empirical
/// defaults; override them per market in the options file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RuleOptions {
    pub high_perf_min: f64,
    pub high_perf_max_price: f64,
    pub high_perf_severity: u32,

    pub premium_cpus: Vec<CpuFamily>,
    pub premium_max_price: f64,
    pub premium_severity: u32,

    pub high_ram_gb: u32,
    pub high_ram_max_price: f64,
    pub high_ram_severity: u32,

    pub low_perf_max: f64,
    pub low_perf_min_price: f64,
    pub low_perf_severity: u32,

    pub overpriced_entry_cpus: Vec<CpuFamily>,
    pub entry_min_price: f64,
    pub entry_severity: u32,

    /// Price / old price below this ratio is a suspicious markdown.
    pub discount_ratio: f64,
    pub discount_severity: u32,

    /// Severity at or above which an inconsistency counts as major.
    pub severe_at: u32,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            high_perf_min: 80.0,
            high_perf_max_price: 3000.0,
            high_perf_severity: 3,
            premium_cpus: premium_cpus(),
            premium_max_price: 2500.0,
            premium_severity: 3,
            high_ram_gb: 32,
            high_ram_max_price: 4000.0,
            high_ram_severity: 2,
            low_perf_max: 40.0,
            low_perf_min_price: 4000.0,
            low_perf_severity: 2,
            overpriced_entry_cpus: vec![CpuFamily::Celeron, CpuFamily::Pentium],
            entry_min_price: 3000.0,
            entry_severity: 2,
            discount_ratio: 0.3,
            discount_severity: 1,
            severe_at: 3,
        }
    }
}

/* ---------------- Suspicion aggregation ---------------- */

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SuspicionOptions {
    pub min_completeness: f64,
    pub extreme_low: f64,
    pub extreme_high: f64,
}

impl Default for SuspicionOptions {
    fn default() -> Self {
        Self {
            min_completeness: MIN_COMPLETENESS,
            extreme_low: EXTREME_LOW_PRICE,
            extreme_high: EXTREME_HIGH_PRICE,
        }
    }
}

/* ---------------- Value ranker ---------------- */

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DealOptions {
    pub good_quantile: f64,
    pub excellent_quantile: f64,
    pub good_min_quality: f64,
    pub excellent_min_quality: f64,
    pub promo_min_discount: f64,
    pub promo_min_quality: f64,
}

impl Default for DealOptions {
    fn default() -> Self {
        Self {
            good_quantile: 0.75,
            excellent_quantile: 0.90,
            good_min_quality: 60.0,
            excellent_min_quality: 70.0,
            promo_min_discount: 40.0,
            promo_min_quality: 50.0,
        }
    }
}

/* ---------------- Anomaly engine ---------------- */

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatsOptions {
    pub min_tier_size: usize,
    pub zscore_threshold: f64,
    pub iqr_k: f64,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self { min_tier_size: MIN_TIER_SIZE, zscore_threshold: ZSCORE_THRESHOLD, iqr_k: IQR_K }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectorOptions {
    pub enabled: bool,
    pub trees: usize,
    pub sample_size: usize,
    pub contamination: f64,
    pub seed: u64,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            trees: FOREST_TREES,
            sample_size: FOREST_SAMPLE,
            contamination: CONTAMINATION,
            seed: SEED,
        }
    }
}

/* ---------------- Export ---------------- */

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> char {
        match self { ExportFormat::Csv => ',', ExportFormat::Tsv => '\t' }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub include_headers: bool,
    #[serde(skip)]
    out_path: OutputPath,
    pub report_path: PathBuf,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            include_headers: true,
            out_path: OutputPath::default(),
            report_path: PathBuf::from(DEFAULT_REPORT),
        }
    }
}

impl ExportOptions {
    /// Final output file: `<dir>/<stem>.<ext>`. A user-typed extension wins over
    /// the format's default.
    pub fn out_path(&self) -> PathBuf {
        let mut path = self.out_path.dir.clone();
        let stem = self.out_path.file_stem.to_string_lossy();
        match &self.out_path.ext {
            Some(ext) => path.push(join!(&*stem, ".", ext.as_str())),
            None => path.push(join!(&*stem, ".", self.format.ext())),
        }
        path
    }

    /// Parse a user path into dir + stem (+ explicit extension, if any).
    pub fn set_path(&mut self, text: &str) {
        let p = Path::new(text.trim());
        if let Some(parent) = p.parent() {
            self.out_path.dir = parent.to_path_buf();
        }
        if let Some(stem) = p.file_stem() {
            self.out_path.file_stem = stem.to_os_string();
        }
        self.out_path.ext = p.extension().map(|e| e.to_string_lossy().into_owned());
    }

    pub fn delim(&self) -> char {
        self.format.delim()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct OutputPath {
    dir: PathBuf,
    file_stem: OsString, // without extension
    ext: Option<String>,
}

impl Default for OutputPath {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUT_DIR),
            file_stem: OsString::from(DEFAULT_OUTPUT_STEM),
            ext: None,
        }
    }
}
