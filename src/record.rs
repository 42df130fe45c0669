// src/record.rs
//
// Fixed-schema product record. Created once by the normalizer from one raw row,
// then enriched field-by-field by every later stage. Nothing here is keyed by
// strings at runtime; the export schema is a static column list.

use std::fmt;

use serde::Deserialize;

/* ---------------- Raw input ---------------- */

/// One row as delivered by the collector. Any field may be absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRecord {
    pub title: String,
    pub price_text: Option<String>,
    pub old_price_text: Option<String>,
    pub rating_text: Option<String>,
    pub discount_text: Option<String>,
    pub image_reference: Option<String>,
    pub source: Option<String>,
    pub collected_at: Option<String>,
}

/* ---------------- Categorical fields ---------------- */

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum CpuFamily {
    #[serde(rename = "i9")]
    CoreI9,
    #[serde(rename = "i7")]
    CoreI7,
    #[serde(rename = "i5")]
    CoreI5,
    #[serde(rename = "i3")]
    CoreI3,
    #[serde(rename = "Ryzen 9")]
    Ryzen9,
    #[serde(rename = "Ryzen 7")]
    Ryzen7,
    #[serde(rename = "Ryzen 5")]
    Ryzen5,
    #[serde(rename = "Ryzen 3")]
    Ryzen3,
    Pentium,
    Celeron,
    #[default]
    Other,
}

impl CpuFamily {
    pub fn label(self) -> &'static str {
        match self {
            CpuFamily::CoreI9 => "i9",
            CpuFamily::CoreI7 => "i7",
            CpuFamily::CoreI5 => "i5",
            CpuFamily::CoreI3 => "i3",
            CpuFamily::Ryzen9 => "Ryzen 9",
            CpuFamily::Ryzen7 => "Ryzen 7",
            CpuFamily::Ryzen5 => "Ryzen 5",
            CpuFamily::Ryzen3 => "Ryzen 3",
            CpuFamily::Pentium => "Pentium",
            CpuFamily::Celeron => "Celeron",
            CpuFamily::Other => "Other",
        }
    }
}

impl fmt::Display for CpuFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageType {
    Ssd,
    Hdd,
    Unknown,
}

impl StorageType {
    pub fn label(self) -> &'static str {
        match self {
            StorageType::Ssd => "SSD",
            StorageType::Hdd => "HDD",
            StorageType::Unknown => "Unknown",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Condition {
    New,
    Refurbished,
    Used,
    #[default]
    Unspecified,
}

impl Condition {
    pub fn label(self) -> &'static str {
        match self {
            Condition::New => "New",
            Condition::Refurbished => "Refurbished",
            Condition::Used => "Used",
            Condition::Unspecified => "Unspecified",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Entry,
    Mid,
    High,
    #[default]
    Unclassified,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::Entry => "Entry",
            Tier::Mid => "Mid",
            Tier::High => "High",
            Tier::Unclassified => "Unclassified",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DealClass {
    #[default]
    Standard,
    Promo,
    Good,
    Excellent,
}

impl DealClass {
    pub fn label(self) -> &'static str {
        match self {
            DealClass::Standard => "Standard",
            DealClass::Promo => "Promo",
            DealClass::Good => "Good",
            DealClass::Excellent => "Excellent",
        }
    }

    pub fn is_good_or_better(self) -> bool {
        matches!(self, DealClass::Good | DealClass::Excellent)
    }
}

/// Direction of a tier-relative price outlier, judged against the IQR fences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PriceAnomaly {
    #[default]
    Normal,
    Low(Tier),
    High(Tier),
    /// Flagged by z-score while still inside the IQR fences.
    Flagged(Tier),
}

impl fmt::Display for PriceAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceAnomaly::Normal => f.write_str("Normal"),
            PriceAnomaly::Low(t) => write!(f, "Abnormally low price ({t})"),
            PriceAnomaly::High(t) => write!(f, "Abnormally high price ({t})"),
            PriceAnomaly::Flagged(t) => write!(f, "Price anomaly ({t})"),
        }
    }
}

/// Spec/price inconsistency rules, in evaluation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Inconsistency {
    HighPerfLowPrice,
    PremiumCpuUnderpriced,
    HighRamUnderpriced,
    LowPerfHighPrice,
    EntryCpuOverpriced,
    SuspiciousDiscount,
}

impl Inconsistency {
    pub fn label(self) -> &'static str {
        match self {
            Inconsistency::HighPerfLowPrice => "High performance, low price",
            Inconsistency::PremiumCpuUnderpriced => "Premium CPU underpriced",
            Inconsistency::HighRamUnderpriced => "High RAM underpriced",
            Inconsistency::LowPerfHighPrice => "Low performance, high price",
            Inconsistency::EntryCpuOverpriced => "Entry CPU overpriced",
            Inconsistency::SuspiciousDiscount => "Suspicious discount",
        }
    }
}

/// Outcome of the inconsistency engine for one record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ConsistencyVerdict {
    #[default]
    Consistent,
    MissingPrice,
    Issues(Vec<Inconsistency>),
}

impl fmt::Display for ConsistencyVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyVerdict::Consistent => f.write_str("Consistent"),
            ConsistencyVerdict::MissingPrice => f.write_str("Missing price"),
            ConsistencyVerdict::Issues(list) => {
                for (i, issue) in list.iter().enumerate() {
                    if i > 0 { f.write_str(" | ")?; }
                    f.write_str(issue.label())?;
                }
                Ok(())
            }
        }
    }
}

/// Signals that can make a record suspicious, in reporting order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SuspicionReason {
    MlAnomaly,
    PriceAnomaly,
    MajorInconsistency,
    IncompleteData,
    ExtremePrice,
}

impl SuspicionReason {
    pub fn tag(self) -> &'static str {
        match self {
            SuspicionReason::MlAnomaly => "ML anomaly",
            SuspicionReason::PriceAnomaly => "Price anomaly",
            SuspicionReason::MajorInconsistency => "Major inconsistency",
            SuspicionReason::IncompleteData => "Incomplete data",
            SuspicionReason::ExtremePrice => "Extreme price",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SentimentLabel {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn label(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub confidence: f64,
}

impl Sentiment {
    pub const NEUTRAL: Sentiment = Sentiment { label: SentimentLabel::Neutral, confidence: 0.5 };
}

impl Default for Sentiment {
    fn default() -> Self { Sentiment::NEUTRAL }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Recommendation {
    HighlyRecommended,
    Recommended,
    Consider,
    #[default]
    NotRecommended,
    VerifyFirst,
}

impl Recommendation {
    pub fn label(self) -> &'static str {
        match self {
            Recommendation::HighlyRecommended => "Highly recommended",
            Recommendation::Recommended => "Recommended",
            Recommendation::Consider => "Consider",
            Recommendation::NotRecommended => "Not recommended",
            Recommendation::VerifyFirst => "Not recommended – verify",
        }
    }
}

/* ---------------- Enriched record ---------------- */

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductRecord {
    /// Stable row key: position in the raw input.
    pub row_id: usize,
    pub raw: RawRecord,

    // Field normalizer
    pub price: Option<f64>,
    pub old_price: Option<f64>,
    pub discount_pct: f64,
    pub advertised_discount_pct: Option<f64>,
    pub rating: Option<f64>,
    pub brand: String,
    pub cpu_family: CpuFamily,
    pub cpu_model: Option<String>,
    pub cpu_generation: Option<u32>,
    pub ram_gb: Option<u32>,
    pub ram_type: Option<String>,
    pub storage_gb: Option<u32>,
    pub storage_type: Option<StorageType>,
    pub nvme: bool,
    pub screen_inches: Option<f64>,
    pub gpu: Option<String>,
    pub condition: Condition,

    // Quality gate
    pub completeness_pct: f64,

    // Tier classifier
    pub tier: Tier,

    // Scoring engine
    pub performance_index: f64,
    pub quality_score: f64,

    // Value ranker
    pub value_ratio: f64,
    pub deal_class: DealClass,

    // Anomaly & consistency engine
    pub price_anomaly_zscore: bool,
    pub price_anomaly_iqr: bool,
    pub price_anomaly: PriceAnomaly,
    pub multivariate_anomaly_flag: bool,
    pub multivariate_anomaly_score: f64,
    pub multivariate_anomaly_norm: f64,
    pub consistency: ConsistencyVerdict,
    pub inconsistency_severity: u32,
    pub suspicious_flag: bool,
    pub suspicion_reasons: Vec<SuspicionReason>,

    // Sentiment capability
    pub sentiment: Sentiment,

    // Confidence synthesizer
    pub confidence_index: f64,
    pub recommendation: Recommendation,
    pub vendor_reliability: f64,

    pub tags: String,
    pub summary: String,
}

impl ProductRecord {
    /// Fresh record carrying only identity and raw fields; derived fields hold
    /// their neutral defaults until each stage writes them.
    pub fn from_raw(row_id: usize, raw: RawRecord) -> Self {
        Self {
            row_id,
            raw,
            brand: s!(OTHER_BRAND),
            multivariate_anomaly_norm: 0.5,
            vendor_reliability: 5.0,
            ..Default::default()
        }
    }

    pub fn title(&self) -> &str { &self.raw.title }
}

pub const OTHER_BRAND: &str = "Other";

/* ---------------- Export schema ---------------- */

/// Output column order. Stable across runs and releases; append only.
pub const EXPORT_HEADERS: [&str; 49] = [
    "row_id", "title", "source", "collected_at", "image_reference",
    "price_text", "old_price_text", "rating_text", "discount_text",
    "price", "old_price", "discount_pct", "advertised_discount_pct", "rating",
    "brand", "cpu_family", "cpu_model", "cpu_generation",
    "ram_gb", "ram_type", "storage_gb", "storage_type", "nvme", "screen_inches", "gpu",
    "condition", "completeness_pct", "tier", "performance_index", "quality_score",
    "value_ratio", "deal_class",
    "price_anomaly_zscore", "price_anomaly_iqr", "price_anomaly_label",
    "multivariate_anomaly_flag", "multivariate_anomaly_score", "multivariate_anomaly_norm",
    "inconsistency_label", "inconsistency_severity",
    "suspicious_flag", "suspicion_reasons",
    "sentiment_label", "sentiment_confidence",
    "confidence_index", "recommendation", "vendor_reliability",
    "tags", "summary",
];

fn opt_text(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}

fn opt_int(v: Option<u32>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

fn flag(b: bool) -> String {
    s!(if b { "true" } else { "false" })
}

impl ProductRecord {
    /// One export row, aligned with `EXPORT_HEADERS`. Fixed float precision keeps
    /// repeated runs byte-identical.
    pub fn to_row(&self) -> Vec<String> {
        let raw = &self.raw;
        let reasons = self
            .suspicion_reasons
            .iter()
            .map(|r| r.tag())
            .collect::<Vec<_>>()
            .join(" + ");

        vec![
            self.row_id.to_string(),
            raw.title.clone(),
            opt_text(&raw.source),
            opt_text(&raw.collected_at),
            opt_text(&raw.image_reference),
            opt_text(&raw.price_text),
            opt_text(&raw.old_price_text),
            opt_text(&raw.rating_text),
            opt_text(&raw.discount_text),
            opt_cell!(self.price, 2),
            opt_cell!(self.old_price, 2),
            format!("{:.2}", self.discount_pct),
            opt_cell!(self.advertised_discount_pct, 2),
            opt_cell!(self.rating, 2),
            self.brand.clone(),
            s!(self.cpu_family.label()),
            opt_text(&self.cpu_model),
            opt_int(self.cpu_generation),
            opt_int(self.ram_gb),
            opt_text(&self.ram_type),
            opt_int(self.storage_gb),
            self.storage_type.map(|t| s!(t.label())).unwrap_or_default(),
            flag(self.nvme),
            opt_cell!(self.screen_inches, 1),
            opt_text(&self.gpu),
            s!(self.condition.label()),
            format!("{:.1}", self.completeness_pct),
            s!(self.tier.label()),
            format!("{:.1}", self.performance_index),
            format!("{:.1}", self.quality_score),
            format!("{:.2}", self.value_ratio),
            s!(self.deal_class.label()),
            flag(self.price_anomaly_zscore),
            flag(self.price_anomaly_iqr),
            self.price_anomaly.to_string(),
            flag(self.multivariate_anomaly_flag),
            format!("{:.4}", self.multivariate_anomaly_score),
            format!("{:.4}", self.multivariate_anomaly_norm),
            self.consistency.to_string(),
            self.inconsistency_severity.to_string(),
            flag(self.suspicious_flag),
            reasons,
            s!(self.sentiment.label.label()),
            format!("{:.2}", self.sentiment.confidence),
            format!("{:.1}", self.confidence_index),
            s!(self.recommendation.label()),
            format!("{:.1}", self.vendor_reliability),
            self.tags.clone(),
            self.summary.clone(),
        ]
    }
}
