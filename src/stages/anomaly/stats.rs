// src/stages/anomaly/stats.rs
//
// Tier-relative price outliers. Each tier with enough priced records gets a
// z-score test and Tukey fences over its prices; both flags are independent and
// the direction label comes from the fences.

use std::collections::BTreeMap;

use crate::config::options::StatsOptions;
use crate::core::stats::{iqr_fences, mean, std_dev};
use crate::record::{PriceAnomaly, ProductRecord, Tier};

/// Per-tier outcome, for the log line and the report.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TierOutliers {
    pub checked: Vec<Tier>,
    pub skipped: Vec<Tier>,
    pub flagged: usize,
}

pub fn detect(records: &mut [ProductRecord], opts: &StatsOptions) -> TierOutliers {
    let mut groups: BTreeMap<Tier, Vec<usize>> = BTreeMap::new();
    for (i, r) in records.iter().enumerate() {
        if r.tier != Tier::Unclassified && r.price.is_some() {
            groups.entry(r.tier).or_default().push(i);
        }
    }

    let mut out = TierOutliers::default();
    for (tier, idx) in groups {
        if idx.len() < opts.min_tier_size {
            logd!("Price outliers: {} has {} priced records, skipped", tier, idx.len());
            out.skipped.push(tier);
            continue;
        }
        out.checked.push(tier);

        let prices: Vec<f64> = idx.iter().filter_map(|&i| records[i].price).collect();
        let (Some(m), Some(sd), Some((lo, hi))) =
            (mean(&prices), std_dev(&prices), iqr_fences(&prices, opts.iqr_k))
        else {
            continue;
        };

        for &i in &idx {
            let r = &mut records[i];
            let Some(p) = r.price else { continue };
            let z_flag = sd > 0.0 && ((p - m) / sd).abs() > opts.zscore_threshold;
            let iqr_flag = p < lo || p > hi;
            r.price_anomaly_zscore = z_flag;
            r.price_anomaly_iqr = iqr_flag;
            r.price_anomaly = if p < lo {
                PriceAnomaly::Low(tier)
            } else if p > hi {
                PriceAnomaly::High(tier)
            } else if z_flag {
                PriceAnomaly::Flagged(tier)
            } else {
                PriceAnomaly::Normal
            };
            if z_flag || iqr_flag {
                out.flagged += 1;
            }
        }
    }

    logf!("Price outliers: {} flagged across {} tiers", out.flagged, out.checked.len());
    out
}

/// Resets every record to "no statistical anomaly".
pub fn clear(records: &mut [ProductRecord]) {
    for r in records {
        r.price_anomaly_zscore = false;
        r.price_anomaly_iqr = false;
        r.price_anomaly = PriceAnomaly::Normal;
    }
}
