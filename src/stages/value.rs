// src/stages/value.rs
//
// Value ranker: quality-to-price ratio and deal classes. Quantiles are computed
// once per batch over records that have a defined ratio, then applied record by
// record.

use crate::config::consts::VALUE_SCALE;
use crate::config::options::DealOptions;
use crate::core::stats::{quantile_sorted, round_to, sorted};
use crate::error::{Stage, StageError};
use crate::record::{DealClass, ProductRecord};

/// `quality / price × 1000`; 0 without a positive price.
pub fn value_ratio(quality: f64, price: Option<f64>) -> f64 {
    match price {
        Some(p) if p > 0.0 => round_to(quality / p * VALUE_SCALE, 2),
        _ => 0.0,
    }
}

/// Batch cut-offs for the Good and Excellent classes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DealThresholds {
    pub good: f64,
    pub excellent: f64,
}

impl DealThresholds {
    /// Quantiles over every record with a positive price.
    pub fn compute(records: &[ProductRecord], opts: &DealOptions) -> Result<Self, StageError> {
        let ratios: Vec<f64> = records
            .iter()
            .filter(|r| r.price.is_some_and(|p| p > 0.0))
            .map(|r| r.value_ratio)
            .collect();
        let ratios = sorted(&ratios);
        match (
            quantile_sorted(&ratios, opts.good_quantile),
            quantile_sorted(&ratios, opts.excellent_quantile),
        ) {
            (Some(good), Some(excellent)) => Ok(Self { good, excellent }),
            _ => Err(StageError::InsufficientData {
                stage: Stage::Value,
                detail: s!("no record has a defined value ratio"),
            }),
        }
    }
}

/// Excellent, then Good, then Promo. Without thresholds only Promo can fire.
pub fn classify(r: &ProductRecord, thresholds: Option<&DealThresholds>, opts: &DealOptions) -> DealClass {
    if let Some(t) = thresholds {
        let priced = r.price.is_some_and(|p| p > 0.0);
        if priced && r.value_ratio >= t.excellent && r.quality_score >= opts.excellent_min_quality {
            return DealClass::Excellent;
        }
        if priced && r.value_ratio >= t.good && r.quality_score >= opts.good_min_quality {
            return DealClass::Good;
        }
    }
    if r.discount_pct >= opts.promo_min_discount && r.quality_score >= opts.promo_min_quality {
        DealClass::Promo
    } else {
        DealClass::Standard
    }
}

/// Writes `value_ratio` for every record, then deal classes. Ratios are kept
/// even when the thresholds cannot be computed.
pub fn rank(records: &mut [ProductRecord], opts: &DealOptions) -> Result<DealThresholds, StageError> {
    for r in records.iter_mut() {
        r.value_ratio = value_ratio(r.quality_score, r.price);
    }
    let thresholds = DealThresholds::compute(records, opts)?;
    for r in records.iter_mut() {
        r.deal_class = classify(r, Some(&thresholds), opts);
    }
    logf!(
        "Value: p{:.0} {:.2}, p{:.0} {:.2}, {} good-or-better",
        opts.good_quantile * 100.0,
        thresholds.good,
        opts.excellent_quantile * 100.0,
        thresholds.excellent,
        records.iter().filter(|r| r.deal_class.is_good_or_better()).count()
    );
    Ok(thresholds)
}

/// Fallback when `rank` fails: Promo rule only.
pub fn classify_without_quantiles(records: &mut [ProductRecord], opts: &DealOptions) {
    for r in records.iter_mut() {
        r.deal_class = classify(r, None, opts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(price: f64, quality: f64) -> ProductRecord {
        ProductRecord { price: Some(price), quality_score: quality, ..ProductRecord::default() }
    }

    #[test]
    fn ratio_needs_positive_price() {
        assert_eq!(value_ratio(60.0, Some(3000.0)), 20.0);
        assert_eq!(value_ratio(60.0, Some(0.0)), 0.0);
        assert_eq!(value_ratio(60.0, None), 0.0);
    }

    #[test]
    fn classes_follow_quantiles() {
        let opts = DealOptions::default();
        let mut records: Vec<ProductRecord> =
            (1..=10).map(|i| priced(10_000.0 / i as f64, 75.0)).collect();
        rank(&mut records, &opts).unwrap();
        // Cheapest records have the best ratio.
        assert_eq!(records[9].deal_class, DealClass::Excellent);
        assert_eq!(records[7].deal_class, DealClass::Good);
        assert_eq!(records[0].deal_class, DealClass::Standard);
    }

    #[test]
    fn low_quality_never_good() {
        let opts = DealOptions::default();
        let t = DealThresholds { good: 1.0, excellent: 2.0 };
        let mut r = priced(100.0, 40.0);
        r.value_ratio = 400.0;
        assert_eq!(classify(&r, Some(&t), &opts), DealClass::Standard);
    }

    #[test]
    fn no_prices_is_insufficient_but_promo_still_applies() {
        let opts = DealOptions::default();
        let mut records = vec![ProductRecord {
            discount_pct: 45.0,
            quality_score: 55.0,
            ..ProductRecord::default()
        }];
        let err = rank(&mut records, &opts).unwrap_err();
        assert_eq!(err.stage(), Stage::Value);
        classify_without_quantiles(&mut records, &opts);
        assert_eq!(records[0].deal_class, DealClass::Promo);
        assert_eq!(records[0].value_ratio, 0.0);
    }
}
