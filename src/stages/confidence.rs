// src/stages/confidence.rs
use rayon::prelude::*;

use crate::core::stats::{clamp_score, mean, round_to};
use crate::record::{ProductRecord, Recommendation};

pub fn confidence_index(r: &ProductRecord) -> f64 {
    let mut c = 100.0;
    if r.suspicious_flag {
        c -= 30.0;
    }
    if r.multivariate_anomaly_flag {
        c -= 20.0;
    }
    c -= 0.3 * (100.0 - r.completeness_pct);
    if r.deal_class.is_good_or_better() && !r.suspicious_flag {
        c += 10.0;
    }
    round_to(clamp_score(c), 1)
}

/// Needs `confidence_index` already set.
pub fn recommend(r: &ProductRecord) -> Recommendation {
    if r.suspicious_flag {
        Recommendation::VerifyFirst
    } else if r.confidence_index >= 80.0 && r.value_ratio > 15.0 {
        Recommendation::HighlyRecommended
    } else if r.confidence_index >= 60.0 && r.value_ratio > 10.0 {
        Recommendation::Recommended
    } else if r.confidence_index >= 40.0 {
        Recommendation::Consider
    } else {
        Recommendation::NotRecommended
    }
}

/// 1.0 to 5.0, starting from 5.
pub fn vendor_reliability(r: &ProductRecord) -> f64 {
    let mut v: f64 = 5.0;
    if r.suspicious_flag {
        v -= 2.0;
    }
    if r.inconsistency_severity >= 2 {
        v -= 1.0;
    }
    if r.completeness_pct < 50.0 {
        v -= 1.0;
    }
    v.clamp(1.0, 5.0)
}

pub fn synthesize(records: &mut [ProductRecord]) {
    records.par_iter_mut().for_each(|r| {
        r.confidence_index = confidence_index(r);
        r.recommendation = recommend(r);
        r.vendor_reliability = vendor_reliability(r);
    });
    let conf: Vec<f64> = records.iter().map(|r| r.confidence_index).collect();
    logf!("Confidence: mean {:.1}", mean(&conf).unwrap_or(0.0));
}
