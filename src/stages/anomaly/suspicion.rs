// src/stages/anomaly/suspicion.rs
use crate::config::options::{RuleOptions, SuspicionOptions};
use crate::record::{ProductRecord, SuspicionReason};

/// Signals that fired for one record, in reporting order.
pub fn reasons(r: &ProductRecord, opts: &SuspicionOptions, severe_at: u32) -> Vec<SuspicionReason> {
    let mut out = Vec::new();
    if r.multivariate_anomaly_flag {
        out.push(SuspicionReason::MlAnomaly);
    }
    if r.price_anomaly_zscore || r.price_anomaly_iqr {
        out.push(SuspicionReason::PriceAnomaly);
    }
    if r.inconsistency_severity >= severe_at {
        out.push(SuspicionReason::MajorInconsistency);
    }
    if r.completeness_pct < opts.min_completeness {
        out.push(SuspicionReason::IncompleteData);
    }
    if r.price.is_some_and(|p| p < opts.extreme_low || p > opts.extreme_high) {
        out.push(SuspicionReason::ExtremePrice);
    }
    out
}

/// The flag is derived from the reasons, so it can never disagree with them.
pub fn aggregate(records: &mut [ProductRecord], opts: &SuspicionOptions, rules: &RuleOptions) -> usize {
    for r in records.iter_mut() {
        r.suspicion_reasons = reasons(r, opts, rules.severe_at);
        r.suspicious_flag = !r.suspicion_reasons.is_empty();
    }
    let n = records.iter().filter(|r| r.suspicious_flag).count();
    logf!("Suspicion: {} of {} records flagged", n, records.len());
    n
}
