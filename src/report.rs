// src/report.rs
//
// Plain-text quality / anomaly report over the enriched collection.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::core::stats::mean;
use crate::record::{ProductRecord, Recommendation, Tier};
use crate::runner::RunSummary;

const RULE: &str = "============================================================";

fn pct(n: usize, total: usize) -> f64 {
    if total == 0 { 0.0 } else { n as f64 / total as f64 * 100.0 }
}

fn distribution<'a>(out: &mut String, title: &str, keys: impl Iterator<Item = &'a str>) {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for k in keys {
        *counts.entry(k).or_default() += 1;
    }
    let mut sorted: Vec<(&str, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    let _ = writeln!(out, "\n{title}:");
    for (k, n) in sorted {
        let _ = writeln!(out, "  {k:<24} {n:>6}");
    }
}

/// Render the report. Pure: same input, same text.
pub fn render(records: &[ProductRecord], summary: &RunSummary) -> String {
    let mut out = String::new();
    let n = records.len();

    // Writes into a String cannot fail.
    let _ = writeln!(out, "{RULE}\nDATA QUALITY\n{RULE}");
    let g = &summary.gate;
    let _ = writeln!(out, "Initial records:       {}", g.initial);
    let _ = writeln!(out, "Accessories removed:   {}", g.accessories);
    let _ = writeln!(out, "Duplicates removed:    {}", g.duplicates);
    let _ = writeln!(out, "Final records:         {}", g.kept);

    let coverage = [
        ("price", records.iter().filter(|r| r.price.is_some()).count()),
        ("rating", records.iter().filter(|r| r.rating.is_some()).count()),
        ("ram_gb", records.iter().filter(|r| r.ram_gb.is_some()).count()),
        ("storage_gb", records.iter().filter(|r| r.storage_gb.is_some()).count()),
        ("cpu_generation", records.iter().filter(|r| r.cpu_generation.is_some()).count()),
    ];
    let _ = writeln!(out, "\nField coverage:");
    for (name, c) in coverage {
        let _ = writeln!(out, "  {name:<24} {c:>6} ({:.1}%)", pct(c, n));
    }

    let prices: Vec<f64> = records.iter().filter_map(|r| r.price).collect();
    if let Some(m) = mean(&prices) {
        let lo = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let _ = writeln!(out, "\nPrice: mean {m:.2}, min {lo:.2}, max {hi:.2}");
    }
    let discounts: Vec<f64> = records.iter().map(|r| r.discount_pct).filter(|d| *d > 0.0).collect();
    if let Some(m) = mean(&discounts) {
        let _ = writeln!(out, "Mean discount (discounted records): {m:.1}%");
    }

    distribution(&mut out, "By brand", records.iter().map(|r| r.brand.as_str()));
    distribution(&mut out, "By tier", records.iter().map(|r| r.tier.label()));
    distribution(&mut out, "By condition", records.iter().map(|r| r.condition.label()));

    /* ---- anomalies ---- */
    let _ = writeln!(out, "\n{RULE}\nANOMALIES\n{RULE}");
    let statistical = records.iter().filter(|r| r.price_anomaly_zscore || r.price_anomaly_iqr).count();
    let ml = records.iter().filter(|r| r.multivariate_anomaly_flag).count();
    let inconsistent = records.iter().filter(|r| r.inconsistency_severity >= 1).count();
    let severe = records.iter().filter(|r| r.inconsistency_severity >= 3).count();
    let suspicious = records.iter().filter(|r| r.suspicious_flag).count();
    let _ = writeln!(out, "Statistical price anomalies: {statistical}");
    let _ = writeln!(out, "Multivariate anomalies:      {ml}");
    let _ = writeln!(out, "Inconsistencies:             {inconsistent} ({severe} severe)");
    let _ = writeln!(out, "Suspicious records:          {suspicious} ({:.1}%)", pct(suspicious, n));

    let _ = writeln!(out, "\nSuspicious by tier:");
    for tier in [Tier::Entry, Tier::Mid, Tier::High, Tier::Unclassified] {
        let c = records.iter().filter(|r| r.tier == tier && r.suspicious_flag).count();
        let _ = writeln!(out, "  {:<24} {c:>6}", tier.label());
    }

    let mut buckets = [0usize; 4];
    for r in records {
        let s = r.multivariate_anomaly_norm;
        let i = if s < 0.2 { 0 } else if s < 0.4 { 1 } else if s < 0.6 { 2 } else { 3 };
        buckets[i] += 1;
    }
    let _ = writeln!(out, "\nNormalized multivariate score:");
    for (label, c) in ["< 0.2", "0.2 - 0.4", "0.4 - 0.6", ">= 0.6"].iter().zip(buckets) {
        let _ = writeln!(out, "  {label:<24} {c:>6}");
    }

    /* ---- recommendations ---- */
    let _ = writeln!(out, "\n{RULE}\nRECOMMENDATIONS\n{RULE}");
    for rec in [
        Recommendation::HighlyRecommended,
        Recommendation::Recommended,
        Recommendation::Consider,
        Recommendation::NotRecommended,
        Recommendation::VerifyFirst,
    ] {
        let c = records.iter().filter(|r| r.recommendation == rec).count();
        let _ = writeln!(out, "  {:<28} {c:>6}", rec.label());
    }
    let conf: Vec<f64> = records.iter().map(|r| r.confidence_index).collect();
    let _ = writeln!(out, "Mean confidence: {:.1}", mean(&conf).unwrap_or(0.0));

    let mut deals: Vec<&ProductRecord> = records.iter().filter(|r| r.confidence_index >= 70.0).collect();
    deals.sort_by(|a, b| b.value_ratio.total_cmp(&a.value_ratio).then(a.row_id.cmp(&b.row_id)));
    let _ = writeln!(out, "\nTop deals:");
    for r in deals.iter().take(5) {
        let _ = writeln!(
            out,
            "  [{}] {} | value {:.2} | confidence {:.1}",
            r.row_id, r.summary, r.value_ratio, r.confidence_index
        );
    }

    let _ = writeln!(out, "\nSuspicious records (first 10):");
    for r in records.iter().filter(|r| r.suspicious_flag).take(10) {
        let reasons: Vec<&str> = r.suspicion_reasons.iter().map(|x| x.tag()).collect();
        let price = opt_cell!(r.price, 2);
        let _ = writeln!(out, "  [{}] {} | {} | {}", r.row_id, r.title(), price, reasons.join(" + "));
    }

    if !summary.failures.is_empty() {
        let _ = writeln!(out, "\n{RULE}\nSTAGE FAILURES\n{RULE}");
        for e in &summary.failures {
            let _ = writeln!(out, "  {e}");
        }
    }

    out
}
