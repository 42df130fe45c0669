// src/stages/anomaly/rules.rs
use crate::config::options::RuleOptions;
use crate::record::{ConsistencyVerdict, Inconsistency, ProductRecord};

/// Evaluates every spec/price rule against one record. Severities add up.
pub fn evaluate(r: &ProductRecord, opts: &RuleOptions) -> (ConsistencyVerdict, u32) {
    let Some(price) = r.price else {
        return (ConsistencyVerdict::MissingPrice, 0);
    };

    let mut issues = Vec::new();
    let mut severity = 0;
    let mut fire = |hit: bool, issue: Inconsistency, weight: u32| {
        if hit {
            issues.push(issue);
            severity += weight;
        }
    };

    fire(
        r.performance_index >= opts.high_perf_min && price < opts.high_perf_max_price,
        Inconsistency::HighPerfLowPrice,
        opts.high_perf_severity,
    );
    fire(
        opts.premium_cpus.contains(&r.cpu_family) && price < opts.premium_max_price,
        Inconsistency::PremiumCpuUnderpriced,
        opts.premium_severity,
    );
    fire(
        r.ram_gb.is_some_and(|ram| ram >= opts.high_ram_gb) && price < opts.high_ram_max_price,
        Inconsistency::HighRamUnderpriced,
        opts.high_ram_severity,
    );
    fire(
        r.performance_index <= opts.low_perf_max && price > opts.low_perf_min_price,
        Inconsistency::LowPerfHighPrice,
        opts.low_perf_severity,
    );
    fire(
        opts.overpriced_entry_cpus.contains(&r.cpu_family) && price > opts.entry_min_price,
        Inconsistency::EntryCpuOverpriced,
        opts.entry_severity,
    );
    fire(
        r.old_price.is_some_and(|old| old > 0.0 && price / old < opts.discount_ratio),
        Inconsistency::SuspiciousDiscount,
        opts.discount_severity,
    );

    if issues.is_empty() {
        (ConsistencyVerdict::Consistent, 0)
    } else {
        (ConsistencyVerdict::Issues(issues), severity)
    }
}

/// Returns how many records carry at least one inconsistency.
pub fn check_all(records: &mut [ProductRecord], opts: &RuleOptions) -> usize {
    for r in records.iter_mut() {
        let (verdict, severity) = evaluate(r, opts);
        r.consistency = verdict;
        r.inconsistency_severity = severity;
    }
    let hits = records.iter().filter(|r| r.inconsistency_severity > 0).count();
    let severe = records.iter().filter(|r| r.inconsistency_severity >= opts.severe_at).count();
    logf!("Inconsistencies: {} records, {} severe", hits, severe);
    hits
}

pub fn clear(records: &mut [ProductRecord]) {
    for r in records {
        r.consistency = ConsistencyVerdict::Consistent;
        r.inconsistency_severity = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CpuFamily;

    #[test]
    fn high_perf_low_price_is_severe() {
        let r = ProductRecord { price: Some(2800.0), performance_index: 85.0, ..ProductRecord::default() };
        let (verdict, severity) = evaluate(&r, &RuleOptions::default());
        assert_eq!(verdict, ConsistencyVerdict::Issues(vec![Inconsistency::HighPerfLowPrice]));
        assert!(severity >= 3);
    }

    #[test]
    fn severities_add_up() {
        let r = ProductRecord {
            price: Some(2000.0),
            old_price: Some(10_000.0),
            performance_index: 90.0,
            cpu_family: CpuFamily::CoreI9,
            ram_gb: Some(32),
            ..ProductRecord::default()
        };
        let (verdict, severity) = evaluate(&r, &RuleOptions::default());
        assert_eq!(severity, 3 + 3 + 2 + 1);
        assert_eq!(
            verdict.to_string(),
            "High performance, low price | Premium CPU underpriced | High RAM underpriced | Suspicious discount"
        );
    }

    #[test]
    fn missing_price_skips_rules() {
        let r = ProductRecord { performance_index: 95.0, ..ProductRecord::default() };
        assert_eq!(evaluate(&r, &RuleOptions::default()), (ConsistencyVerdict::MissingPrice, 0));
    }

    #[test]
    fn entry_cpu_overpriced() {
        let r = ProductRecord {
            price: Some(3500.0),
            performance_index: 45.0,
            cpu_family: CpuFamily::Celeron,
            ..ProductRecord::default()
        };
        let (_, severity) = evaluate(&r, &RuleOptions::default());
        assert_eq!(severity, 2);
    }
}
