// src/stages/tier.rs
use rayon::prelude::*;

use crate::config::options::TierOptions;
use crate::record::{CpuFamily, ProductRecord, Tier};

/// Rule cascade, first match wins. Pure in (price, cpu, ram).
pub fn classify(price: Option<f64>, cpu: CpuFamily, ram_gb: Option<u32>, opts: &TierOptions) -> Tier {
    let Some(price) = price else {
        return Tier::Unclassified;
    };
    if price > opts.high || opts.premium_cpus.contains(&cpu) || ram_gb.is_some_and(|r| r >= opts.high_ram_gb) {
        Tier::High
    } else if price < opts.low || opts.entry_cpus.contains(&cpu) || ram_gb.is_some_and(|r| r <= opts.low_ram_gb) {
        Tier::Entry
    } else {
        Tier::Mid
    }
}

pub fn assign(records: &mut [ProductRecord], opts: &TierOptions) {
    records.par_iter_mut().for_each(|r| {
        r.tier = classify(r.price, r.cpu_family, r.ram_gb, opts);
    });
    logf!(
        "Tiers: {} entry, {} mid, {} high, {} unclassified",
        count(records, Tier::Entry),
        count(records, Tier::Mid),
        count(records, Tier::High),
        count(records, Tier::Unclassified)
    );
}

fn count(records: &[ProductRecord], tier: Tier) -> usize {
    records.iter().filter(|r| r.tier == tier).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cascade_order() {
        let o = TierOptions::default();
        assert_eq!(classify(None, CpuFamily::CoreI9, Some(64), &o), Tier::Unclassified);
        assert_eq!(classify(Some(6000.0), CpuFamily::Celeron, Some(4), &o), Tier::High);
        // Premium CPU beats a low price.
        assert_eq!(classify(Some(1500.0), CpuFamily::CoreI7, None, &o), Tier::High);
        assert_eq!(classify(Some(3000.0), CpuFamily::CoreI5, Some(16), &o), Tier::High);
        assert_eq!(classify(Some(2000.0), CpuFamily::CoreI5, Some(8), &o), Tier::Entry);
        assert_eq!(classify(Some(3000.0), CpuFamily::CoreI3, Some(8), &o), Tier::Entry);
        assert_eq!(classify(Some(3000.0), CpuFamily::CoreI5, Some(4), &o), Tier::Entry);
        assert_eq!(classify(Some(3000.0), CpuFamily::CoreI5, None, &o), Tier::Mid);
        assert_eq!(classify(Some(5000.0), CpuFamily::Other, Some(8), &o), Tier::Mid);
    }
}
