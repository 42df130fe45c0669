// tests/scoring_bounds.rs
//! Property tests for score bounds and tier purity.

use market_enrich::config::options::TierOptions;
use market_enrich::record::{Condition, CpuFamily, DealClass, ProductRecord, StorageType};
use market_enrich::stages::{confidence, normalize, scoring, tier};
use proptest::prelude::*;

fn cpu() -> impl Strategy<Value = CpuFamily> {
    prop::sample::select(vec![
        CpuFamily::CoreI9, CpuFamily::CoreI7, CpuFamily::CoreI5, CpuFamily::CoreI3,
        CpuFamily::Ryzen9, CpuFamily::Ryzen7, CpuFamily::Ryzen5, CpuFamily::Ryzen3,
        CpuFamily::Pentium, CpuFamily::Celeron, CpuFamily::Other,
    ])
}

fn condition() -> impl Strategy<Value = Condition> {
    prop::sample::select(vec![Condition::New, Condition::Refurbished, Condition::Used, Condition::Unspecified])
}

fn deal() -> impl Strategy<Value = DealClass> {
    prop::sample::select(vec![DealClass::Standard, DealClass::Promo, DealClass::Good, DealClass::Excellent])
}

prop_compose! {
    fn record()(
        cpu in cpu(),
        ram in prop::option::of(0u32..=256),
        storage in prop::option::of(0u32..=8192),
        ssd in any::<bool>(),
        generation in prop::option::of(0u32..=20),
        rating in prop::option::of(0.0f64..=5.0),
        completeness in 0.0f64..=100.0,
        discount in -500.0f64..=100.0,
        condition in condition(),
        deal in deal(),
        suspicious in any::<bool>(),
        ml in any::<bool>(),
    ) -> ProductRecord {
        ProductRecord {
            cpu_family: cpu,
            ram_gb: ram,
            storage_gb: storage,
            storage_type: Some(if ssd { StorageType::Ssd } else { StorageType::Hdd }),
            cpu_generation: generation,
            rating,
            completeness_pct: completeness,
            discount_pct: discount,
            condition,
            deal_class: deal,
            suspicious_flag: suspicious,
            multivariate_anomaly_flag: ml,
            ..ProductRecord::default()
        }
    }
}

proptest! {
    #[test]
    fn scores_are_clamped(mut r in record()) {
        r.performance_index = scoring::performance_index(&r);
        r.quality_score = scoring::quality_score(&r);
        r.confidence_index = confidence::confidence_index(&r);
        prop_assert!((0.0..=100.0).contains(&r.performance_index));
        prop_assert!((0.0..=100.0).contains(&r.quality_score));
        prop_assert!((0.0..=100.0).contains(&r.confidence_index));
        prop_assert!((1.0..=5.0).contains(&confidence::vendor_reliability(&r)));
    }

    #[test]
    fn tier_ignores_everything_but_price_cpu_ram(
        a in record(),
        b in record(),
        price in prop::option::of(0.0f64..20_000.0),
    ) {
        let opts = TierOptions::default();
        let mut b = b;
        b.cpu_family = a.cpu_family;
        b.ram_gb = a.ram_gb;
        let ta = tier::classify(price, a.cpu_family, a.ram_gb, &opts);
        let tb = tier::classify(price, b.cpu_family, b.ram_gb, &opts);
        prop_assert_eq!(ta, tb);
        prop_assert_eq!(ta, tier::classify(price, a.cpu_family, a.ram_gb, &opts));
    }

    #[test]
    fn price_parse_never_negative(text in "\\PC{0,24}") {
        if let Some(p) = normalize::parse_price(&text) {
            prop_assert!(p >= 0.0);
        }
    }

    #[test]
    fn discount_is_zero_without_positive_old_price(price in 0.0f64..10_000.0, old in -100.0f64..=0.0) {
        prop_assert_eq!(normalize::discount_pct(Some(price), Some(old)), 0.0);
        prop_assert_eq!(normalize::discount_pct(Some(price), None), 0.0);
    }
}
