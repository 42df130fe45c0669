// tests/quality_gate.rs
mod common;

use market_enrich::config::catalog::{Catalog, CatalogOptions};
use market_enrich::stages::gate::{GateStats, QualityGate};
use market_enrich::stages::normalize::Normalizer;

#[test]
fn fixture_drops_accessories_and_relistings() {
    let cat = Catalog::new(&CatalogOptions::default()).unwrap();
    let records = Normalizer::new(&cat).normalize_all(common::batch_100().raws);
    let (kept, stats) = QualityGate::new(&cat).apply(records);

    assert_eq!(stats, GateStats { initial: 100, accessories: 5, duplicates: 3, kept: 92 });
    assert!(kept.iter().all(|r| !r.title().contains("relisted")));
    assert!(kept.iter().all(|r| !common::ACCESSORIES.contains(&r.title())));
}

#[test]
fn custom_accessory_list_replaces_default() {
    let opts = CatalogOptions { accessories: vec!["docking".into()], ..CatalogOptions::default() };
    let cat = Catalog::new(&opts).unwrap();
    let raws = common::batch_100().raws;
    let records = Normalizer::new(&cat).normalize_all(raws);
    let (_, stats) = QualityGate::new(&cat).apply(records);
    assert_eq!(stats.accessories, 0);
    assert_eq!(stats.duplicates, 3);
}

#[test]
fn completeness_is_a_percentage() {
    let cat = Catalog::new(&CatalogOptions::default()).unwrap();
    let records = Normalizer::new(&cat).normalize_all(common::batch_100().raws);
    let (kept, _) = QualityGate::new(&cat).apply(records);
    assert!(kept.iter().all(|r| (0.0..=100.0).contains(&r.completeness_pct)));
    assert!(kept.iter().any(|r| r.completeness_pct == 100.0));
}
