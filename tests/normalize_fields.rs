// tests/normalize_fields.rs
use market_enrich::config::catalog::{Catalog, CatalogOptions};
use market_enrich::record::{Condition, CpuFamily, StorageType};
use market_enrich::stages::normalize::{discount_pct, parse_price, Normalizer};
use market_enrich::RawRecord;

fn catalog() -> Catalog {
    Catalog::new(&CatalogOptions::default()).unwrap()
}

fn listing(title: &str, price: &str, old: Option<&str>, rating: Option<&str>) -> RawRecord {
    RawRecord {
        title: title.into(),
        price_text: Some(price.into()),
        old_price_text: old.map(Into::into),
        rating_text: rating.map(Into::into),
        ..RawRecord::default()
    }
}

#[test]
fn localized_prices() {
    assert_eq!(parse_price("1,389.00 Dhs"), Some(1389.00));
    assert_eq!(parse_price("N/A"), None);
    assert_eq!(parse_price("Dhs 899"), Some(899.0));
}

#[test]
fn reduction_from_old_price() {
    assert_eq!(discount_pct(Some(800.0), Some(1000.0)), 20.0);
    assert_eq!(discount_pct(Some(800.0), None), 0.0);
}

#[test]
fn french_listing_end_to_end() {
    let cat = catalog();
    let rec = Normalizer::new(&cat).normalize(
        0,
        listing(
            "PC Portable Lenovo IdeaPad 3 - Intel Core i5-1135G7 - 8Go RAM - 512Go SSD - 15,6\" - Reconditionné",
            "4,299.00 Dhs",
            Some("5,499.00 Dhs"),
            Some("4.2 out of 5"),
        ),
    );
    assert_eq!(rec.brand, "Lenovo");
    assert_eq!(rec.cpu_family, CpuFamily::CoreI5);
    assert_eq!(rec.cpu_generation, Some(11));
    assert_eq!(rec.ram_gb, Some(8));
    assert_eq!(rec.storage_gb, Some(512));
    assert_eq!(rec.storage_type, Some(StorageType::Ssd));
    assert_eq!(rec.screen_inches, Some(15.6));
    assert_eq!(rec.condition, Condition::Refurbished);
    assert_eq!(rec.price, Some(4299.0));
    assert_eq!(rec.old_price, Some(5499.0));
    assert_eq!(rec.discount_pct, 21.82);
    assert_eq!(rec.rating, Some(4.2));
}

#[test]
fn advertised_discount_never_replaces_derived() {
    let cat = catalog();
    let mut raw = listing("HP 250 G8 i3 4GB RAM", "2,000 Dhs", None, None);
    raw.discount_text = Some("-25%".into());
    let rec = Normalizer::new(&cat).normalize(0, raw);
    assert_eq!(rec.advertised_discount_pct, Some(25.0));
    assert_eq!(rec.discount_pct, 0.0);
}

#[test]
fn batch_keeps_input_order() {
    let cat = catalog();
    let raws: Vec<RawRecord> = (0..50)
        .map(|i| listing(&format!("Dell Vostro {i} i7 16GB RAM"), &format!("{} Dhs", 3000 + i), None, None))
        .collect();
    let recs = Normalizer::new(&cat).normalize_all(raws);
    for (i, r) in recs.iter().enumerate() {
        assert_eq!(r.row_id, i);
        assert_eq!(r.price, Some(3000.0 + i as f64));
    }
}

#[test]
fn word_boundaries_prevent_false_cpu_hits() {
    let cat = catalog();
    let n = Normalizer::new(&cat);
    let rec = n.normalize(0, listing("Hyundai i30 accessoire", "100 Dhs", None, None));
    assert_eq!(rec.cpu_family, CpuFamily::Other);
    assert_eq!(rec.brand, "Other");
}

#[test]
fn gpu_and_ram_type() {
    let cat = catalog();
    let n = Normalizer::new(&cat);
    let rec = n.normalize(
        0,
        listing("Asus TUF Gaming Ryzen 7 5800H 16GB RAM DDR4 1TB SSD NVIDIA GeForce RTX 3060", "9,999 Dhs", None, None),
    );
    assert_eq!(rec.cpu_family, CpuFamily::Ryzen7);
    assert_eq!(rec.cpu_model.as_deref(), Some("Ryzen 7 5800H"));
    assert_eq!(rec.cpu_generation, None);
    assert_eq!(rec.ram_type.as_deref(), Some("DDR4"));
    assert_eq!(rec.storage_gb, Some(1024));
    assert_eq!(rec.gpu.as_deref(), Some("NVIDIA RTX 3060"));
}
