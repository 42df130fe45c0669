// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::BTreeMap;

use market_enrich::RawRecord;

pub const BRANDS: [&str; 8] = ["HP", "Dell", "Lenovo", "Asus", "Acer", "Apple", "MSI", "Toshiba"];
pub const CPUS: [&str; 8] = ["Core i3", "Core i5", "Core i7", "Core i9", "Ryzen 5", "Ryzen 7", "Celeron", "Pentium"];
pub const STORAGE: [&str; 5] = ["256GB SSD", "512GB SSD", "1TB HDD", "128GB SSD", ""];

pub const ACCESSORIES: [&str; 5] = [
    "Souris sans fil Logitech M185",
    "Sacoche pour PC portable 15.6\"",
    "Chargeur HP 65W original",
    "Tapis de souris gaming XXL",
    "Casque Bluetooth pliable",
];

/// Row id of the high-spec, cheap listing.
pub const UNDERPRICED_ROW: usize = 91;

pub struct Fixture {
    pub raws: Vec<RawRecord>,
    /// Expected completeness for every laptop row, keyed by row id.
    pub completeness: BTreeMap<usize, f64>,
}

fn money(p: u32) -> String {
    if p >= 1000 {
        format!("{},{:03}.00 Dhs", p / 1000, p % 1000)
    } else {
        format!("{p}.00 Dhs")
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// 92 laptops, then 5 accessories, then 3 re-listings of laptops 10, 20, 30.
pub fn batch_100() -> Fixture {
    let mut raws = Vec::with_capacity(100);
    let mut completeness = BTreeMap::new();

    for i in 0..92usize {
        let brand = BRANDS[i % 8];
        let cpu = CPUS[(i * 3) % 8];
        let ram = [4, 8, 16, 32][i % 4];
        let storage = STORAGE[i % 5];
        let price = 1500 + (i as u32 * 137) % 9000;

        let mut raw = RawRecord {
            title: format!("{brand} Laptop X{i} {cpu} {ram}GB RAM {storage}"),
            price_text: Some(if i % 23 == 0 { "N/A".into() } else { money(price) }),
            old_price_text: (i % 4 == 0).then(|| money(price + price / 4)),
            rating_text: (i % 3 == 0).then(|| format!("{}.{} out of 5", 3 + (i / 3) % 2, i % 10)),
            image_reference: Some(format!("https://img.example/{i}.jpg")),
            source: Some("fixture".into()),
            collected_at: Some("2024-03-01".into()),
            ..RawRecord::default()
        };
        let mut present = 2 + 1; // brand, cpu family, ram
        present += usize::from(i % 23 != 0);
        present += usize::from(!storage.is_empty());
        present += usize::from(i % 3 == 0);

        if i == UNDERPRICED_ROW {
            raw.title = "MSI Stealth Core i9 13th Gen 32GB RAM 1TB SSD".into();
            raw.price_text = Some(money(2800));
            raw.old_price_text = None;
            raw.rating_text = None;
            present = 5;
        }
        completeness.insert(i, round1(present as f64 / 6.0 * 100.0));
        raws.push(raw);
    }

    for (k, title) in ACCESSORIES.iter().enumerate() {
        raws.push(RawRecord {
            title: title.to_string(),
            price_text: Some(money(150 + k as u32 * 40)),
            image_reference: Some(format!("https://img.example/acc{k}.jpg")),
            ..RawRecord::default()
        });
    }

    for i in [10, 20, 30] {
        let mut dup = raws[i].clone();
        dup.title = format!("{} (relisted)", dup.title);
        raws.push(dup);
    }

    Fixture { raws, completeness }
}
