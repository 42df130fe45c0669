// src/stages/gate.rs
//
// Quality gate: drops accessory listings and duplicate listings, then stamps
// each survivor with its completeness percentage. The only stage that removes
// records.

use std::collections::HashSet;

use crate::config::catalog::Catalog;
use crate::core::sanitize::fold;
use crate::core::stats::round_to;
use crate::record::ProductRecord;

/// Number of checklist fields behind `completeness_pct`.
pub const COMPLETENESS_FIELDS: usize = 6;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GateStats {
    pub initial: usize,
    pub accessories: usize,
    pub duplicates: usize,
    pub kept: usize,
}

pub struct QualityGate<'a> {
    catalog: &'a Catalog,
}

impl<'a> QualityGate<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Accessory filter, then duplicate filter, then completeness. Input order is
    /// preserved for the survivors.
    pub fn apply(&self, records: Vec<ProductRecord>) -> (Vec<ProductRecord>, GateStats) {
        let mut stats = GateStats { initial: records.len(), ..GateStats::default() };

        let mut kept: Vec<ProductRecord> = records
            .into_iter()
            .filter(|r| {
                let drop = self.catalog.is_accessory(&fold(r.title()));
                if drop {
                    logd!("Gate: accessory dropped (row {}): {}", r.row_id, r.title());
                }
                !drop
            })
            .collect();
        stats.accessories = stats.initial - kept.len();

        let before = kept.len();
        kept = dedup_by_image(kept);
        stats.duplicates = before - kept.len();

        for r in &mut kept {
            r.completeness_pct = completeness(r);
        }
        stats.kept = kept.len();

        logf!(
            "Gate: {} in, {} accessories, {} duplicates, {} kept",
            stats.initial, stats.accessories, stats.duplicates, stats.kept
        );
        (kept, stats)
    }
}

/// First record per non-empty image reference wins. Records without an image
/// reference are never treated as duplicates of each other.
pub fn dedup_by_image(records: Vec<ProductRecord>) -> Vec<ProductRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    records
        .into_iter()
        .filter(|r| match r.raw.image_reference.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => seen.insert(key.to_string()),
            _ => true,
        })
        .collect()
}

/// Share of the checklist (price, brand, cpu_family, ram_gb, storage_gb,
/// rating) that is present. Brand and CPU family always hold a value, with
/// "Other" counting as present.
pub fn completeness(r: &ProductRecord) -> f64 {
    let present = [
        r.price.is_some(),
        !r.brand.is_empty(),
        true,
        r.ram_gb.is_some(),
        r.storage_gb.is_some(),
        r.rating.is_some(),
    ]
    .iter()
    .filter(|p| **p)
    .count();
    round_to(present as f64 / COMPLETENESS_FIELDS as f64 * 100.0, 1)
}
