// src/stages/tags.rs
use rayon::prelude::*;

use crate::record::{Condition, CpuFamily, DealClass, ProductRecord, StorageType, OTHER_BRAND};

pub fn tags(r: &ProductRecord) -> String {
    let mut out: Vec<&str> = vec![r.tier.label()];
    if r.brand != OTHER_BRAND {
        out.push(&r.brand);
    }
    if r.performance_index >= 80.0 {
        out.push("High performance");
    } else if r.performance_index >= 50.0 {
        out.push("Decent performance");
    }
    out.push(r.condition.label());
    if r.storage_type == Some(StorageType::Ssd) {
        out.push("SSD");
    }
    if r.deal_class != DealClass::Standard {
        out.push("Good deal");
    }
    if r.discount_pct >= 30.0 {
        out.push("Promotion");
    }
    out.join(", ")
}

/// One-line human summary, or "Limited information" when nothing is known.
pub fn summary(r: &ProductRecord) -> String {
    let mut parts: Vec<String> = Vec::new();

    if r.brand != OTHER_BRAND {
        parts.push(r.brand.clone());
    }
    match (&r.cpu_model, r.cpu_family) {
        (Some(model), _) => parts.push(join!("CPU ", model.as_str())),
        (None, CpuFamily::Other) => {}
        (None, fam) => parts.push(join!("CPU ", fam.label())),
    }
    if let Some(ram) = r.ram_gb {
        let mut text = format!("{ram}GB RAM");
        if let Some(kind) = &r.ram_type {
            text = join!(&text, " ", kind.as_str());
        }
        parts.push(text);
    }
    if let Some(gb) = r.storage_gb {
        let mut text = if gb >= 1024 { format!("{}TB", gb / 1024) } else { format!("{gb}GB") };
        if r.nvme {
            text.push_str(" NVMe SSD");
        } else if let Some(kind) = r.storage_type.filter(|k| *k != StorageType::Unknown) {
            text = join!(&text, " ", kind.label());
        }
        parts.push(text);
    }
    if let Some(inches) = r.screen_inches {
        parts.push(format!("{inches:.1}\" screen"));
    }
    if r.condition != Condition::Unspecified {
        parts.push(s!(r.condition.label()));
    }
    if let Some(price) = r.price {
        parts.push(format!("{price:.0} Dhs"));
    }

    if parts.is_empty() { s!("Limited information") } else { parts.join(" | ") }
}

pub fn annotate(records: &mut [ProductRecord]) {
    records.par_iter_mut().for_each(|r| {
        r.tags = tags(r);
        r.summary = summary(r);
    });
    logd!("Tags: {} records annotated", records.len());
}
