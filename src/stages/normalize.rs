// src/stages/normalize.rs
//
// Field normalizer: raw text → typed fields. Never fails; anything that does not
// parse becomes `None` (not zero, not a sentinel string).

use rayon::prelude::*;
use regex::Captures;

use crate::config::catalog::{Catalog, TitlePatterns};
use crate::core::sanitize::{clean_title, fold};
use crate::core::stats::round_to;
use crate::record::{Condition, CpuFamily, ProductRecord, RawRecord, StorageType, OTHER_BRAND};

pub struct Normalizer<'a> {
    catalog: &'a Catalog,
}

impl<'a> Normalizer<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Normalize a whole batch. Row ids follow input order.
    pub fn normalize_all(&self, raws: Vec<RawRecord>) -> Vec<ProductRecord> {
        raws.into_par_iter()
            .enumerate()
            .map(|(row_id, raw)| self.normalize(row_id, raw))
            .collect()
    }

    pub fn normalize(&self, row_id: usize, mut raw: RawRecord) -> ProductRecord {
        raw.title = clean_title(&raw.title);
        let folded = fold(&raw.title);
        let pats = &self.catalog.patterns;

        let price = raw.price_text.as_deref().and_then(parse_price);
        let old_price = raw.old_price_text.as_deref().and_then(parse_price);
        let rating = raw.rating_text.as_deref().and_then(|t| parse_rating(pats, t));
        let advertised = raw.discount_text.as_deref().and_then(|t| parse_discount(pats, t));

        let (cpu_model, model_gen) = cpu_model(pats, &folded);
        let ram = pats.ram.captures(&folded);
        let ram_span = ram.as_ref().and_then(|c| c.get(0)).map(|m| (m.start(), m.end()));
        let ram_gb = ram.as_ref().and_then(first_number);
        let (storage_gb, storage_type) = storage(pats, &folded, ram_span);

        let mut rec = ProductRecord::from_raw(row_id, raw);
        rec.price = price;
        rec.old_price = old_price;
        rec.discount_pct = discount_pct(price, old_price);
        rec.advertised_discount_pct = advertised;
        rec.rating = rating;
        rec.brand = self.brand(&rec.raw.title);
        rec.cpu_family = cpu_family(pats, &folded);
        rec.cpu_generation = explicit_generation(pats, &folded).or(model_gen);
        rec.cpu_model = cpu_model;
        rec.ram_gb = ram_gb;
        rec.ram_type = pats.ram_type.captures(&folded).map(|c| c[1].to_ascii_uppercase());
        rec.storage_gb = storage_gb;
        rec.storage_type = storage_type;
        rec.nvme = pats.nvme.is_match(&folded);
        rec.screen_inches = screen(pats, &folded);
        rec.gpu = gpu(pats, &folded);
        rec.condition = self.condition(&folded);
        rec
    }

    fn brand(&self, title: &str) -> String {
        self.catalog
            .brands
            .iter()
            .find(|(_, re)| re.is_match(title))
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| s!(OTHER_BRAND))
    }

    /// Refurbished wins over used/new: "remis à neuf" contains "neuf".
    fn condition(&self, folded: &str) -> Condition {
        let hit = |re: &Option<regex::Regex>| re.as_ref().is_some_and(|r| r.is_match(folded));
        if hit(&self.catalog.refurbished) {
            Condition::Refurbished
        } else if hit(&self.catalog.used) {
            Condition::Used
        } else if hit(&self.catalog.new) {
            Condition::New
        } else {
            Condition::Unspecified
        }
    }
}

/* ---------------- Prices & ratings ---------------- */

/// `"1,389.00 Dhs"` → `1389.0`. Commas are thousands separators. No digits → `None`.
pub fn parse_price(text: &str) -> Option<f64> {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    if !kept.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let cleaned = kept.replace(',', "");
    let value: f64 = cleaned.trim_matches('.').parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Percentage markdown from old to current price, two decimals.
/// 0 when either price is missing or the old price is not positive.
pub fn discount_pct(price: Option<f64>, old_price: Option<f64>) -> f64 {
    match (price, old_price) {
        (Some(p), Some(old)) if old > 0.0 => round_to((old - p) / old * 100.0, 2),
        _ => 0.0,
    }
}

/// `"4.5 out of 5"` → `4.5`. Other scales are rescaled to 5.
fn parse_rating(pats: &TitlePatterns, text: &str) -> Option<f64> {
    let caps = pats.rating.captures(text)?;
    let value: f64 = caps[1].replace(',', ".").parse().ok()?;
    let scale: f64 = caps[2].parse().ok()?;
    if scale <= 0.0 {
        return None;
    }
    let rating = if scale == 5.0 { value } else { value * 5.0 / scale };
    (0.0..=5.0).contains(&rating).then(|| round_to(rating, 2))
}

/// Badge text such as `"-20%"` → `20.0`.
fn parse_discount(pats: &TitlePatterns, text: &str) -> Option<f64> {
    let caps = pats.discount.captures(text)?;
    let pct: f64 = caps[1].replace(',', ".").parse().ok()?;
    Some(pct.clamp(0.0, 100.0))
}

/* ---------------- Title specs ---------------- */

fn cpu_family(pats: &TitlePatterns, folded: &str) -> CpuFamily {
    pats.cpu
        .iter()
        .find(|(_, re)| re.is_match(folded))
        .map(|(fam, _)| *fam)
        .unwrap_or(CpuFamily::Other)
}

/// Model string plus the generation implied by an Intel model number
/// (`10510U` → 10, `1165G7` → 11, `8250U` → 8). Four-digit numbers starting
/// with 1 belong to generations 10 and up.
fn cpu_model(pats: &TitlePatterns, folded: &str) -> (Option<String>, Option<u32>) {
    if let Some(c) = pats.intel_model.captures(folded) {
        let digits = &c[2];
        let model = format!("i{}-{}{}", &c[1], digits, c[3].to_ascii_uppercase());
        let two = digits.len() == 5 || digits.starts_with('1');
        let generation = digits
            .get(..if two { 2 } else { 1 })
            .and_then(|d| d.parse().ok())
            .filter(|g| *g > 0);
        return (Some(model), generation);
    }
    if let Some(c) = pats.ryzen_model.captures(folded) {
        let model = format!("Ryzen {} {}{}", &c[1], &c[2], c[3].to_ascii_uppercase());
        return (Some(model), None);
    }
    (None, None)
}

/// Words that make a nearby "gen N" describe a bus or port, not the CPU.
const INTERFACE_WORDS: [&str; 7] = ["pcie", "pci", "nvme", "ssd", "m.2", "usb", "thunderbolt"];

/// "11th Gen", "gen 12". Matches right after or before an interface word
/// ("PCIe Gen4", "Gen4 NVMe", "USB 3.2 Gen 2") are skipped.
fn explicit_generation(pats: &TitlePatterns, folded: &str) -> Option<u32> {
    pats.generation
        .captures_iter(folded)
        .filter(|caps| caps.get(0).is_some_and(|m| !near_interface(folded, m.start(), m.end())))
        .find_map(|caps| first_number(&caps).filter(|g| (1..=20).contains(g)))
}

fn near_interface(folded: &str, start: usize, end: usize) -> bool {
    let word = |w: &str| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '.').to_string();
    let before = folded[..start].split_whitespace().rev().take(2).map(word);
    let after = folded[end..].split_whitespace().take(1).map(word);
    before.chain(after).any(|w| INTERFACE_WORDS.contains(&w.as_str()))
}

/// First participating numeric capture group.
fn first_number(caps: &Captures<'_>) -> Option<u32> {
    caps.iter().skip(1).flatten().find_map(|m| m.as_str().parse().ok())
}

fn to_gb(n: u32, unit: &str) -> Option<u32> {
    match unit {
        "tb" | "to" => n.checked_mul(1024),
        _ => Some(n),
    }
}

/// `(number, unit)` from whichever alternation of a size pattern matched.
fn size_of(caps: &Captures<'_>) -> Option<u32> {
    let groups: Vec<&str> = caps.iter().skip(1).flatten().map(|m| m.as_str()).collect();
    match groups.as_slice() {
        [n, unit, ..] => to_gb(n.parse().ok()?, unit),
        _ => None,
    }
}

/// SSD and HDD are detected separately and summed. Without either keyword the
/// largest plausible size token (not the RAM one) is taken with unknown type.
fn storage(
    pats: &TitlePatterns,
    folded: &str,
    ram_span: Option<(usize, usize)>,
) -> (Option<u32>, Option<StorageType>) {
    let ssd = pats.ssd.captures(folded).and_then(|c| size_of(&c));
    // "256gb sata ssd" is an SSD; only a bare "sata" means a hard drive.
    let hdd = pats
        .hdd
        .captures_iter(folded)
        .filter(|c| c.get(0).is_some_and(|m| !folded[m.end()..].trim_start().starts_with("ssd")))
        .find_map(|c| size_of(&c));

    match (ssd, hdd) {
        (Some(s), Some(h)) => return (Some(s.saturating_add(h)), Some(StorageType::Ssd)),
        (Some(s), None) => return (Some(s), Some(StorageType::Ssd)),
        (None, Some(h)) => return (Some(h), Some(StorageType::Hdd)),
        (None, None) => {}
    }

    let overlaps_ram = |start: usize, end: usize| {
        ram_span.is_some_and(|(rs, re)| start < re && rs < end)
    };
    let best = pats
        .size
        .captures_iter(folded)
        .filter(|c| c.get(0).is_some_and(|m| !overlaps_ram(m.start(), m.end())))
        .filter(|c| !matches!(&c[2], "tb" | "to") || c[1].parse::<u32>().is_ok_and(|n| n <= 8))
        .filter_map(|c| size_of(&c))
        .filter(|gb| *gb >= 64)
        .max();

    match best {
        Some(gb) => (Some(gb), Some(StorageType::Unknown)),
        None => (None, None),
    }
}

fn screen(pats: &TitlePatterns, folded: &str) -> Option<f64> {
    let caps = pats.screen.captures(folded)?;
    let whole: f64 = caps[1].parse().ok()?;
    let frac = caps.get(2).and_then(|m| m.as_str().parse::<f64>().ok()).unwrap_or(0.0);
    Some(whole + frac / 10.0)
}

fn gpu(pats: &TitlePatterns, folded: &str) -> Option<String> {
    if let Some(c) = pats.gpu_nvidia.captures(folded) {
        return Some(format!("NVIDIA {} {}", c[1].to_ascii_uppercase(), &c[2]));
    }
    if let Some(c) = pats.gpu_amd.captures(folded) {
        return Some(match c.get(1) {
            Some(m) => format!("AMD Radeon {}", m.as_str().to_ascii_uppercase()),
            None => s!("AMD Radeon"),
        });
    }
    if let Some(c) = pats.gpu_intel.captures(folded) {
        let series = match &c[1] {
            "uhd" => "UHD",
            "hd" => "HD",
            s if s.starts_with("iris") && s.ends_with("xe") => "Iris Xe",
            _ => "Iris",
        };
        return Some(format!("Intel {series} Graphics"));
    }
    None
}
