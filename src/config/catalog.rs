// src/config/catalog.rs
//
// Extraction catalogs: brand names, accessory and condition keywords, and the
// title patterns for CPU/RAM/storage/screen/GPU. Built once from options and
// handed to the normalizer and the quality gate by reference.
//
// Keyword lists are matched against *folded* titles (lowercase, no accents),
// so entries must be written folded as well.

use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::record::CpuFamily;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogOptions {
    /// Display names, checked in order; first whole-word hit wins.
    pub brands: Vec<String>,
    /// Non-laptop listing markers (mice, bags, chargers, monitors, …).
    pub accessories: Vec<String>,
    pub refurbished: Vec<String>,
    pub used: Vec<String>,
    pub new: Vec<String>,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        let list = |xs: &[&str]| xs.iter().map(|x| x.to_string()).collect::<Vec<_>>();
        Self {
            brands: list(&[
                "HP", "Dell", "Lenovo", "Asus", "Acer", "Apple", "Samsung", "MSI",
                "Toshiba", "Huawei", "Xiaomi", "Microsoft", "Logitech",
            ]),
            accessories: list(&[
                "souris", "mouse", "sac", "sacoche", "cartable", "bag", "backpack",
                "tapis", "chargeur", "charger", "cable", "adaptateur", "adapter",
                "moniteur", "monitor", "enceinte", "haut-parleur", "speaker",
                "casque", "headset", "webcam", "hub", "station d'accueil", "docking",
                "refroidisseur", "ventilateur", "cooling pad", "lampe", "stickers",
                "autocollant", "housse", "sleeve",
            ]),
            refurbished: list(&["remis a neuf", "reconditionn", "refurbished", "refurb", "renewed"]),
            used: list(&["occasion", "used", "seconde main", "second hand"]),
            new: list(&["neuf", "new", "nouveau"]),
        }
    }
}

/// Compiled catalogs. Immutable once built.
#[derive(Debug)]
pub struct Catalog {
    pub brands: Vec<(String, Regex)>,
    pub accessory: Option<Regex>,
    pub refurbished: Option<Regex>,
    pub used: Option<Regex>,
    pub new: Option<Regex>,
    pub patterns: TitlePatterns,
}

/// Fixed title patterns. All run against folded titles.
#[derive(Debug)]
pub struct TitlePatterns {
    /// Highest class first: a 9-class chip must win over a 3-class token.
    pub cpu: Vec<(CpuFamily, Regex)>,
    pub intel_model: Regex,
    pub ryzen_model: Regex,
    pub generation: Regex,
    pub ram: Regex,
    pub ram_type: Regex,
    pub ssd: Regex,
    pub hdd: Regex,
    pub size: Regex,
    pub nvme: Regex,
    pub screen: Regex,
    pub gpu_nvidia: Regex,
    pub gpu_amd: Regex,
    pub gpu_intel: Regex,
    pub rating: Regex,
    pub discount: Regex,
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::Catalog { pattern: pattern.to_string(), source })
}

/// One alternation over escaped keywords, anchored at a word start.
/// `None` for an empty list so callers never match everything.
fn keyword_set(words: &[String]) -> Result<Option<Regex>> {
    let alts: Vec<String> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();
    if alts.is_empty() {
        return Ok(None);
    }
    compile(&format!(r"\b(?:{})", alts.join("|"))).map(Some)
}

impl Catalog {
    pub fn new(opts: &CatalogOptions) -> Result<Self> {
        let mut brands = Vec::with_capacity(opts.brands.len());
        for name in &opts.brands {
            let name = name.trim();
            if name.is_empty() { continue; }
            let re = compile(&format!(r"(?i)\b{}\b", regex::escape(name)))?;
            brands.push((name.to_string(), re));
        }

        Ok(Self {
            brands,
            accessory: keyword_set(&opts.accessories)?,
            refurbished: keyword_set(&opts.refurbished)?,
            used: keyword_set(&opts.used)?,
            new: keyword_set(&opts.new)?,
            patterns: TitlePatterns::new()?,
        })
    }

    pub fn is_accessory(&self, folded_title: &str) -> bool {
        self.accessory.as_ref().is_some_and(|re| re.is_match(folded_title))
    }
}

impl TitlePatterns {
    fn new() -> Result<Self> {
        let size = r"([0-9]{1,4})\s*(gb|go|tb|to)\b";
        Ok(Self {
            cpu: vec![
                (CpuFamily::CoreI9, compile(r"\b(?:core\s*)?i9\b")?),
                (CpuFamily::CoreI7, compile(r"\b(?:core\s*)?i7\b")?),
                (CpuFamily::CoreI5, compile(r"\b(?:core\s*)?i5\b")?),
                (CpuFamily::CoreI3, compile(r"\b(?:core\s*)?i3\b")?),
                (CpuFamily::Ryzen9, compile(r"\bryzen\s*9\b")?),
                (CpuFamily::Ryzen7, compile(r"\bryzen\s*7\b")?),
                (CpuFamily::Ryzen5, compile(r"\bryzen\s*5\b")?),
                (CpuFamily::Ryzen3, compile(r"\bryzen\s*3\b")?),
                (CpuFamily::Celeron, compile(r"\bceleron\b")?),
                (CpuFamily::Pentium, compile(r"\bpentium\b")?),
            ],
            intel_model: compile(r"\bi([3579])[\s-]*([0-9]{4,5})([a-z]{0,2}[0-9]?)\b")?,
            ryzen_model: compile(r"\bryzen\s*([3579])\s*(?:pro\s*)?([0-9]{4})([a-z]{0,2})\b")?,
            generation: compile(
                r"\b([0-9]{1,2})\s*(?:th|rd|nd|st|eme|em|e)?\s*(?:gen|generation)\b|\bgen\s*([0-9]{1,2})\b",
            )?,
            ram: compile(
                r"\b([0-9]{1,3})\s*(?:gb|go|g)\b\s*(?:de\s+)?(?:ram|memoire|lpddr[0-9]|ddr[0-9]?)|\bram\s*:?\s*([0-9]{1,3})\s*(?:gb|go)\b",
            )?,
            ram_type: compile(r"\b(lpddr[345]x?|ddr[345])\b")?,
            ssd: compile(&format!(
                r"\b{size}\s*(?:(?:m\.2|nvme|pcie|sata)\s*)*ssd|\bssd\s*(?:(?:nvme|sata)\s*)?:?\s*{size}"
            ))?,
            hdd: compile(&format!(
                r"\b{size}\s*(?:hdd|disque dur|sata)|\b(?:hdd|disque dur)\s*:?\s*{size}"
            ))?,
            size: compile(&format!(r"\b{size}"))?,
            nvme: compile(r"\bnvme\b|\bm\.2\b")?,
            screen: compile(
                r#"\b(1[0-9]|2[01])(?:[.,]([0-9]))?\s*(?:"|''|”|pouces?\b|inch(?:es)?\b|po\b|-inch\b)"#,
            )?,
            gpu_nvidia: compile(r"\b(?:nvidia\s*)?(?:geforce\s*)?(gtx|rtx|mx)\s*([0-9]{3,4})\b")?,
            gpu_amd: compile(r"\bradeon\s*(rx\s*[0-9]{3,4}[a-z]*|vega\s*[0-9]*)?")?,
            gpu_intel: compile(r"\b(iris\s*xe|iris|uhd|hd)\s*graphics\b")?,
            rating: compile(r"(?i)([0-9]+(?:[.,][0-9]+)?)\s*(?:out of|sur)\s*([0-9]+)")?,
            discount: compile(r"([0-9]{1,3}(?:[.,][0-9]+)?)\s*%")?,
        })
    }
}
