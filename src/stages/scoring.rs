// src/stages/scoring.rs
//
// Performance index and composite quality score. Both are pure per-record
// functions, hard-clamped to [0, 100].

use rayon::prelude::*;

use crate::core::stats::{clamp_score, mean, round_to};
use crate::record::{Condition, CpuFamily, ProductRecord, StorageType};

/// Base score per CPU family, before the 40% weight.
pub fn cpu_score(cpu: CpuFamily) -> f64 {
    match cpu {
        CpuFamily::CoreI9 | CpuFamily::Ryzen9 => 100.0,
        CpuFamily::CoreI7 | CpuFamily::Ryzen7 => 85.0,
        CpuFamily::CoreI5 | CpuFamily::Ryzen5 => 60.0,
        CpuFamily::CoreI3 | CpuFamily::Ryzen3 => 35.0,
        CpuFamily::Pentium => 20.0,
        CpuFamily::Celeron => 10.0,
        CpuFamily::Other => 0.0,
    }
}

fn ram_points(ram_gb: Option<u32>) -> f64 {
    match ram_gb.unwrap_or(0) {
        r if r >= 32 => 30.0,
        r if r >= 16 => 25.0,
        r if r >= 8 => 18.0,
        r if r >= 4 => 10.0,
        _ => 0.0,
    }
}

fn storage_points(storage_gb: Option<u32>, kind: Option<StorageType>) -> f64 {
    let size = match storage_gb.unwrap_or(0) {
        s if s >= 512 => 15.0,
        s if s >= 256 => 10.0,
        s if s >= 128 => 5.0,
        _ => 0.0,
    };
    let ssd = if kind == Some(StorageType::Ssd) { 5.0 } else { 0.0 };
    size + ssd
}

fn generation_points(generation: Option<u32>) -> f64 {
    match generation.unwrap_or(0) {
        g if g >= 11 => 10.0,
        g if g >= 8 => 7.0,
        g if g >= 6 => 4.0,
        g if g >= 4 => 2.0,
        _ => 0.0,
    }
}

pub fn performance_index(r: &ProductRecord) -> f64 {
    let total = cpu_score(r.cpu_family) * 0.40
        + ram_points(r.ram_gb)
        + storage_points(r.storage_gb, r.storage_type)
        + generation_points(r.cpu_generation);
    round_to(clamp_score(total), 1)
}

/// Condition points on their 10-point budget.
pub fn condition_score(c: Condition) -> f64 {
    match c {
        Condition::New => 10.0,
        Condition::Refurbished => 7.0,
        Condition::Used => 4.0,
        Condition::Unspecified => 2.0,
    }
}

/// Needs `performance_index` and `completeness_pct` already set.
pub fn quality_score(r: &ProductRecord) -> f64 {
    let rating = r.rating.map(|x| x / 5.0 * 30.0).unwrap_or(0.0);
    let discount = if r.discount_pct > 0.0 { (r.discount_pct / 20.0).min(5.0) } else { 0.0 };
    let total = r.performance_index * 0.40
        + rating
        + r.completeness_pct / 100.0 * 15.0
        + condition_score(r.condition)
        + discount;
    round_to(clamp_score(total), 1)
}

pub fn score_all(records: &mut [ProductRecord]) {
    records.par_iter_mut().for_each(|r| {
        r.performance_index = performance_index(r);
        r.quality_score = quality_score(r);
    });
    let perf: Vec<f64> = records.iter().map(|r| r.performance_index).collect();
    let quality: Vec<f64> = records.iter().map(|r| r.quality_score).collect();
    logf!(
        "Scoring: mean performance {:.1}, mean quality {:.1}",
        mean(&perf).unwrap_or(0.0),
        mean(&quality).unwrap_or(0.0)
    );
}
