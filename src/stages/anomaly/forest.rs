// src/stages/anomaly/forest.rs
//
// Multivariate outlier detection behind the `OutlierDetector` seam. The default
// implementation is a seeded isolation forest; `DisabledDetector` stands in
// when the detector is switched off.
//
// Score convention: `raw` is the negated anomaly score (lower = more isolated),
// `norm` is its min-max rescale to [0, 1] (higher = more normal), and a record
// is flagged when its raw score falls below the `contamination` quantile.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::config::options::DetectorOptions;
use crate::core::stats::{median, quantile};
use crate::error::{Stage, StageError};
use crate::record::ProductRecord;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/* ---------------- Features ---------------- */

/// Dense feature matrix, one row per record, median-imputed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureMatrix {
    pub names: Vec<&'static str>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
    pub fn width(&self) -> usize { self.names.len() }
}

type Extract = fn(&ProductRecord) -> Option<f64>;

const FEATURES: [(&str, Extract); 8] = [
    ("price", |r| r.price),
    ("rating", |r| r.rating),
    ("ram_gb", |r| r.ram_gb.map(f64::from)),
    ("storage_gb", |r| r.storage_gb.map(f64::from)),
    ("cpu_generation", |r| r.cpu_generation.map(f64::from)),
    ("discount_pct", |r| Some(r.discount_pct)),
    ("performance_index", |r| Some(r.performance_index)),
    ("quality_score", |r| Some(r.quality_score)),
];

/// Keeps the features with at least one value; gaps take the feature median.
pub fn feature_matrix(records: &[ProductRecord]) -> FeatureMatrix {
    let mut names = Vec::new();
    let mut columns: Vec<Vec<f64>> = Vec::new();

    for (name, get) in FEATURES {
        let raw: Vec<Option<f64>> = records.iter().map(get).collect();
        let present: Vec<f64> = raw.iter().flatten().copied().filter(|v| v.is_finite()).collect();
        let Some(fill) = median(&present) else { continue };
        names.push(name);
        columns.push(
            raw.into_iter()
                .map(|v| v.filter(|x| x.is_finite()).unwrap_or(fill))
                .collect(),
        );
    }

    let rows = (0..records.len())
        .map(|i| columns.iter().map(|c| c[i]).collect())
        .collect();
    FeatureMatrix { names, rows }
}

/* ---------------- Detector seam ---------------- */

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultivariateScores {
    pub flags: Vec<bool>,
    pub raw: Vec<f64>,
    pub norm: Vec<f64>,
}

impl MultivariateScores {
    pub fn flagged(&self) -> usize {
        self.flags.iter().filter(|f| **f).count()
    }
}

pub trait OutlierDetector: Send + Sync {
    fn detect(&self, features: &FeatureMatrix) -> Result<MultivariateScores, StageError>;
}

/// Always unavailable; the runner back-fills neutral scores.
pub struct DisabledDetector;

impl OutlierDetector for DisabledDetector {
    fn detect(&self, _features: &FeatureMatrix) -> Result<MultivariateScores, StageError> {
        Err(StageError::Unavailable { stage: Stage::Multivariate })
    }
}

pub fn detector_for(opts: &DetectorOptions) -> Box<dyn OutlierDetector> {
    if opts.enabled {
        Box::new(IsolationForest::from_options(opts))
    } else {
        Box::new(DisabledDetector)
    }
}

/// Writes detector output onto the records (same order as the matrix).
pub fn apply(records: &mut [ProductRecord], scores: &MultivariateScores) {
    for (i, r) in records.iter_mut().enumerate() {
        r.multivariate_anomaly_flag = scores.flags.get(i).copied().unwrap_or(false);
        r.multivariate_anomaly_score = scores.raw.get(i).copied().unwrap_or(0.0);
        r.multivariate_anomaly_norm = scores.norm.get(i).copied().unwrap_or(0.5);
    }
}

pub fn neutral(records: &mut [ProductRecord]) {
    for r in records {
        r.multivariate_anomaly_flag = false;
        r.multivariate_anomaly_score = 0.0;
        r.multivariate_anomaly_norm = 0.5;
    }
}

/* ---------------- Isolation forest ---------------- */

#[derive(Clone, Debug, PartialEq)]
pub struct IsolationForest {
    pub trees: usize,
    pub sample_size: usize,
    pub contamination: f64,
    pub seed: u64,
}

enum Node {
    Leaf { size: usize },
    Split { feature: usize, threshold: f64, left: Box<Node>, right: Box<Node> },
}

/// Average unsuccessful-search path length in a BST of `n` nodes.
fn c_factor(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

impl IsolationForest {
    pub fn from_options(opts: &DetectorOptions) -> Self {
        Self {
            trees: opts.trees.max(1),
            sample_size: opts.sample_size.max(2),
            contamination: opts.contamination.clamp(0.0, 0.5),
            seed: opts.seed,
        }
    }

    fn build(rows: &[Vec<f64>], idx: Vec<usize>, depth: usize, max_depth: usize, rng: &mut StdRng) -> Node {
        if depth >= max_depth || idx.len() <= 1 {
            return Node::Leaf { size: idx.len() };
        }

        let width = rows[idx[0]].len();
        let ranges: Vec<(usize, f64, f64)> = (0..width)
            .filter_map(|f| {
                let (lo, hi) = idx.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &i| {
                    (lo.min(rows[i][f]), hi.max(rows[i][f]))
                });
                (hi > lo).then_some((f, lo, hi))
            })
            .collect();
        if ranges.is_empty() {
            return Node::Leaf { size: idx.len() };
        }

        let (feature, lo, hi) = ranges[rng.gen_range(0..ranges.len())];
        let threshold = rng.gen_range(lo..hi);
        let (left, right): (Vec<usize>, Vec<usize>) =
            idx.into_iter().partition(|&i| rows[i][feature] <= threshold);

        Node::Split {
            feature,
            threshold,
            left: Box::new(Self::build(rows, left, depth + 1, max_depth, rng)),
            right: Box::new(Self::build(rows, right, depth + 1, max_depth, rng)),
        }
    }

    fn path_length(node: &Node, row: &[f64]) -> f64 {
        let mut node = node;
        let mut depth = 0.0;
        loop {
            match node {
                Node::Leaf { size } => return depth + c_factor(*size),
                Node::Split { feature, threshold, left, right } => {
                    node = if row[*feature] <= *threshold { left } else { right };
                    depth += 1.0;
                }
            }
        }
    }
}

fn rows_constant(rows: &[Vec<f64>], col: usize) -> bool {
    let mut values = rows.iter().map(|r| r[col]);
    let Some(first) = values.next() else { return true };
    values.all(|v| (v - first).abs() <= f64::EPSILON)
}

impl OutlierDetector for IsolationForest {
    fn detect(&self, features: &FeatureMatrix) -> Result<MultivariateScores, StageError> {
        let n = features.len();
        if features.width() == 0 {
            return Err(StageError::InsufficientData {
                stage: Stage::Multivariate,
                detail: s!("no numeric feature has a value"),
            });
        }
        if n < 2 {
            return Err(StageError::InsufficientData {
                stage: Stage::Multivariate,
                detail: format!("{n} record(s)"),
            });
        }
        let constant = (0..features.width()).all(|j| rows_constant(&features.rows, j));
        if constant {
            return Err(StageError::Degenerate {
                stage: Stage::Multivariate,
                detail: format!("all {n} records share one feature vector"),
            });
        }

        let psi = self.sample_size.min(n);
        let max_depth = (psi as f64).log2().ceil().max(1.0) as usize;
        let rows = &features.rows;

        // One RNG per tree, seeded by position, so the forest is the same
        // whatever order rayon builds it in.
        let forest: Vec<Node> = (0..self.trees)
            .into_par_iter()
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(t as u64));
                let sample = rand::seq::index::sample(&mut rng, n, psi).into_vec();
                Self::build(rows, sample, 0, max_depth, &mut rng)
            })
            .collect();

        let norm_by = c_factor(psi);
        let raw: Vec<f64> = rows
            .par_iter()
            .map(|row| {
                let mean_path =
                    forest.iter().map(|tree| Self::path_length(tree, row)).sum::<f64>() / forest.len() as f64;
                -(2f64.powf(-mean_path / norm_by))
            })
            .collect();

        let offset = quantile(&raw, self.contamination).unwrap_or(f64::NEG_INFINITY);
        let flags: Vec<bool> = raw.iter().map(|s| *s < offset).collect();

        let lo = raw.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let norm: Vec<f64> = if hi - lo > f64::EPSILON {
            raw.iter().map(|s| (s - lo) / (hi - lo)).collect()
        } else {
            logd!("Multivariate: all scores equal, normalized score held at 0.5");
            vec![0.5; n]
        };

        Ok(MultivariateScores { flags, raw, norm })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(points: &[[f64; 2]]) -> FeatureMatrix {
        FeatureMatrix {
            names: vec!["x", "y"],
            rows: points.iter().map(|p| p.to_vec()).collect(),
        }
    }

    fn cluster_with_outlier() -> FeatureMatrix {
        let mut pts: Vec<[f64; 2]> = (0..40).map(|i| [10.0 + (i % 7) as f64 * 0.1, 5.0 + (i % 5) as f64 * 0.1]).collect();
        pts.push([90.0, -40.0]);
        matrix(&pts)
    }

    #[test]
    fn isolated_point_scores_lowest() {
        let forest = IsolationForest::from_options(&DetectorOptions::default());
        let out = forest.detect(&cluster_with_outlier()).unwrap();
        let last = out.raw.len() - 1;
        assert!(out.flags[last]);
        assert_eq!(out.norm[last], 0.0);
        assert!(out.raw.iter().all(|s| *s < 0.0 && *s >= -1.0));
        assert!(out.norm.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn same_seed_same_scores() {
        let forest = IsolationForest::from_options(&DetectorOptions::default());
        let data = cluster_with_outlier();
        assert_eq!(forest.detect(&data).unwrap(), forest.detect(&data).unwrap());
    }

    #[test]
    fn identical_rows_are_degenerate() {
        let forest = IsolationForest::from_options(&DetectorOptions::default());
        assert!(matches!(
            forest.detect(&matrix(&[[1.0, 1.0]; 10])),
            Err(StageError::Degenerate { stage: Stage::Multivariate, .. })
        ));
    }

    #[test]
    fn too_few_rows_or_features() {
        let forest = IsolationForest::from_options(&DetectorOptions::default());
        assert!(matches!(
            forest.detect(&matrix(&[[1.0, 2.0]])),
            Err(StageError::InsufficientData { .. })
        ));
        assert!(forest.detect(&FeatureMatrix::default()).is_err());
        assert_eq!(
            DisabledDetector.detect(&cluster_with_outlier()),
            Err(StageError::Unavailable { stage: Stage::Multivariate })
        );
    }

    #[test]
    fn features_skip_empty_columns_and_impute_median() {
        let rs = vec![
            ProductRecord { price: Some(1000.0), ..ProductRecord::default() },
            ProductRecord { price: None, ..ProductRecord::default() },
            ProductRecord { price: Some(3000.0), ..ProductRecord::default() },
        ];
        let m = feature_matrix(&rs);
        assert!(m.names.contains(&"price"));
        assert!(!m.names.contains(&"rating"));
        assert_eq!(m.rows[1][0], 2000.0);
        assert_eq!(m.width(), 4);
    }
}
