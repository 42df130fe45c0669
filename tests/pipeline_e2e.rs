// tests/pipeline_e2e.rs
mod common;

use market_enrich::config::options::PipelineOptions;
use market_enrich::progress::{NullProgress, Progress};
use market_enrich::record::{SuspicionReason, EXPORT_HEADERS};
use market_enrich::stages::sentiment::{KeywordSentiment, NeutralSentiment};
use market_enrich::{run_pipeline, Enriched, Stage, StageError};

fn enrich(opts: &PipelineOptions) -> Enriched {
    run_pipeline(common::batch_100().raws, opts, &NeutralSentiment, &mut NullProgress).unwrap()
}

#[test]
fn gate_keeps_92_of_100() {
    let out = enrich(&PipelineOptions::default());
    assert_eq!(out.summary.raw_records, 100);
    assert_eq!(out.summary.gate.accessories, 5);
    assert_eq!(out.summary.gate.duplicates, 3);
    assert_eq!(out.records.len(), 92);
    assert_eq!(out.summary.gate.kept, 92);
    // Survivors are the first 92 rows, in order.
    let ids: Vec<usize> = out.records.iter().map(|r| r.row_id).collect();
    assert_eq!(ids, (0..92).collect::<Vec<_>>());
}

#[test]
fn completeness_matches_raw_fields() {
    let fx = common::batch_100();
    let out = run_pipeline(fx.raws, &PipelineOptions::default(), &NeutralSentiment, &mut NullProgress).unwrap();
    for r in &out.records {
        assert_eq!(r.completeness_pct, fx.completeness[&r.row_id], "row {}", r.row_id);
    }
    let got: f64 = out.records.iter().map(|r| r.completeness_pct / 100.0).sum();
    let want: f64 = fx.completeness.values().map(|c| c / 100.0).sum();
    assert!((got - want).abs() < 1e-9);
}

#[test]
fn two_runs_are_byte_identical() {
    let opts = PipelineOptions::default();
    let rows = |e: &Enriched| e.records.iter().map(|r| r.to_row().join("\u{1f}")).collect::<Vec<_>>();
    let a = enrich(&opts);
    let b = enrich(&opts);
    assert_eq!(rows(&a), rows(&b));
    assert_eq!(a.summary.deal_thresholds, b.summary.deal_thresholds);
    assert!(a.records.iter().all(|r| r.to_row().len() == EXPORT_HEADERS.len()));
}

#[test]
fn underpriced_high_spec_is_suspicious() {
    let out = enrich(&PipelineOptions::default());
    let r = out.records.iter().find(|r| r.row_id == common::UNDERPRICED_ROW).unwrap();
    assert!(r.performance_index >= 80.0);
    assert_eq!(r.price, Some(2800.0));
    assert!(r.inconsistency_severity >= 3);
    assert!(r.suspicious_flag);
    assert!(r.suspicion_reasons.contains(&SuspicionReason::MajorInconsistency));
    assert_eq!(r.recommendation.label(), "Not recommended – verify");
}

#[test]
fn reasons_empty_iff_not_suspicious() {
    let out = enrich(&PipelineOptions::default());
    for r in &out.records {
        assert_eq!(r.suspicious_flag, !r.suspicion_reasons.is_empty(), "row {}", r.row_id);
    }
    assert!(out.records.iter().any(|r| !r.suspicious_flag));
}

#[test]
fn scores_stay_in_bounds() {
    let out = enrich(&PipelineOptions::default());
    for r in &out.records {
        for v in [r.completeness_pct, r.performance_index, r.quality_score, r.confidence_index] {
            assert!((0.0..=100.0).contains(&v), "row {} out of range: {v}", r.row_id);
        }
        assert!((0.0..=1.0).contains(&r.multivariate_anomaly_norm));
        assert!((1.0..=5.0).contains(&r.vendor_reliability));
        assert!(r.price.is_none_or(|p| p >= 0.0));
    }
}

#[test]
fn disabled_detector_backfills_neutral_scores() {
    let mut opts = PipelineOptions::default();
    opts.detector.enabled = false;
    let out = enrich(&opts);
    assert_eq!(
        out.summary.failures,
        vec![StageError::Unavailable { stage: Stage::Multivariate }]
    );
    assert!(out.records.iter().all(|r| {
        !r.multivariate_anomaly_flag && r.multivariate_anomaly_score == 0.0 && r.multivariate_anomaly_norm == 0.5
    }));
    assert!(out.records.iter().all(|r| !r.suspicion_reasons.contains(&SuspicionReason::MlAnomaly)));
}

#[test]
fn detector_flags_about_ten_percent() {
    let out = enrich(&PipelineOptions::default());
    let flagged = out.records.iter().filter(|r| r.multivariate_anomaly_flag).count();
    assert!((5..=12).contains(&flagged), "flagged {flagged}");
    assert_eq!(out.summary.multivariate_flagged, flagged);
}

#[test]
fn seed_changes_scores_only_through_the_detector() {
    let base = enrich(&PipelineOptions::default());
    let mut opts = PipelineOptions::default();
    opts.detector.seed = 7;
    let other = enrich(&opts);
    for (a, b) in base.records.iter().zip(&other.records) {
        assert_eq!(a.tier, b.tier);
        assert_eq!(a.quality_score, b.quality_score);
        assert_eq!(a.deal_class, b.deal_class);
        assert_eq!(a.consistency, b.consistency);
    }
}

#[test]
fn sentiment_is_informational() {
    let neutral = enrich(&PipelineOptions::default());
    let keyword = run_pipeline(
        common::batch_100().raws,
        &PipelineOptions::default(),
        &KeywordSentiment::default(),
        &mut NullProgress,
    )
    .unwrap();
    for (a, b) in neutral.records.iter().zip(&keyword.records) {
        assert_eq!(a.confidence_index, b.confidence_index);
        assert_eq!(a.suspicious_flag, b.suspicious_flag);
    }
}

#[derive(Default)]
struct Recorder {
    total: usize,
    done: Vec<Stage>,
    failed: Vec<Stage>,
    lines: Vec<String>,
    finished: bool,
}

impl Progress for Recorder {
    fn begin(&mut self, stages: usize) { self.total = stages; }
    fn log(&mut self, msg: &str) { self.lines.push(msg.to_string()); }
    fn stage_done(&mut self, stage: Stage, _records: usize) { self.done.push(stage); }
    fn stage_failed(&mut self, stage: Stage, _err: &StageError) { self.failed.push(stage); }
    fn finish(&mut self) { self.finished = true; }
}

#[test]
fn progress_sees_every_stage_once() {
    let mut opts = PipelineOptions::default();
    opts.detector.enabled = false;
    let mut rec = Recorder::default();
    run_pipeline(common::batch_100().raws, &opts, &NeutralSentiment, &mut rec).unwrap();
    assert!(rec.finished);
    assert_eq!(rec.failed, vec![Stage::Multivariate]);
    assert_eq!(rec.done.len() + rec.failed.len(), rec.total);
    assert_eq!(rec.done.first(), Some(&Stage::Normalize));
    assert_eq!(rec.done.last(), Some(&Stage::Tags));
    assert_eq!(
        rec.lines,
        vec![
            "Quality gate kept 92 of 100 (5 accessories, 3 duplicates)".to_string(),
            "1 stage(s) fell back to defaults".to_string(),
        ]
    );
}
