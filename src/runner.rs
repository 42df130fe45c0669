// src/runner.rs
//
// End-to-end run. Stages execute strictly in order over the whole collection;
// a failing stage is logged, its columns are back-filled with neutral values,
// and the run continues. Only input problems are fatal.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;

use crate::{
    config::{catalog::Catalog, options::PipelineOptions},
    error::{Result, Stage, StageError},
    file::{write_enriched, write_report},
    progress::Progress,
    record::{ProductRecord, RawRecord},
    report,
    stages::{
        anomaly::{forest, rules, stats, suspicion},
        confidence,
        gate::{GateStats, QualityGate},
        normalize::Normalizer,
        scoring,
        sentiment::{self, SentimentModel},
        tags, tier,
        value::{self, DealThresholds},
    },
    store::load_raw,
};

/// Stages reported through `Progress`, in order.
pub const STAGES: [Stage; 12] = [
    Stage::Normalize,
    Stage::QualityGate,
    Stage::Tier,
    Stage::Scoring,
    Stage::Value,
    Stage::PriceOutliers,
    Stage::Multivariate,
    Stage::Inconsistency,
    Stage::Suspicion,
    Stage::Sentiment,
    Stage::Confidence,
    Stage::Tags,
];

/// What a run produced, stage by stage.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub raw_records: usize,
    pub gate: GateStats,
    pub deal_thresholds: Option<DealThresholds>,
    pub tier_outliers: stats::TierOutliers,
    pub multivariate_flagged: usize,
    pub inconsistent: usize,
    pub suspicious: usize,
    pub failures: Vec<StageError>,
    pub files_written: Vec<PathBuf>,
}

/// Enriched collection plus its summary.
pub struct Enriched {
    pub records: Vec<ProductRecord>,
    pub summary: RunSummary,
}

/// Inputs of a file-level run.
pub struct RunParams {
    pub input: PathBuf,
    pub options: PipelineOptions,
    pub sentiment: Box<dyn SentimentModel>,
}

/// Back-fill a failed stage's columns with their neutral values.
pub fn apply_fallback(stage: Stage, records: &mut [ProductRecord], opts: &PipelineOptions) {
    match stage {
        Stage::Tier => {
            for r in records.iter_mut() {
                r.tier = Default::default();
            }
        }
        Stage::Scoring => {
            for r in records.iter_mut() {
                r.performance_index = 0.0;
                r.quality_score = 0.0;
            }
        }
        Stage::Value => value::classify_without_quantiles(records, &opts.deals),
        Stage::PriceOutliers => stats::clear(records),
        Stage::Multivariate => forest::neutral(records),
        Stage::Inconsistency => rules::clear(records),
        Stage::Sentiment => sentiment::neutral(records),
        Stage::Normalize
        | Stage::QualityGate
        | Stage::Suspicion
        | Stage::Confidence
        | Stage::Tags => {}
    }
}

fn panic_detail(payload: Box<dyn Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| s!("unexpected panic"))
}

/// Runs one stage body, turning a panic into `StageError::Failed`.
fn guarded<T>(stage: Stage, body: impl FnOnce() -> std::result::Result<T, StageError>) -> std::result::Result<T, StageError> {
    catch_unwind(AssertUnwindSafe(body)).unwrap_or_else(|payload| {
        Err(StageError::Failed { stage, detail: panic_detail(payload) })
    })
}

struct Ctx<'a> {
    opts: &'a PipelineOptions,
    progress: &'a mut dyn Progress,
    summary: RunSummary,
}

impl Ctx<'_> {
    /// Run a stage over the collection; on error, log, back-fill and go on.
    fn step<T>(
        &mut self,
        stage: Stage,
        records: &mut [ProductRecord],
        body: impl FnOnce(&mut [ProductRecord]) -> std::result::Result<T, StageError>,
    ) -> Option<T> {
        let out = guarded(stage, || body(&mut *records));
        match out {
            Ok(v) => {
                self.progress.stage_done(stage, records.len());
                Some(v)
            }
            Err(e) => {
                loge!("{e}; back-filling defaults");
                apply_fallback(stage, records, self.opts);
                self.progress.stage_failed(stage, &e);
                self.summary.failures.push(e);
                None
            }
        }
    }
}

/// Full enrichment of an in-memory batch. No I/O.
pub fn run_pipeline(
    raws: Vec<RawRecord>,
    opts: &PipelineOptions,
    sentiment_model: &dyn SentimentModel,
    progress: &mut dyn Progress,
) -> Result<Enriched> {
    let catalog = Catalog::new(&opts.catalog)?;
    progress.begin(STAGES.len());

    let mut ctx = Ctx { opts, progress, summary: RunSummary { raw_records: raws.len(), ..Default::default() } };

    let normalized = Normalizer::new(&catalog).normalize_all(raws);
    ctx.progress.stage_done(Stage::Normalize, normalized.len());

    let (mut records, gate_stats) = QualityGate::new(&catalog).apply(normalized);
    ctx.progress.log(&format!(
        "Quality gate kept {} of {} ({} accessories, {} duplicates)",
        gate_stats.kept, gate_stats.initial, gate_stats.accessories, gate_stats.duplicates
    ));
    ctx.summary.gate = gate_stats;
    ctx.progress.stage_done(Stage::QualityGate, records.len());

    ctx.step(Stage::Tier, &mut records, |rs| {
        tier::assign(rs, &opts.tiers);
        Ok(())
    });
    ctx.step(Stage::Scoring, &mut records, |rs| {
        scoring::score_all(rs);
        Ok(())
    });
    ctx.summary.deal_thresholds = ctx.step(Stage::Value, &mut records, |rs| value::rank(rs, &opts.deals));

    if let Some(out) = ctx.step(Stage::PriceOutliers, &mut records, |rs| Ok(stats::detect(rs, &opts.stats))) {
        ctx.summary.tier_outliers = out;
    }

    let detector = forest::detector_for(&opts.detector);
    ctx.summary.multivariate_flagged = ctx
        .step(Stage::Multivariate, &mut records, |rs| {
            let scores = detector.detect(&forest::feature_matrix(rs))?;
            forest::apply(rs, &scores);
            logf!("Multivariate: {} of {} records flagged", scores.flagged(), rs.len());
            Ok(scores.flagged())
        })
        .unwrap_or(0);

    ctx.summary.inconsistent =
        ctx.step(Stage::Inconsistency, &mut records, |rs| Ok(rules::check_all(rs, &opts.rules))).unwrap_or(0);

    ctx.summary.suspicious = ctx
        .step(Stage::Suspicion, &mut records, |rs| Ok(suspicion::aggregate(rs, &opts.suspicion, &opts.rules)))
        .unwrap_or(0);

    ctx.step(Stage::Sentiment, &mut records, |rs| sentiment::analyze(rs, sentiment_model));
    ctx.step(Stage::Confidence, &mut records, |rs| {
        confidence::synthesize(rs);
        Ok(())
    });
    ctx.step(Stage::Tags, &mut records, |rs| {
        tags::annotate(rs);
        Ok(())
    });

    if !ctx.summary.failures.is_empty() {
        let msg = format!("{} stage(s) fell back to defaults", ctx.summary.failures.len());
        logw!("{msg}");
        ctx.progress.log(&msg);
    }
    ctx.progress.finish();
    Ok(Enriched { records, summary: ctx.summary })
}

/// Result of a file-level run.
pub struct RunOutcome {
    pub enriched: Enriched,
    pub report: String,
}

/// Load → enrich → write table and report.
pub fn run(params: &RunParams, progress: &mut dyn Progress) -> Result<RunOutcome> {
    let raws = load_raw(&params.input)?;
    let mut enriched = run_pipeline(raws, &params.options, params.sentiment.as_ref(), progress)?;

    let out = write_enriched(&params.options.export, &enriched.records)?;
    enriched.summary.files_written.push(out);

    let report_path = params.options.export.report_path.clone();
    enriched.summary.files_written.push(report_path.clone());
    let text = report::render(&enriched.records, &enriched.summary);
    write_report(&report_path, &text)?;

    Ok(RunOutcome { enriched, report: text })
}
