// src/cli.rs
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::consts::DEFAULT_INPUT;
use crate::config::options::{ExportFormat, PipelineOptions};
use crate::error::{Result, Stage, StageError};
use crate::progress::Progress;
use crate::runner::{self, RunParams};
use crate::stages::sentiment::{KeywordSentiment, NeutralSentiment, SentimentModel};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Tsv,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SentimentArg {
    #[default]
    None,
    Keywords,
}

/// Enrich scraped laptop listings: normalize, score, rank deals and flag anomalies.
#[derive(Debug, Parser)]
#[command(name = "market_enrich", version, about)]
pub struct Args {
    /// Raw listings (CSV, or TSV by extension)
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Enriched output file [default: data/processed/enriched_data.<format>]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Plain-text report [default: data/reports/pipeline_report.txt]
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// TOML options file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Skip the multivariate detector (neutral scores)
    #[arg(long)]
    pub no_ml: bool,

    #[arg(long, value_enum, default_value_t = SentimentArg::None)]
    pub sentiment: SentimentArg,

    /// Seed for the multivariate detector
    #[arg(long)]
    pub seed: Option<u64>,

    /// More logging (-v debug, -vv trace). RUST_LOG wins when set.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Options file first, then flags on top.
    pub fn options(&self) -> Result<PipelineOptions> {
        let mut opts = match &self.config {
            Some(path) => PipelineOptions::from_toml_file(path)?,
            None => PipelineOptions::default(),
        };
        if let Some(f) = self.format {
            opts.export.format = match f {
                FormatArg::Csv => ExportFormat::Csv,
                FormatArg::Tsv => ExportFormat::Tsv,
            };
        }
        if let Some(out) = &self.output {
            opts.export.set_path(out);
        }
        if let Some(report) = &self.report {
            opts.export.report_path = report.clone();
        }
        if self.no_ml {
            opts.detector.enabled = false;
        }
        if let Some(seed) = self.seed {
            opts.detector.seed = seed;
        }
        Ok(opts)
    }

    pub fn sentiment_model(&self) -> Box<dyn SentimentModel> {
        match self.sentiment {
            SentimentArg::None => Box::new(NeutralSentiment),
            SentimentArg::Keywords => Box::new(KeywordSentiment::default()),
        }
    }
}

/// Stage progress as debug log lines.
struct LogProgress {
    total: usize,
    done: usize,
}

impl Progress for LogProgress {
    fn begin(&mut self, stages: usize) {
        self.total = stages;
    }

    fn log(&mut self, msg: &str) {
        logd!("{msg}");
    }

    fn stage_done(&mut self, stage: Stage, records: usize) {
        self.done += 1;
        logd!("[{}/{}] {} ({} records)", self.done, self.total, stage, records);
    }

    fn stage_failed(&mut self, stage: Stage, _err: &StageError) {
        self.done += 1;
        logd!("[{}/{}] {} (defaults)", self.done, self.total, stage);
    }
}

/// Run the pipeline for parsed arguments and print the report to stdout.
pub fn run(args: &Args) -> Result<()> {
    let params = RunParams {
        input: args.input.clone(),
        options: args.options()?,
        sentiment: args.sentiment_model(),
    };
    let outcome = runner::run(&params, &mut LogProgress { total: 0, done: 0 })?;

    print!("{}", outcome.report);
    for path in &outcome.enriched.summary.files_written {
        logf!("Output: {}", path.display());
    }
    Ok(())
}
