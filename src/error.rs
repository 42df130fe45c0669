// src/error.rs
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal, user-visible errors. Everything else degrades inside the pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("raw input not found at {0} (re-run the collector first)")]
    InputMissing(PathBuf),

    #[error("raw input {0} contains no records")]
    EmptyInput(PathBuf),

    #[error("raw input is missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("raw input has a quote opened on line {line} that never closes")]
    UnterminatedQuote { line: usize },

    #[error("invalid options file: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid catalog pattern `{pattern}`: {source}")]
    Catalog {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage identifiers, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Normalize,
    QualityGate,
    Tier,
    Scoring,
    Value,
    PriceOutliers,
    Multivariate,
    Inconsistency,
    Suspicion,
    Sentiment,
    Confidence,
    Tags,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Normalize => "field normalizer",
            Stage::QualityGate => "quality gate",
            Stage::Tier => "tier classifier",
            Stage::Scoring => "scoring engine",
            Stage::Value => "value ranker",
            Stage::PriceOutliers => "tier price outliers",
            Stage::Multivariate => "multivariate detector",
            Stage::Inconsistency => "inconsistency rules",
            Stage::Suspicion => "suspicion aggregation",
            Stage::Sentiment => "sentiment",
            Stage::Confidence => "confidence synthesizer",
            Stage::Tags => "tags & summary",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Recoverable stage failure. The runner logs it and back-fills defaults.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StageError {
    #[error("{stage}: not enough data ({detail})")]
    InsufficientData { stage: Stage, detail: String },

    #[error("{stage}: degenerate input ({detail})")]
    Degenerate { stage: Stage, detail: String },

    #[error("{stage}: capability unavailable")]
    Unavailable { stage: Stage },

    #[error("{stage}: {detail}")]
    Failed { stage: Stage, detail: String },
}

impl StageError {
    pub fn stage(&self) -> Stage {
        match self {
            StageError::InsufficientData { stage, .. }
            | StageError::Degenerate { stage, .. }
            | StageError::Unavailable { stage }
            | StageError::Failed { stage, .. } => *stage,
        }
    }
}
