// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod csv;
pub mod error;
pub mod file;
pub mod progress;
pub mod record;
pub mod report;
pub mod runner;
pub mod stages;
pub mod store;

pub use error::{Error, Result, Stage, StageError};
pub use record::{ProductRecord, RawRecord};
pub use runner::{run_pipeline, Enriched, RunSummary};
