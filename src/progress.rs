// src/progress.rs
use crate::error::{Stage, StageError};

/// Progress reporting for a pipeline run. Frontends implement this to surface
/// status; every method defaults to a no-op.
pub trait Progress {
    /// Called at the start with the number of stages about to run.
    fn begin(&mut self, _stages: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// A stage finished; `records` is the collection size after it.
    fn stage_done(&mut self, _stage: Stage, _records: usize) {}

    /// A stage failed and its defaults were back-filled.
    fn stage_failed(&mut self, _stage: Stage, _err: &StageError) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
