use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Pipeline errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong between reading a benchmark log and
/// producing its summary.
///
/// Only `SourceUnreadable` and `LabelCountMismatch` abort a run. The loader
/// recovers from `MalformedRow` locally, the aggregator turns `EmptyInput`
/// into an empty series, and the regression errors only suppress the
/// overlay of the affected source.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("{labels} label(s) supplied for {sources} data file(s)")]
    LabelCountMismatch { labels: usize, sources: usize },

    #[error("no values to summarize")]
    EmptyInput,

    #[error("regression needs at least 2 points, got {points}")]
    InsufficientData { points: usize },

    #[error("regression is undefined when every x value is identical")]
    DegenerateInput,

    #[error("x has {xs} values but y has {ys}")]
    MismatchedLengths { xs: usize, ys: usize },

    #[error("cannot read {}: {source}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
