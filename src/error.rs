use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the preprocessing pipeline.
///
/// Record-level problems (bad ratings, bad dates) are recovered inside the
/// loader and never reach this enum; what ends up here is fatal for the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The dataset could not be opened or read. A readable dataset is a
    /// precondition of the pipeline, not a resilience target.
    #[error("failed to read dataset {path}: {source}")]
    DatasetIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV stream itself failed mid-read. Undecodable individual records
    /// are dropped by the loader instead of raising this.
    #[error("failed to read dataset stream: {0}")]
    DatasetDecode(#[from] csv::Error),

    /// Percentile cutoffs cannot be computed: the filtered corpus is empty or
    /// its IDF distribution has collapsed to a single value. Passing such a
    /// matrix downstream would feed the topic model a non-representative
    /// corpus, so this is fatal rather than skipped.
    #[error("degenerate corpus for idf pruning: {0}")]
    DegenerateCorpus(String),

    /// A configuration value is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Matrix artifact (de)serialization failed.
    #[error("matrix artifact error: {0}")]
    Artifact(#[from] serde_cbor::Error),

    /// An external topic-model estimator reported a failure.
    #[error("topic model estimation failed: {0}")]
    Estimator(String),
}
