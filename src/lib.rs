/// This crate is a review preprocessing pipeline producing a sparse
/// document-term matrix for topic modeling.
pub mod error;
pub mod pipeline;
pub mod topic;

/// Preprocessing Pipeline
/// The top-level struct of this crate. It wires the five stages together:
/// record loading, tokenization/lemmatization, vocabulary filtering, TF-IDF
/// percentile pruning, and sparse matrix assembly.
///
/// Each stage consumes the previous stage's table and produces a narrower
/// one; documents are only ever removed, never renumbered, and the term
/// vocabulary only shrinks until it is frozen for matrix construction.
///
/// Given identical input and configuration, two runs produce bit-identical
/// row/column assignments and matrix contents.
pub use pipeline::Pipeline;

/// Pipeline Configuration
/// Every policy value is explicit here rather than ambient: minimum review
/// length, rare-term threshold, minimum term length, IDF percentile band,
/// stop-word set, corpus-specific exclusion set, and the empty-document
/// policy.
pub use pipeline::PipelineConfig;

/// Pipeline Report
/// Per-stage counters of one run: records read and dropped, token counts
/// before and after filtering, vocabulary sizes around the rare-term cut,
/// pair counts around pruning, the computed IDF band, empty documents, and
/// the final matrix shape.
pub use pipeline::PipelineReport;

/// Pipeline Output
/// The final artifact bundle: the sparse document-term matrix, the loaded
/// document metadata (rating, date, length, images) for downstream topic
/// summarization, and the report.
pub use pipeline::PipelineOutput;

/// One loaded review with normalized metadata.
/// Identifiers are assigned once at load time and stay stable through every
/// later stage.
pub use pipeline::loader::Document;

/// Sparse Document-Term Matrix
/// CSR layout; rows are surviving documents in load order, columns are the
/// surviving vocabulary in lexicographic order, cells are raw counts.
/// Serializable as a CBOR artifact together with both mappings.
pub use pipeline::matrix::{DocTermMatrix, EmptyDocPolicy};

/// Token -> lemma mapping (Snowball English), pure and idempotent.
pub use pipeline::tokenize::Lemmatizer;

/// Topic Model seam
/// Abstract interface to the external estimator:
/// `fit(matrix, topic_count, seed) -> TopicFit`. The pipeline never
/// implements estimation itself.
pub use topic::{TopicFit, TopicModel};

/// Pipeline errors. Record-level malformations are recovered in the loader;
/// what reaches this enum aborts the run.
pub use error::PipelineError;
