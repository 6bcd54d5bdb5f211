pub mod filter;
pub mod loader;
pub mod matrix;
pub mod prune;
pub mod stopwords;
pub mod tokenize;

use std::path::Path;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

use filter::VocabFilter;
use loader::{DocId, Document, LoadStats};
use matrix::{DocTermMatrix, EmptyDocPolicy};
use tokenize::Lemmatizer;

/// Every policy value of the pipeline, injectable per run.
/// There are no ambient globals: two runs with the same input and the same
/// config produce bit-identical matrices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Reviews shorter than this many characters are dropped at load time;
    /// shorter strings are noise (emoji-only, blank) and destabilize the
    /// downstream frequency statistics.
    pub min_review_chars: usize,
    /// Terms whose corpus-wide occurrence count does not exceed this are
    /// removed; hapax terms cannot support a stable topic assignment.
    pub rare_term_threshold: u64,
    /// Minimum term length in characters.
    pub min_term_chars: usize,
    /// Lower IDF percentile cutoff as a fraction, e.g. 0.05.
    pub idf_lower_percentile: f64,
    /// Upper IDF percentile cutoff as a fraction, e.g. 0.95.
    pub idf_upper_percentile: f64,
    /// Closed-class stop words removed before any counting.
    pub stop_words: IndexSet<String>,
    /// Corpus-specific noise terms (brand names and variants).
    pub excluded_terms: IndexSet<String>,
    /// Handling of documents that lose every term.
    pub empty_doc_policy: EmptyDocPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_review_chars: 14,
            rare_term_threshold: 5,
            min_term_chars: 3,
            idf_lower_percentile: 0.05,
            idf_upper_percentile: 0.95,
            stop_words: stopwords::default_stop_words(),
            excluded_terms: IndexSet::new(),
            empty_doc_policy: EmptyDocPolicy::Drop,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.min_term_chars == 0 {
            return Err(PipelineError::InvalidConfig(
                "min_term_chars must be at least 1".into(),
            ));
        }
        let in_range = |p: f64| (0.0..=1.0).contains(&p);
        if !in_range(self.idf_lower_percentile) || !in_range(self.idf_upper_percentile) {
            return Err(PipelineError::InvalidConfig(
                "idf percentiles must be fractions in 0..=1".into(),
            ));
        }
        if self.idf_lower_percentile >= self.idf_upper_percentile {
            return Err(PipelineError::InvalidConfig(format!(
                "idf_lower_percentile {} must be below idf_upper_percentile {}",
                self.idf_lower_percentile, self.idf_upper_percentile
            )));
        }
        Ok(())
    }
}

/// Per-stage counters of one pipeline run, for auditing how the corpus
/// narrowed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineReport {
    pub records_read: usize,
    pub records_dropped_short: usize,
    pub records_dropped_malformed: usize,
    pub documents: usize,
    pub tokens_emitted: usize,
    pub tokens_after_vocab_filter: usize,
    pub terms_before_rare_filter: usize,
    pub terms_after_rare_filter: usize,
    pub pairs_before_prune: usize,
    pub pairs_after_prune: usize,
    pub idf_lower: f64,
    pub idf_upper: f64,
    /// Documents that lost every term; dropped or kept as zero rows
    /// depending on the configured policy.
    pub empty_documents: Vec<DocId>,
    pub rows: usize,
    pub cols: usize,
    pub nnz: usize,
}

/// Everything a downstream topic model (and the analyst) needs: the matrix,
/// the loaded document metadata for summarization against ratings and
/// images, and the stage-by-stage report.
#[derive(Debug)]
pub struct PipelineOutput {
    pub matrix: DocTermMatrix<u32>,
    pub documents: Vec<Document>,
    pub report: PipelineReport,
}

/// The preprocessing pipeline: loader -> tokenizer/lemmatizer -> vocabulary
/// filter -> TF-IDF pruner -> matrix builder.
///
/// Each stage is a pure transformation consuming the previous stage's table
/// and producing a narrower one; nothing is mutated in place across stages.
pub struct Pipeline {
    config: PipelineConfig,
    lemmatizer: Lemmatizer,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            config,
            lemmatizer: Lemmatizer::english(),
        })
    }

    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run stages 2-5 over already-loaded documents.
    pub fn run(&self, documents: Vec<Document>) -> Result<PipelineOutput, PipelineError> {
        self.run_with_stats(documents, LoadStats::default())
    }

    /// Load a CSV dataset and run the full pipeline over it.
    pub fn run_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<PipelineOutput, PipelineError> {
        let (documents, stats) = loader::load_records_path(path, &self.config)?;
        self.run_with_stats(documents, stats)
    }

    fn run_with_stats(
        &self,
        documents: Vec<Document>,
        load_stats: LoadStats,
    ) -> Result<PipelineOutput, PipelineError> {
        let mut report = PipelineReport {
            records_read: load_stats.records_read,
            records_dropped_short: load_stats.dropped_short,
            records_dropped_malformed: load_stats.dropped_malformed,
            documents: documents.len(),
            ..PipelineReport::default()
        };

        let tokenized = tokenize::tokenize_documents(&self.lemmatizer, &documents);

        let vocab_filter = VocabFilter::new(&self.config, &self.lemmatizer);
        let (filtered, filter_stats) = vocab_filter.apply(tokenized);
        report.tokens_emitted = filter_stats.tokens_in;
        report.tokens_after_vocab_filter = filter_stats.tokens_kept;
        report.terms_before_rare_filter = filter_stats.terms_before_rare;
        report.terms_after_rare_filter = filter_stats.terms_after_rare;

        let (pruned, band, prune_stats) = prune::prune_by_idf(
            filtered,
            self.config.idf_lower_percentile,
            self.config.idf_upper_percentile,
        )?;
        report.pairs_before_prune = prune_stats.pairs_before;
        report.pairs_after_prune = prune_stats.pairs_after;
        report.idf_lower = band.lower;
        report.idf_upper = band.upper;

        let (matrix, empty_documents) =
            DocTermMatrix::from_doc_terms(&pruned, self.config.empty_doc_policy);
        report.empty_documents = empty_documents;
        report.rows = matrix.rows();
        report.cols = matrix.cols();
        report.nnz = matrix.nnz();

        Ok(PipelineOutput {
            matrix,
            documents,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_carries_the_policy_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.min_review_chars, 14);
        assert_eq!(config.rare_term_threshold, 5);
        assert_eq!(config.min_term_chars, 3);
        assert_eq!(config.idf_lower_percentile, 0.05);
        assert_eq!(config.idf_upper_percentile, 0.95);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn inverted_percentiles_are_rejected() {
        let config = PipelineConfig {
            idf_lower_percentile: 0.9,
            idf_upper_percentile: 0.1,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn out_of_range_percentiles_are_rejected() {
        let config = PipelineConfig {
            idf_upper_percentile: 1.5,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
