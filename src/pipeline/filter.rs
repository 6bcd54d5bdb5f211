use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use serde::Serialize;

use super::loader::DocId;
use super::tokenize::{DocTokens, Lemmatizer};
use super::PipelineConfig;

/// Per-document term counts after vocabulary filtering.
/// Original token order is gone from this point on (bag-of-words).
#[derive(Debug, Clone)]
pub struct DocTerms {
    pub doc_id: DocId,
    /// term -> occurrence count inside this document, in first-seen order.
    pub counts: IndexMap<String, u32>,
}

impl DocTerms {
    /// Total surviving token occurrences in this document.
    #[inline]
    pub fn token_total(&self) -> u64 {
        self.counts.values().map(|&c| c as u64).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Counters describing how the vocabulary narrowed.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct FilterStats {
    /// Token occurrences entering the filter.
    pub tokens_in: usize,
    /// Token occurrences surviving stop-word/numeric/exclusion/length checks.
    pub tokens_kept: usize,
    /// Distinct terms before the rare-term cut.
    pub terms_before_rare: usize,
    /// Distinct terms after the rare-term cut.
    pub terms_after_rare: usize,
}

/// Removes stop words, numeric tokens, corpus-specific exclusions, short
/// tokens, and rare terms from the lemma stream.
///
/// Stop words and exclusions are matched against lemmas, so both sets are
/// lemmatized at construction time; this lets one configured brand name catch
/// its inflected variants as well.
pub struct VocabFilter {
    stop_words: IndexSet<String>,
    excluded: IndexSet<String>,
    min_term_chars: usize,
    rare_term_threshold: u64,
}

impl VocabFilter {
    pub fn new(config: &PipelineConfig, lemmatizer: &Lemmatizer) -> Self {
        // keep both the surface form and its lemma so that either spelling
        // of a configured word is caught
        let lemmatized = |set: &IndexSet<String>| -> IndexSet<String> {
            let mut out = IndexSet::new();
            for word in set {
                let word = word.to_lowercase();
                out.insert(lemmatizer.lemma(&word));
                out.insert(word);
            }
            out
        };
        Self {
            stop_words: lemmatized(&config.stop_words),
            excluded: lemmatized(&config.excluded_terms),
            min_term_chars: config.min_term_chars,
            rare_term_threshold: config.rare_term_threshold,
        }
    }

    /// Per-token checks: (a) stop word, (b) purely numeric, (c) excluded,
    /// (e) too short. The rare-term cut (d) needs corpus-wide counts and is
    /// applied in `apply` after these, so that discarded low-value tokens
    /// cannot distort the counts of legitimate rare terms.
    #[inline]
    fn keep_token(&self, lemma: &str) -> bool {
        !self.stop_words.contains(lemma)
            && !lemma.chars().all(char::is_numeric)
            && !self.excluded.contains(lemma)
            && lemma.chars().count() >= self.min_term_chars
    }

    /// Run the full vocabulary filter over the token stream.
    ///
    /// Documents whose every term is filtered away stay in the output as
    /// empty rows; the matrix builder applies the configured policy to them.
    ///
    /// # Returns
    /// * `(Vec<DocTerms>, FilterStats)` - per-document counts in document
    ///   order, plus narrowing counters
    pub fn apply(&self, documents: Vec<DocTokens>) -> (Vec<DocTerms>, FilterStats) {
        let tokens_in: usize = documents.iter().map(|d| d.lemmas.len()).sum();

        // per-document counting is independent; merge keeps document order
        let mut docs: Vec<DocTerms> = documents
            .par_iter()
            .map(|doc| {
                let mut counts: IndexMap<String, u32> = IndexMap::new();
                for lemma in &doc.lemmas {
                    if self.keep_token(lemma) {
                        *counts.entry(lemma.clone()).or_insert(0) += 1;
                    }
                }
                DocTerms {
                    doc_id: doc.doc_id,
                    counts,
                }
            })
            .collect();

        let tokens_kept: usize = docs.iter().map(|d| d.token_total() as usize).sum();

        // corpus-wide occurrence totals over the already-cleaned stream
        let mut corpus_counts: IndexMap<String, u64> = IndexMap::new();
        for doc in &docs {
            for (term, &count) in &doc.counts {
                *corpus_counts.entry(term.clone()).or_insert(0) += count as u64;
            }
        }
        let terms_before_rare = corpus_counts.len();

        // (d) rare-term cut: keep only terms whose corpus count exceeds the
        // threshold
        let rare: IndexSet<String> = corpus_counts
            .iter()
            .filter(|(_, &total)| total <= self.rare_term_threshold)
            .map(|(term, _)| term.clone())
            .collect();
        let terms_after_rare = terms_before_rare - rare.len();

        for doc in &mut docs {
            doc.counts.retain(|term, _| !rare.contains(term.as_str()));
        }

        let stats = FilterStats {
            tokens_in,
            tokens_kept,
            terms_before_rare,
            terms_after_rare,
        };
        (docs, stats)
    }
}
