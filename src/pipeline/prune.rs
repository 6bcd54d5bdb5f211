use indexmap::IndexMap;
use serde::Serialize;

use crate::error::PipelineError;

use super::filter::DocTerms;

/// Transient TF-IDF annotation for one (document, term) pair.
/// Exists only to decide retention; the matrix is built from raw counts.
#[derive(Debug, Clone, Copy)]
pub struct TfIdf {
    pub tf: f64,
    pub idf: f64,
}

/// The retained IDF band, open at both ends.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IdfBand {
    pub lower: f64,
    pub upper: f64,
}

impl IdfBand {
    #[inline]
    pub fn contains(&self, idf: f64) -> bool {
        idf > self.lower && idf < self.upper
    }
}

/// Counters describing the pruning pass.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PruneStats {
    pub pairs_before: usize,
    pub pairs_after: usize,
}

/// Percentile with linear interpolation between closest ranks, over an
/// ascending-sorted sample. `p` is a fraction in 0..=1.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (rank - lo as f64) * (sorted[hi] - sorted[lo])
    }
}

/// Prune (document, term) pairs whose IDF falls outside the configured
/// percentile band.
///
/// Definitions, all computed on the already-filtered corpus coming out of the
/// vocabulary filter (not the original corpus):
/// - `TF(doc, term) = count(doc, term) / total_tokens(doc)` with the
///   post-filter token total as denominator
/// - `IDF(term) = ln(total_documents / documents_containing(term))` where
///   `total_documents` counts every row of the input table, empty rows
///   included
///
/// The percentile cutoffs are taken over the IDF values of the pair table,
/// one sample per (document, term) pair rather than per distinct term, so
/// terms occurring in many documents weigh the distribution accordingly.
/// Retention is strict: pairs sitting exactly on a cutoff are pruned.
///
/// # Arguments
/// * `docs` - per-document term counts from the vocabulary filter
/// * `lower_pct` / `upper_pct` - percentile fractions, e.g. 0.05 and 0.95
///
/// # Returns
/// * `(Vec<DocTerms>, IdfBand, PruneStats)` - narrowed counts in document
///   order, the computed band, and counters
pub fn prune_by_idf(
    docs: Vec<DocTerms>,
    lower_pct: f64,
    upper_pct: f64,
) -> Result<(Vec<DocTerms>, IdfBand, PruneStats), PipelineError> {
    // callers going through the pipeline have validated the config, but this
    // entry point is public; a fraction outside 0..=1 would index past the
    // sample table
    let in_range = |p: f64| (0.0..=1.0).contains(&p);
    if !in_range(lower_pct) || !in_range(upper_pct) || lower_pct >= upper_pct {
        return Err(PipelineError::InvalidConfig(format!(
            "idf percentile fractions must satisfy 0 <= lower < upper <= 1, \
             got ({lower_pct}, {upper_pct})"
        )));
    }

    let total_documents = docs.len();

    // document frequency per term, in first-seen order
    let mut doc_freq: IndexMap<String, u32> = IndexMap::new();
    for doc in &docs {
        for term in doc.counts.keys() {
            *doc_freq.entry(term.clone()).or_insert(0) += 1;
        }
    }

    let idf_of = |term: &str| -> f64 {
        let df = doc_freq[term] as f64;
        (total_documents as f64 / df).ln()
    };

    // occurrence-weighted sample: one IDF value per (document, term) pair
    let mut samples: Vec<f64> = Vec::new();
    for doc in &docs {
        for term in doc.counts.keys() {
            samples.push(idf_of(term));
        }
    }
    let pairs_before = samples.len();
    if samples.is_empty() {
        return Err(PipelineError::DegenerateCorpus(
            "no (document, term) pairs survive vocabulary filtering".into(),
        ));
    }

    samples.sort_by(|a, b| a.total_cmp(b));
    let band = IdfBand {
        lower: percentile(&samples, lower_pct),
        upper: percentile(&samples, upper_pct),
    };
    if band.lower >= band.upper {
        return Err(PipelineError::DegenerateCorpus(format!(
            "idf percentile band is empty (lower {:.4} >= upper {:.4}); \
             the corpus is too small or too uniform for percentile pruning",
            band.lower, band.upper
        )));
    }

    let mut docs = docs;
    let mut pairs_after = 0usize;
    for doc in &mut docs {
        let token_total = doc.token_total();
        doc.counts.retain(|term, &mut count| {
            let annotation = TfIdf {
                tf: count as f64 / token_total as f64,
                idf: idf_of(term),
            };
            band.contains(annotation.idf)
        });
        pairs_after += doc.counts.len();
    }

    let stats = PruneStats {
        pairs_before,
        pairs_after,
    };
    Ok((docs, band, stats))
}
