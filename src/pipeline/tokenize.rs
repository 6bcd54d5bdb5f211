use rayon::prelude::*;
use rust_stemmers::{Algorithm, Stemmer};

use super::loader::{DocId, Document};

/// Pure token -> lemma mapping backed by the Snowball English stemmer.
///
/// Carries no cross-document state; the same token always maps to the same
/// lemma, and the mapping is idempotent over its own output.
pub struct Lemmatizer {
    stemmer: Stemmer,
}

impl Lemmatizer {
    pub fn english() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Reduce one token to its canonical root form.
    #[inline]
    pub fn lemma(&self, token: &str) -> String {
        self.stemmer.stem(token).into_owned()
    }
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::english()
    }
}

/// All lemmas of one document, one entry per token occurrence.
/// Token order is still the surface order here; it is discarded once the
/// vocabulary filter turns the stream into per-document counts.
#[derive(Debug, Clone)]
pub struct DocTokens {
    pub doc_id: DocId,
    pub lemmas: Vec<String>,
}

/// Split text on word boundaries, lowercase each fragment, and drop
/// fragments with no alphanumeric content (punctuation runs, stray quotes).
/// Apostrophes are kept inside words so contractions survive as one token.
pub fn word_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter_map(|fragment| {
            let fragment = fragment.trim_matches('\'');
            fragment
                .chars()
                .any(char::is_alphanumeric)
                .then(|| fragment.to_lowercase())
        })
}

/// Tokenize and lemmatize every document.
///
/// Emits one lemma per input token occurrence (no deduplication yet;
/// downstream counting depends on raw multiplicity). Documents are
/// independent, so the map runs in parallel; `collect` puts the results back
/// in document order.
pub fn tokenize_documents(lemmatizer: &Lemmatizer, documents: &[Document]) -> Vec<DocTokens> {
    documents
        .par_iter()
        .map(|doc| DocTokens {
            doc_id: doc.id,
            lemmas: word_tokens(&doc.text)
                .map(|token| lemmatizer.lemma(&token))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_tokens_lowercase_and_drop_punctuation() {
        let tokens: Vec<String> = word_tokens("Great coffee!! -- really, REALLY good.").collect();
        assert_eq!(tokens, vec!["great", "coffee", "really", "really", "good"]);
    }

    #[test]
    fn word_tokens_keep_contractions_whole() {
        let tokens: Vec<String> = word_tokens("don't stop").collect();
        assert_eq!(tokens, vec!["don't", "stop"]);
    }

    #[test]
    fn word_tokens_preserve_multiplicity() {
        let tokens: Vec<String> = word_tokens("great great great").collect();
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn lemmatizer_reduces_inflections() {
        let lemmatizer = Lemmatizer::english();
        assert_eq!(lemmatizer.lemma("running"), "run");
        assert_eq!(lemmatizer.lemma("cats"), "cat");
        assert_eq!(lemmatizer.lemma("windows"), "window");
    }

    #[test]
    fn lemmatizer_is_idempotent_over_its_own_output() {
        let lemmatizer = Lemmatizer::english();
        let words = [
            "running", "ran", "burgers", "services", "ordered", "waiting", "fries", "tables",
            "quickly", "friendly", "terrible", "great", "locations", "happened",
        ];
        for word in words {
            let once = lemmatizer.lemma(word);
            let twice = lemmatizer.lemma(&once);
            assert_eq!(once, twice, "lemma not stable for {word}");
        }
    }

    #[test]
    fn tokenize_documents_keeps_document_order() {
        let lemmatizer = Lemmatizer::english();
        let docs: Vec<Document> = (0..8)
            .map(|i| Document {
                id: i,
                text: format!("review number {i} with some words"),
                rating: None,
                date: None,
                location: None,
                char_len: 30,
                has_image: false,
            })
            .collect();
        let tokenized = tokenize_documents(&lemmatizer, &docs);
        let ids: Vec<DocId> = tokenized.iter().map(|t| t.doc_id).collect();
        assert_eq!(ids, (0..8).collect::<Vec<DocId>>());
    }
}
