use indexmap::IndexSet;

/// Default English stop words: articles, pronouns, prepositions,
/// conjunctions, auxiliaries and common contractions. The tokenizer keeps
/// apostrophes inside words, so contractions appear both with and without
/// the apostrophe to cover datasets that strip them.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    // articles / determiners
    "a", "an", "the", "this", "that", "these", "those", "some", "any", "each", "every", "either",
    "neither", "both", "all", "such",
    // pronouns
    "i", "me", "my", "mine", "myself", "we", "us", "our", "ours", "ourselves", "you", "your",
    "yours", "yourself", "he", "him", "his", "himself", "she", "her", "hers", "herself", "it",
    "its", "itself", "they", "them", "their", "theirs", "themselves", "who", "whom", "whose",
    "which", "what",
    // prepositions
    "in", "on", "at", "by", "for", "with", "about", "against", "between", "into", "through",
    "during", "before", "after", "above", "below", "to", "from", "up", "down", "out", "off",
    "over", "under", "of", "as",
    // conjunctions
    "and", "but", "or", "nor", "so", "yet", "if", "because", "while", "although", "though",
    "than", "then", "when", "where", "why", "how",
    // auxiliaries / copulas
    "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
    "do", "does", "did", "doing", "will", "would", "shall", "should", "can", "could", "may",
    "might", "must",
    // adverbial filler
    "not", "no", "too", "very", "just", "here", "there", "again", "also", "only", "own", "same",
    "more", "most", "other", "few", "now",
    // contractions, with and without apostrophes
    "don't", "dont", "doesn't", "doesnt", "didn't", "didnt", "isn't", "isnt", "wasn't", "wasnt",
    "aren't", "arent", "weren't", "werent", "won't", "wont", "wouldn't", "wouldnt", "can't",
    "cant", "couldn't", "couldnt", "shouldn't", "shouldnt", "haven't", "havent", "hasn't",
    "hasnt", "hadn't", "hadnt", "i'm", "i've", "i'll", "i'd", "it's", "that's", "there's",
    "they're", "you're", "we're", "he's", "she's", "what's", "let's",
];

/// Build the default stop-word set in a deterministic order.
pub fn default_stop_words() -> IndexSet<String> {
    DEFAULT_STOP_WORDS
        .iter()
        .map(|word| (*word).to_string())
        .collect()
}
