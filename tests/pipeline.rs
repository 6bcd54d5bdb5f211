use review_dtm::pipeline::filter::VocabFilter;
use review_dtm::pipeline::loader::load_records;
use review_dtm::pipeline::tokenize::{tokenize_documents, Lemmatizer};
use review_dtm::{EmptyDocPolicy, Pipeline, PipelineConfig, PipelineError};

/// Three reviews: doc A and B survive loading, doc C ("ok") is shorter than
/// the minimum and is dropped before any later stage sees it.
const THREE_DOC_CSV: &str = "\
text,rating
the coffee is great great great,5
terrible coffee terrible service,1
ok,3
";

fn scenario_config() -> PipelineConfig {
    PipelineConfig {
        min_review_chars: 3,
        rare_term_threshold: 0,
        ..PipelineConfig::default()
    }
}

#[test]
fn short_review_never_reaches_later_stages() {
    let config = scenario_config();
    let (docs, stats) = load_records(THREE_DOC_CSV.as_bytes(), &config).unwrap();
    assert_eq!(stats.records_read, 3);
    assert_eq!(stats.dropped_short, 1);
    let ids: Vec<u32> = docs.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![0, 1]);
    assert_eq!(docs[0].rating, Some(5));
    assert_eq!(docs[1].rating, Some(1));
}

#[test]
fn coffee_is_shared_while_great_and_terrible_are_document_specific() {
    let config = scenario_config();
    let lemmatizer = Lemmatizer::english();
    let (docs, _) = load_records(THREE_DOC_CSV.as_bytes(), &config).unwrap();
    let tokenized = tokenize_documents(&lemmatizer, &docs);
    let (filtered, _) = VocabFilter::new(&config, &lemmatizer).apply(tokenized);

    let coffee = lemmatizer.lemma("coffee");
    let great = lemmatizer.lemma("great");
    let terrible = lemmatizer.lemma("terrible");

    // "coffee" appears in both surviving documents: maximal document
    // frequency, hence minimal idf, the candidate for upper-bound pruning
    assert!(filtered[0].counts.contains_key(&coffee));
    assert!(filtered[1].counts.contains_key(&coffee));
    // the discriminating terms stay document-specific
    assert_eq!(filtered[0].counts[&great], 3);
    assert!(!filtered[1].counts.contains_key(&great));
    assert!(filtered[1].counts.contains_key(&terrible));
    assert!(!filtered[0].counts.contains_key(&terrible));
}

#[test]
fn two_document_corpus_collapses_under_strict_pruning() {
    // with only two documents every idf value sits on a band endpoint, so
    // strict retention empties both documents; the pipeline surfaces them
    // instead of passing zero rows along silently
    let pipeline = Pipeline::new(scenario_config()).unwrap();
    let config = scenario_config();
    let (docs, _) = load_records(THREE_DOC_CSV.as_bytes(), &config).unwrap();
    let output = pipeline.run(docs).unwrap();
    assert_eq!(output.report.empty_documents, vec![0, 1]);
    assert_eq!(output.matrix.rows(), 0);
}

/// Six reviews engineered with three idf levels: "coffee" in all six,
/// "staff" in three, and every other content word in exactly one.
const SIX_DOC_CSV: &str = "\
text,rating,images
the coffee was fresh and the window seat was clean staff,5,[]
coffee again today and the door was broken staff,2,photo.jpg
coffee with friends near the wall art staff,4,No Images
just coffee nothing else really,3,[]
coffee coffee coffee all day long,5,[]
coffee stop for the morning run,4,[]
";

fn six_doc_config() -> PipelineConfig {
    PipelineConfig {
        rare_term_threshold: 0,
        ..PipelineConfig::default()
    }
}

#[test]
fn pruning_keeps_the_middle_band_only() {
    let pipeline = Pipeline::new(six_doc_config()).unwrap();
    let config = six_doc_config();
    let (docs, _) = load_records(SIX_DOC_CSV.as_bytes(), &config).unwrap();
    let output = pipeline.run(docs).unwrap();

    // "coffee" (idf 0, too common) and the one-document words (maximal idf,
    // too rare) are pruned; only "staff" survives
    let staff = Lemmatizer::english().lemma("staff");
    assert_eq!(output.matrix.terms(), &[staff]);
    assert_eq!(output.matrix.doc_ids(), &[0, 1, 2]);
    assert_eq!(output.report.empty_documents, vec![3, 4, 5]);
    for row in 0..output.matrix.rows() {
        assert_eq!(output.matrix.get(row, 0), 1);
    }
    assert!(output.report.idf_lower < output.report.idf_upper);
}

#[test]
fn keep_policy_retains_empty_documents_as_zero_rows() {
    let config = PipelineConfig {
        empty_doc_policy: EmptyDocPolicy::KeepZeroRows,
        ..six_doc_config()
    };
    let pipeline = Pipeline::new(config.clone()).unwrap();
    let (docs, _) = load_records(SIX_DOC_CSV.as_bytes(), &config).unwrap();
    let output = pipeline.run(docs).unwrap();
    assert_eq!(output.matrix.rows(), 6);
    assert_eq!(output.report.empty_documents, vec![3, 4, 5]);
    let row = output.matrix.row_of_doc(4).unwrap();
    assert_eq!(output.matrix.row_iter(row).count(), 0);
}

#[test]
fn identical_runs_produce_identical_matrices() {
    let run = || {
        let config = six_doc_config();
        let pipeline = Pipeline::new(config.clone()).unwrap();
        let (docs, _) = load_records(SIX_DOC_CSV.as_bytes(), &config).unwrap();
        pipeline.run(docs).unwrap()
    };
    let a = run();
    let b = run();
    assert_eq!(a.matrix, b.matrix);
    assert_eq!(a.matrix.doc_ids(), b.matrix.doc_ids());
    assert_eq!(a.matrix.terms(), b.matrix.terms());
    assert_eq!(a.matrix.to_dense(), b.matrix.to_dense());
}

#[test]
fn metadata_travels_with_the_output() {
    let config = six_doc_config();
    let pipeline = Pipeline::new(config.clone()).unwrap();
    let (docs, _) = load_records(SIX_DOC_CSV.as_bytes(), &config).unwrap();
    let output = pipeline.run(docs).unwrap();
    assert_eq!(output.documents.len(), 6);
    assert_eq!(output.documents[0].rating, Some(5));
    assert!(output.documents[1].has_image);
    assert!(!output.documents[2].has_image, "sentinel means no image");
}

#[test]
fn missing_dataset_is_a_fatal_io_error() {
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
    let err = pipeline
        .run_csv_path("/nonexistent/reviews.csv")
        .unwrap_err();
    assert!(matches!(err, PipelineError::DatasetIo { .. }));
}
