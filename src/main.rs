use std::fs::File;
use std::io::BufWriter;
use std::time::Instant;

use anyhow::{bail, Context};
use review_dtm::{EmptyDocPolicy, Pipeline, PipelineConfig};

fn print_usage() {
    eprintln!("Usage: review-dtm --input FILE [options]");
    eprintln!("  --input FILE        CSV dataset of reviews (required)");
    eprintln!("  --out FILE          write the matrix artifact as CBOR");
    eprintln!("  --min-chars N       minimum review length in chars (default 14)");
    eprintln!("  --rare N            rare-term threshold, keep count > N (default 5)");
    eprintln!("  --min-term-len N    minimum term length in chars (default 3)");
    eprintln!("  --idf-band LO,HI    idf percentile fractions (default 0.05,0.95)");
    eprintln!("  --exclude w1,w2     corpus-specific exclusion terms");
    eprintln!("  --policy drop|keep  empty-document policy (default drop)");
}

fn parse_args() -> anyhow::Result<(String, Option<String>, PipelineConfig)> {
    let mut args = std::env::args().skip(1);
    let mut input: Option<String> = None;
    let mut out: Option<String> = None;
    let mut config = PipelineConfig::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--input" => {
                input = Some(args.next().context("--input requires a path")?);
            }
            "--out" => {
                out = Some(args.next().context("--out requires a path")?);
            }
            "--min-chars" => {
                let value = args.next().context("--min-chars requires a number")?;
                config.min_review_chars = value.parse().context("--min-chars must be a number")?;
            }
            "--rare" => {
                let value = args.next().context("--rare requires a number")?;
                config.rare_term_threshold = value.parse().context("--rare must be a number")?;
            }
            "--min-term-len" => {
                let value = args.next().context("--min-term-len requires a number")?;
                config.min_term_chars = value.parse().context("--min-term-len must be a number")?;
            }
            "--idf-band" => {
                let value = args.next().context("--idf-band requires LO,HI")?;
                let (lo, hi) = value
                    .split_once(',')
                    .context("--idf-band expects two fractions, e.g. 0.05,0.95")?;
                config.idf_lower_percentile = lo.trim().parse().context("bad lower fraction")?;
                config.idf_upper_percentile = hi.trim().parse().context("bad upper fraction")?;
            }
            "--exclude" => {
                let value = args.next().context("--exclude requires a word list")?;
                config.excluded_terms = value
                    .split(',')
                    .map(|w| w.trim().to_string())
                    .filter(|w| !w.is_empty())
                    .collect();
            }
            "--policy" => {
                let value = args.next().context("--policy requires drop or keep")?;
                config.empty_doc_policy = match value.as_str() {
                    "drop" => EmptyDocPolicy::Drop,
                    "keep" => EmptyDocPolicy::KeepZeroRows,
                    other => bail!("unknown policy {other:?}, expected drop or keep"),
                };
            }
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            other => bail!("unknown argument {other:?} (try --help)"),
        }
    }

    let input = input.context("--input is required (try --help)")?;
    Ok((input, out, config))
}

fn run() -> anyhow::Result<()> {
    let (input, out, config) = parse_args()?;
    let pipeline = Pipeline::new(config)?;

    eprintln!("[stage] loading records from {input}");
    let start = Instant::now();
    let output = pipeline.run_csv_path(&input)?;
    let report = &output.report;

    eprintln!(
        "[info] loaded {} documents ({} records, {} dropped as too short, {} undecodable)",
        report.documents,
        report.records_read,
        report.records_dropped_short,
        report.records_dropped_malformed
    );
    eprintln!(
        "[info] tokens: {} emitted, {} kept after vocabulary filter",
        report.tokens_emitted, report.tokens_after_vocab_filter
    );
    eprintln!(
        "[info] terms: {} -> {} across the rare-term cut",
        report.terms_before_rare_filter, report.terms_after_rare_filter
    );
    eprintln!(
        "[info] idf band ({:.4}, {:.4}), pairs {} -> {}",
        report.idf_lower, report.idf_upper, report.pairs_before_prune, report.pairs_after_prune
    );
    if !report.empty_documents.is_empty() {
        eprintln!(
            "[warn] {} documents lost all terms: {:?}",
            report.empty_documents.len(),
            report.empty_documents
        );
    }
    eprintln!(
        "[info] matrix {} x {} with {} nonzeros",
        report.rows, report.cols, report.nnz
    );

    if let Some(path) = out {
        eprintln!("[stage] writing matrix artifact to {path}");
        let file = File::create(&path).with_context(|| format!("cannot create {path}"))?;
        output.matrix.save_cbor(BufWriter::new(file))?;
    }

    eprintln!(
        "[time] pipeline_total={:.2}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("[error] {error:#}");
        std::process::exit(1);
    }
}
