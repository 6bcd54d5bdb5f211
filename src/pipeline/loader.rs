use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

use super::PipelineConfig;

/// Document identifier.
/// Assigned once, in record order, when the dataset is loaded.
/// Later stages may drop documents but never renumber the survivors.
pub type DocId = u32;

/// One review record as it appears in the raw dataset.
///
/// Column names vary between dataset exports, so the common spellings are
/// accepted as aliases. Only the review text is structural; every other
/// column is optional and parsed fail-soft.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(alias = "review", alias = "review_text")]
    text: String,
    #[serde(default, alias = "stars")]
    rating: Option<String>,
    #[serde(default, alias = "review_time", alias = "timestamp")]
    date: Option<String>,
    #[serde(default, alias = "store_address")]
    location: Option<String>,
    #[serde(default, alias = "review_image", alias = "image_links")]
    images: Option<String>,
}

/// One loaded review with its normalized metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier, equal to the record's position in the dataset.
    pub id: DocId,
    /// Whitespace-trimmed review text.
    pub text: String,
    /// Star rating in 1..=5. Unparseable or out-of-range values become
    /// `None`, never 0.
    pub rating: Option<u8>,
    /// Review date. Unparseable timestamps become `None`, not an error.
    pub date: Option<NaiveDate>,
    /// Free-form location label, if the dataset carries one.
    pub location: Option<String>,
    /// Text length in characters (not bytes).
    pub char_len: usize,
    /// Whether the record's image-links field holds anything besides the
    /// "no images" sentinel.
    pub has_image: bool,
}

/// Counters describing what the loader kept and dropped.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LoadStats {
    pub records_read: usize,
    /// Records rejected because the review text was below the configured
    /// minimum length.
    pub dropped_short: usize,
    /// Records that failed to decode (invalid UTF-8, missing text column).
    pub dropped_malformed: usize,
}

/// Parse a star rating like `"5"` or `"5 stars"`.
/// Anything that does not start with a digit in 1..=5 becomes `None`.
fn parse_rating(raw: &str) -> Option<u8> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let value: u8 = digits.parse().ok()?;
    (1..=5).contains(&value).then_some(value)
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%B %d, %Y",
];

/// Try the recognized timestamp layouts in order.
/// Relative forms ("3 months ago") and anything else unrecognized yield
/// `None`.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }
    None
}

/// Sentinel values the image-links column uses to mean "no images".
fn has_image(raw: &str) -> bool {
    let raw = raw.trim();
    !(raw.is_empty()
        || raw == "[]"
        || raw.eq_ignore_ascii_case("no images")
        || raw.eq_ignore_ascii_case("none"))
}

/// Load review records from any CSV reader.
///
/// Each record gets a `DocId` equal to its position in the input, including
/// records that are then rejected for short text, so identifiers stay stable
/// against the raw dataset.
///
/// Record-level decode failures (invalid UTF-8, a missing text column) drop
/// that record and move on; only failures of the underlying stream abort the
/// run.
///
/// # Arguments
/// * `reader` - CSV input with a header row
/// * `config` - pipeline configuration (only `min_review_chars` is used here)
///
/// # Returns
/// * `(Vec<Document>, LoadStats)` - retained documents in record order
pub fn load_records<R: Read>(
    reader: R,
    config: &PipelineConfig,
) -> Result<(Vec<Document>, LoadStats), PipelineError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut documents = Vec::new();
    let mut stats = LoadStats::default();

    for record in csv_reader.deserialize::<RawRecord>() {
        let id = stats.records_read as DocId;
        stats.records_read += 1;
        let record = match record {
            Ok(record) => record,
            // a broken stream is fatal; a broken record is just dropped
            Err(error) if matches!(error.kind(), csv::ErrorKind::Io(_)) => {
                return Err(error.into())
            }
            Err(_) => {
                stats.dropped_malformed += 1;
                continue;
            }
        };

        let text = record.text.trim().to_string();
        let char_len = text.chars().count();
        if char_len < config.min_review_chars {
            stats.dropped_short += 1;
            continue;
        }

        documents.push(Document {
            id,
            text,
            rating: record.rating.as_deref().and_then(parse_rating),
            date: record.date.as_deref().and_then(parse_date),
            location: record
                .location
                .map(|loc| loc.trim().to_string())
                .filter(|loc| !loc.is_empty()),
            char_len,
            has_image: record.images.as_deref().map_or(false, has_image),
        });
    }

    Ok((documents, stats))
}

/// Load review records from a CSV file on disk.
/// An unreadable dataset is fatal.
pub fn load_records_path<P: AsRef<Path>>(
    path: P,
    config: &PipelineConfig,
) -> Result<(Vec<Document>, LoadStats), PipelineError> {
    let file = File::open(path.as_ref()).map_err(|source| PipelineError::DatasetIo {
        path: path.as_ref().to_path_buf(),
        source,
    })?;
    load_records(file, config)
}
