//! JSON and CSV import/export of a single category.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::LibraryError;
use crate::model::WordEntry;
use crate::store::{BatchError, WordStore};

/// CSV export column order.
pub const CSV_HEADER: [&str; 4] = ["word", "partOfSpeech", "chinese", "english"];

/// Part of speech assumed for CSV rows that leave it out.
pub const DEFAULT_PART_OF_SPEECH: &str = "n.";

const WORD_ALIASES: &[&str] = &["word", "Word"];
const POS_ALIASES: &[&str] = &["partOfSpeech", "part of speech", "词性"];
const CHINESE_ALIASES: &[&str] = &["chinese", "Chinese", "中文释义"];
const ENGLISH_ALIASES: &[&str] = &["english", "English", "英文释义"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferFormat {
    Json,
    Csv,
}

impl TransferFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TransferFormat::Json => "json",
            TransferFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            TransferFormat::Json => "application/json",
            TransferFormat::Csv => "text/csv",
        }
    }
}

impl fmt::Display for TransferFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TransferFormat {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(TransferFormat::Json),
            "csv" => Ok(TransferFormat::Csv),
            other => Err(LibraryError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Summary of an import.
///
/// `skipped` counts well-formed rows the store rejected (duplicates);
/// `errors` lists those plus every row that failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub total: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<BatchError>,
}

/// A rendered export, ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub data: String,
    pub filename: String,
    pub content_type: &'static str,
    pub word_count: usize,
}

/// Loosely-typed row used before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRow {
    word: Option<String>,
    part_of_speech: Option<String>,
    chinese: Option<String>,
    english: Option<String>,
}

impl RawRow {
    fn into_entry(self) -> WordEntry {
        WordEntry::new(
            self.word.unwrap_or_default(),
            self.part_of_speech.unwrap_or_default(),
            self.chinese.unwrap_or_default(),
            self.english.unwrap_or_default(),
        )
    }
}

type ParsedRow = Result<WordEntry, (String, LibraryError)>;

/// Parse `data` and add every valid row to `category`.
///
/// Unparseable top-level data, or a payload without a single valid row, is an
/// error and leaves the store untouched.
pub fn import_words(
    store: &mut WordStore,
    data: &str,
    format: TransferFormat,
    category: &str,
) -> Result<ImportReport, LibraryError> {
    let rows = match format {
        TransferFormat::Json => parse_json(data)?,
        TransferFormat::Csv => parse_csv(data)?,
    };

    if !rows.iter().any(Result::is_ok) {
        return Err(LibraryError::MalformedImport(format!(
            "no valid word entries among {} row(s)",
            rows.len()
        )));
    }

    let mut report = ImportReport {
        total: rows.len(),
        ..ImportReport::default()
    };

    for (index, row) in rows.into_iter().enumerate() {
        match row {
            Ok(entry) => match store.add_word(category, &entry) {
                Ok(_) => report.imported += 1,
                Err(reason) => {
                    report.skipped += 1;
                    report.errors.push(BatchError {
                        index,
                        word: entry.word,
                        reason,
                    });
                }
            },
            Err((word, reason)) => {
                tracing::warn!("skipping import row {index}: {reason}");
                report.errors.push(BatchError {
                    index,
                    word,
                    reason,
                });
            }
        }
    }

    tracing::info!(
        "imported {}/{} word(s) into \"{category}\" ({format})",
        report.imported,
        report.total
    );
    Ok(report)
}

fn validate(entry: WordEntry) -> ParsedRow {
    entry.normalized().map_err(|e| (entry.word.clone(), e))
}

fn parse_json(data: &str) -> Result<Vec<ParsedRow>, LibraryError> {
    let value: serde_json::Value = serde_json::from_str(data)
        .map_err(|e| LibraryError::MalformedImport(format!("invalid JSON: {e}")))?;
    let serde_json::Value::Array(items) = value else {
        return Err(LibraryError::MalformedImport(
            "JSON data must be an array of word entries".into(),
        ));
    };

    Ok(items
        .into_iter()
        .map(|item| match serde_json::from_value::<RawRow>(item) {
            Ok(raw) => validate(raw.into_entry()),
            Err(e) => Err((
                String::new(),
                LibraryError::InvalidFormat(format!("not a word entry: {e}")),
            )),
        })
        .collect())
}

fn parse_csv(data: &str) -> Result<Vec<ParsedRow>, LibraryError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LibraryError::MalformedImport(format!("invalid CSV header: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let column = |aliases: &[&str]| headers.iter().position(|h| aliases.contains(&h.as_str()));
    let word_col = column(WORD_ALIASES);
    let pos_col = column(POS_ALIASES);
    let chinese_col = column(CHINESE_ALIASES);
    let english_col = column(ENGLISH_ALIASES);

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                rows.push(Err((
                    String::new(),
                    LibraryError::InvalidFormat(format!("unreadable CSV row: {e}")),
                )));
                continue;
            }
        };
        if record.iter().all(str::is_empty) {
            continue;
        }
        let field = |col: Option<usize>| {
            col.and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string()
        };
        let word = field(word_col);

        if record.len() != headers.len() {
            rows.push(Err((
                word,
                LibraryError::InvalidFormat(format!(
                    "row {} has {} field(s), header has {}",
                    line + 1,
                    record.len(),
                    headers.len()
                )),
            )));
            continue;
        }

        let mut part_of_speech = field(pos_col);
        if part_of_speech.is_empty() {
            part_of_speech = DEFAULT_PART_OF_SPEECH.to_string();
        }
        rows.push(validate(WordEntry::new(
            word,
            part_of_speech,
            field(chinese_col),
            field(english_col),
        )));
    }
    Ok(rows)
}

/// Render one category as JSON or CSV.
pub fn export_words(
    store: &WordStore,
    category: &str,
    format: TransferFormat,
) -> Result<ExportedFile, LibraryError> {
    if !store.has_category(category) {
        return Err(LibraryError::CategoryNotFound(category.to_string()));
    }
    let words = store.words_by_category(category);
    if words.is_empty() {
        return Err(LibraryError::EmptyCategory(category.to_string()));
    }

    let data = match format {
        TransferFormat::Json => serde_json::to_string_pretty(words)
            .map_err(|e| LibraryError::InvalidFormat(e.to_string()))?,
        TransferFormat::Csv => to_csv(words)?,
    };

    Ok(ExportedFile {
        data,
        filename: format!("{category}_words.{}", format.extension()),
        content_type: format.content_type(),
        word_count: words.len(),
    })
}

fn to_csv(words: &[WordEntry]) -> Result<String, LibraryError> {
    let csv_err = |e: csv::Error| LibraryError::InvalidFormat(format!("CSV encoding failed: {e}"));

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER).map_err(csv_err)?;
    for w in words {
        writer
            .write_record([&w.word, &w.part_of_speech, &w.chinese, &w.english])
            .map_err(csv_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| LibraryError::InvalidFormat(format!("CSV encoding failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| LibraryError::InvalidFormat(e.to_string()))
}
