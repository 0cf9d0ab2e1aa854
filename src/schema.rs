//! Reference data model
//!
//! A `Row` is the raw user input for one lookup; `build_request` validates it
//! into an immutable `LookupRequest` snapshot. Later edits to a row never
//! affect an in-flight request.

use crate::error::RowError;
use crate::parse::parse_verse_spec;
use serde::{Deserialize, Serialize};

/// Delimiter used in reference keys and archive filenames.
pub const KEY_DELIMITER: &str = "_";

/// Text retrieval provider. Closed set: unknown labels fail validation
/// rather than defaulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provider {
    Gpt,
    BibleGateway,
}

impl Provider {
    /// Resolve a user-facing label (or wire id) to a provider.
    pub fn from_label(label: &str) -> Result<Self, RowError> {
        match label.trim().to_ascii_lowercase().as_str() {
            "gpt" => Ok(Provider::Gpt),
            "bible gateway" | "bg" => Ok(Provider::BibleGateway),
            other => Err(RowError::Validation {
                detail: format!("unknown source '{}' (expected GPT or BG)", other),
            }),
        }
    }

    /// Display label, as shown to users and sent in the request body.
    pub fn label(&self) -> &'static str {
        match self {
            Provider::Gpt => "GPT",
            Provider::BibleGateway => "Bible Gateway",
        }
    }

    /// Wire identifier the retrieval server keys its endpoints on.
    pub fn wire_id(&self) -> &'static str {
        match self {
            Provider::Gpt => "GPT",
            Provider::BibleGateway => "BG",
        }
    }

    /// Endpoint path on the retrieval server.
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            Provider::Gpt => "yoinkGPT",
            Provider::BibleGateway => "yoinkBG",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One raw input row: provider label plus the reference fields as entered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Row {
    pub source: String,
    pub version: String,
    pub book: String,
    pub chapter: String,
    /// Raw verse spec; empty means the whole chapter.
    pub verse: String,
}

impl Row {
    /// Parse one batch-file line: `SOURCE VERSION BOOK CHAPTER [VERSES]`,
    /// e.g. `BG NIV Genesis 1 1,2,3`. Missing tokens are left empty so that
    /// validation can report them per field. Book names are single tokens in
    /// this format.
    pub fn from_line(line: &str) -> Row {
        let mut parts = line.split_whitespace();
        Row {
            source: parts.next().unwrap_or_default().to_string(),
            version: parts.next().unwrap_or_default().to_string(),
            book: parts.next().unwrap_or_default().to_string(),
            chapter: parts.next().unwrap_or_default().to_string(),
            verse: parts.next().unwrap_or_default().to_string(),
        }
    }

    /// Reference key for this row as entered, usable even when the row fails
    /// validation, so failures stay attributable.
    pub fn key(&self) -> String {
        let spec = self.verse.trim();
        [
            self.book.trim(),
            self.chapter.trim(),
            if spec.is_empty() { "all" } else { spec },
            self.version.trim(),
        ]
        .join(KEY_DELIMITER)
    }
}

/// A validated, parsed reference. Snapshot of one row at submit time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerseReference {
    pub version: String,
    pub book: String,
    pub chapter: String,
    /// Enumerated verses; empty means "all verses".
    pub verses: Vec<u32>,
    /// The verse spec exactly as submitted (trimmed), used for keying.
    pub verse_spec: String,
    pub source: Provider,
}

impl VerseReference {
    /// Deterministic key: `book_chapter_spec_version`, with `all` standing
    /// in for an empty spec. Rows with identical fields produce identical
    /// keys and collapse in the bundle.
    pub fn key(&self) -> String {
        let spec = if self.verse_spec.is_empty() {
            "all"
        } else {
            self.verse_spec.as_str()
        };
        [
            self.book.as_str(),
            self.chapter.as_str(),
            spec,
            self.version.as_str(),
        ]
        .join(KEY_DELIMITER)
    }
}

/// A reference ready to dispatch. Immutable once built.
#[derive(Debug, Clone)]
pub struct LookupRequest {
    pub reference: VerseReference,
    pub key: String,
}

/// Validate a row and build its lookup request.
///
/// Requires non-empty book, chapter, and version; resolves the provider
/// label (fail closed); delegates the verse spec to the grammar and
/// propagates its error unchanged.
pub fn build_request(row: &Row) -> Result<LookupRequest, RowError> {
    let mut missing = Vec::new();
    if row.book.trim().is_empty() {
        missing.push("book");
    }
    if row.chapter.trim().is_empty() {
        missing.push("chapter");
    }
    if row.version.trim().is_empty() {
        missing.push("version");
    }
    if !missing.is_empty() {
        return Err(RowError::missing_fields(&missing));
    }

    let source = Provider::from_label(&row.source)?;
    let verses = parse_verse_spec(&row.verse)?;

    let reference = VerseReference {
        version: row.version.trim().to_string(),
        book: row.book.trim().to_string(),
        chapter: row.chapter.trim().to_string(),
        verses,
        verse_spec: row.verse.trim().to_string(),
        source,
    };
    let key = reference.key();

    Ok(LookupRequest { reference, key })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(source: &str, version: &str, book: &str, chapter: &str, verse: &str) -> Row {
        Row {
            source: source.into(),
            version: version.into(),
            book: book.into(),
            chapter: chapter.into(),
            verse: verse.into(),
        }
    }

    #[test]
    fn test_provider_label_round_trip() {
        assert_eq!(Provider::from_label("GPT").unwrap(), Provider::Gpt);
        assert_eq!(
            Provider::from_label("Bible Gateway").unwrap(),
            Provider::BibleGateway
        );
        assert_eq!(Provider::from_label("bg").unwrap(), Provider::BibleGateway);
        assert_eq!(Provider::Gpt.label(), "GPT");
        assert_eq!(Provider::BibleGateway.wire_id(), "BG");
    }

    #[test]
    fn test_provider_fails_closed() {
        let err = Provider::from_label("ESV-direct").unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(Provider::Gpt.endpoint_path(), "yoinkGPT");
        assert_eq!(Provider::BibleGateway.endpoint_path(), "yoinkBG");
    }

    #[test]
    fn test_build_request_single_verse() {
        let req = build_request(&row("GPT", "KJV", "John", "3", "16")).unwrap();
        assert_eq!(req.key, "John_3_16_KJV");
        assert_eq!(req.reference.verses, vec![16]);
        assert_eq!(req.reference.source, Provider::Gpt);
    }

    #[test]
    fn test_build_request_empty_spec_keys_all() {
        let req = build_request(&row("BG", "NIV", "Genesis", "1", "")).unwrap();
        assert_eq!(req.key, "Genesis_1_all_NIV");
        assert!(req.reference.verses.is_empty());
    }

    #[test]
    fn test_build_request_reports_missing_fields() {
        let err = build_request(&row("GPT", "", "", "3", "16")).unwrap_err();
        assert_eq!(err.kind(), "validation");
        let msg = err.to_string();
        assert!(msg.contains("book"));
        assert!(msg.contains("version"));
        assert!(!msg.contains("chapter"));
    }

    #[test]
    fn test_build_request_propagates_parse_error() {
        let err = build_request(&row("GPT", "KJV", "John", "3", "abc")).unwrap_err();
        assert_eq!(err.kind(), "parse");
    }

    #[test]
    fn test_row_from_line() {
        let row = Row::from_line("BG NIV Genesis 1 1,2,3");
        assert_eq!(row.source, "BG");
        assert_eq!(row.version, "NIV");
        assert_eq!(row.book, "Genesis");
        assert_eq!(row.chapter, "1");
        assert_eq!(row.verse, "1,2,3");
    }

    #[test]
    fn test_row_from_line_without_verses() {
        let row = Row::from_line("GPT KJV John 3");
        assert_eq!(row.verse, "");
        assert!(build_request(&row).is_ok());
    }

    #[test]
    fn test_row_from_short_line_fails_validation() {
        let row = Row::from_line("BG NIV");
        let err = build_request(&row).unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn test_row_key_matches_reference_key() {
        let r = row("GPT", "KJV", "John", "3", "16");
        let req = build_request(&r).unwrap();
        assert_eq!(r.key(), req.key);
    }
}
