//! Verse-spec grammar
//!
//! A verse spec is a single verse ("16"), a comma list ("1, 2, 3"), a range
//! ("1-3"), or any mix of the two ("1, 2, 5-7"). Empty input means the whole
//! chapter. The whole string is validated against one pattern before any
//! term is expanded.

use crate::error::RowError;
use regex::Regex;

/// Parse a raw verse spec into the enumerated verse numbers.
///
/// Empty (or all-whitespace) input is valid and returns an empty list,
/// meaning "all verses" - distinct from a parse failure. Ranges expand
/// ascending and inclusive; a descending range expands to nothing. Duplicate
/// verses across terms are kept in term order.
pub fn parse_verse_spec(raw: &str) -> Result<Vec<u32>, RowError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    // Whole-string shape check: comma list of terms, each an integer or a
    // range. Whitespace is ignored around commas only.
    let shape = Regex::new(r"^\d+(?:-\d+)?(?:\s*,\s*\d+(?:-\d+)?)*$").unwrap();
    if !shape.is_match(raw) {
        return Err(RowError::parse(format!("'{}'", raw)));
    }

    let range = Regex::new(r"^(\d+)-(\d+)$").unwrap();
    let mut verses = Vec::new();

    for term in raw.split(',').map(str::trim) {
        if let Some(cap) = range.captures(term) {
            let start = parse_number(&cap[1])?;
            let end = parse_number(&cap[2])?;
            if start > end {
                eprintln!("warning: range {}-{} expands to no verses", start, end);
            }
            verses.extend(start..=end);
        } else {
            verses.push(parse_number(term)?);
        }
    }

    Ok(verses)
}

fn parse_number(text: &str) -> Result<u32, RowError> {
    text.parse()
        .map_err(|_| RowError::parse(format!("verse number '{}' out of range", text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_verse() {
        assert_eq!(parse_verse_spec("16").unwrap(), vec![16]);
    }

    #[test]
    fn test_range_expands_inclusive() {
        assert_eq!(parse_verse_spec("1-3").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_comma_list() {
        assert_eq!(parse_verse_spec("1, 2, 3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_verse_spec("1,2,3").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_mixed_list_with_range() {
        // Ranges are valid list terms.
        assert_eq!(parse_verse_spec("1, 2, 5-7").unwrap(), vec![1, 2, 5, 6, 7]);
    }

    #[test]
    fn test_empty_means_all_verses() {
        assert_eq!(parse_verse_spec("").unwrap(), Vec::<u32>::new());
        assert_eq!(parse_verse_spec("   ").unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn test_descending_range_is_empty_not_error() {
        assert_eq!(parse_verse_spec("3-1").unwrap(), Vec::<u32>::new());
        assert_eq!(parse_verse_spec("1, 3-1, 5").unwrap(), vec![1, 5]);
    }

    #[test]
    fn test_duplicates_kept_in_term_order() {
        assert_eq!(parse_verse_spec("2, 1-3").unwrap(), vec![2, 1, 2, 3]);
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert!(parse_verse_spec("abc").is_err());
        assert!(parse_verse_spec("1, abc").is_err());
    }

    #[test]
    fn test_rejects_stray_separators() {
        assert!(parse_verse_spec("1,").is_err());
        assert!(parse_verse_spec(",1").is_err());
        assert!(parse_verse_spec("1-").is_err());
        assert!(parse_verse_spec("1-2-3").is_err());
        assert!(parse_verse_spec("1 2").is_err());
    }

    #[test]
    fn test_rejects_overflow() {
        let err = parse_verse_spec("99999999999999999999").unwrap_err();
        assert_eq!(err.kind(), "parse");
    }
}
