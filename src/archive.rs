//! Archive packaging
//!
//! Renders a result bundle as named text blobs for delivery: one `.txt` per
//! entry, or a single combined artifact. How the files reach the user (disk,
//! zip, clipboard) is the caller's concern.

use crate::bundle::ResultBundle;
use serde::Serialize;

/// Separator between passages in the combined single-file rendering.
pub const COMBINED_SEPARATOR: &str = "\n\n---\n\n";

/// One named text blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveEntry {
    pub filename: String,
    pub content: String,
}

/// Package a bundle as one file per entry.
///
/// Filenames are the entry keys with unsafe path characters normalized;
/// sanitization collisions get a numeric suffix so no entry is dropped.
pub fn build_archive(bundle: &ResultBundle) -> Vec<ArchiveEntry> {
    let mut taken: Vec<String> = Vec::with_capacity(bundle.len());
    bundle
        .entries()
        .iter()
        .map(|entry| {
            let mut stem = sanitize_filename(&entry.key);
            if taken.contains(&stem) {
                let mut n = 2;
                while taken.contains(&format!("{}-{}", stem, n)) {
                    n += 1;
                }
                stem = format!("{}-{}", stem, n);
            }
            taken.push(stem.clone());
            ArchiveEntry {
                filename: format!("{}.txt", stem),
                content: entry.text.clone(),
            }
        })
        .collect()
}

/// Render the whole bundle as one text blob, passages joined with a visible
/// separator. Degenerate single-request mode of the same bundle.
pub fn combined_text(bundle: &ResultBundle) -> String {
    bundle
        .entries()
        .iter()
        .map(|e| e.text.as_str())
        .collect::<Vec<_>>()
        .join(COMBINED_SEPARATOR)
}

/// Replace anything that could read as a path component with underscores,
/// collapsing runs.
fn sanitize_filename(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut last_was_sep = false;
    for c in key.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
            out.push(c);
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    out.trim_matches('_').to_string()
}
