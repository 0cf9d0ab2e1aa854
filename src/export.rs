//! export command: Package a saved fetch report's bundle for delivery
//!
//! Re-reads the JSON report `fetch` printed and writes the archive, either
//! one file per passage or a single combined text. Packaging is independent
//! of retrieval, so a bundle can be exported again without refetching.

use crate::archive::{build_archive, combined_text};
use crate::bundle::ResultBundle;
use crate::fetch::write_archive;
use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

#[derive(Args)]
pub struct ExportArgs {
    /// Fetch report JSON to package
    pub report: PathBuf,

    /// Directory for one text file per bundle entry
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Single combined text file
    #[arg(long)]
    pub combined: Option<PathBuf>,
}

/// The slice of a fetch report export cares about.
#[derive(Deserialize)]
struct SavedReport {
    bundle: ResultBundle,
}

#[derive(Debug, Serialize)]
pub struct ExportOutput {
    pub entries: usize,
    pub files: Vec<String>,
}

pub async fn run_export(args: ExportArgs) -> Result<()> {
    if args.out_dir.is_none() && args.combined.is_none() {
        eprintln!("Usage:");
        eprintln!("  bible-fetcher export <report.json> --out-dir <DIR>");
        eprintln!("  bible-fetcher export <report.json> --combined <FILE>");
        std::process::exit(1);
    }

    let content = fs::read_to_string(&args.report)
        .await
        .with_context(|| format!("Failed to read {}", args.report.display()))?;
    let saved: SavedReport =
        serde_json::from_str(&content).context("Failed to parse fetch report")?;

    if saved.bundle.is_empty() {
        eprintln!("Report bundle is empty - nothing to export.");
        std::process::exit(1);
    }

    let mut files = Vec::new();

    if let Some(dir) = &args.out_dir {
        write_archive(dir, &saved.bundle).await?;
        for entry in build_archive(&saved.bundle) {
            files.push(dir.join(entry.filename).display().to_string());
        }
    }

    if let Some(path) = &args.combined {
        fs::write(path, combined_text(&saved.bundle))
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("Wrote {}", path.display());
        files.push(path.display().to_string());
    }

    let output = ExportOutput {
        entries: saved.bundle.len(),
        files,
    };
    println!("{}", serde_json::to_string(&output)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_report_reads_fetch_output() {
        let json = r#"{
            "ok": 1,
            "failed": 0,
            "results": [{"row": 0, "key": "John_3_16_KJV", "ok": true}],
            "bundle": [{"key": "John_3_16_KJV", "text": "For God so loved..."}],
            "timestamp": "2025-01-01T00:00:00Z"
        }"#;
        let saved: SavedReport = serde_json::from_str(json).unwrap();
        assert_eq!(saved.bundle.len(), 1);
        assert_eq!(
            saved.bundle.get("John_3_16_KJV"),
            Some("For God so loved...")
        );
    }
}
