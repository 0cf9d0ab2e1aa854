//! fetch command: Look up scripture references against the retrieval server
//!
//! One lookup per input row, all dispatched concurrently. A row that fails
//! to parse, validate, or fetch is reported on its own and never blocks the
//! rest of the submission.

use crate::archive::{build_archive, combined_text};
use crate::bundle::{aggregate, ResultBundle};
use crate::lookup::{LookupClient, LookupOutcome};
use crate::schema::{build_request, Row};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Args)]
pub struct FetchArgs {
    /// Batch file: one reference per line, `SOURCE VERSION BOOK CHAPTER [VERSES]`
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Read reference lines from stdin (one per line)
    #[arg(long)]
    stdin: bool,

    /// Book name, e.g. John
    #[arg(long)]
    book: Option<String>,

    /// Chapter number
    #[arg(long)]
    chapter: Option<String>,

    /// Verse spec: single (16), list (1, 2, 3), or range (1-3). Empty = whole chapter
    #[arg(long, default_value = "")]
    verse: String,

    /// Bible version, e.g. KJV
    #[arg(long)]
    version: Option<String>,

    /// Text source: GPT or BG (Bible Gateway)
    #[arg(long, default_value = "GPT")]
    source: String,

    /// Base URL of the retrieval server
    #[arg(long, default_value = "http://localhost:5000")]
    endpoint: String,

    /// Timeout per lookup in milliseconds
    #[arg(long, default_value = "10000")]
    timeout: u64,

    /// Output format: json (default) or yaml
    #[arg(long, short, default_value = "json")]
    format: String,

    /// Write one text file per result into this directory
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Write all results into a single combined text file
    #[arg(long)]
    combined: Option<PathBuf>,
}

/// Outcome of one input row (compact).
#[derive(Debug, Serialize)]
pub struct RowResult {
    pub row: usize,
    pub key: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Full report for one submission (compact).
#[derive(Debug, Serialize)]
pub struct FetchReport {
    pub ok: usize,
    pub failed: usize,
    pub results: Vec<RowResult>,
    pub bundle: ResultBundle,
    pub timestamp: String,
}

/// Run the fetch command
pub async fn run_fetch(args: FetchArgs) -> Result<()> {
    let rows = gather_rows(&args).await?;

    if rows.is_empty() {
        eprintln!("No references found.");
        std::process::exit(1);
    }

    eprintln!(
        "Looking up {} reference{}...",
        rows.len(),
        if rows.len() == 1 { "" } else { "s" }
    );

    let client = LookupClient::new(&args.endpoint, args.timeout)?;
    let outcomes = lookup_rows(&client, &rows).await;
    let report = build_report(outcomes);

    if let Some(dir) = &args.out_dir {
        write_archive(dir, &report.bundle).await?;
    }
    if let Some(path) = &args.combined {
        fs::write(path, combined_text(&report.bundle))
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("Wrote {}", path.display());
    }

    let output = match args.format.as_str() {
        "yaml" | "yml" => serde_yaml::to_string(&report)?,
        _ => serde_json::to_string(&report)?,
    };
    println!("{}", output);

    eprintln!("Done: {}/{} OK", report.ok, report.ok + report.failed);

    Ok(())
}

/// Get rows from flags, a batch file, or stdin
async fn gather_rows(args: &FetchArgs) -> Result<Vec<Row>> {
    if args.book.is_some() || args.chapter.is_some() || args.version.is_some() {
        return Ok(vec![Row {
            source: args.source.clone(),
            version: args.version.clone().unwrap_or_default(),
            book: args.book.clone().unwrap_or_default(),
            chapter: args.chapter.clone().unwrap_or_default(),
            verse: args.verse.clone(),
        }]);
    }

    if args.stdin {
        let stdin = io::stdin();
        let rows: Vec<Row> = stdin
            .lock()
            .lines()
            .map_while(Result::ok)
            .filter(|line| !line.trim().is_empty())
            .map(|line| Row::from_line(&line))
            .collect();
        return Ok(rows);
    }

    if let Some(file) = &args.file {
        let content = fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read file: {}", file.display()))?;
        return Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(Row::from_line)
            .collect());
    }

    eprintln!("Usage:");
    eprintln!("  bible-fetcher fetch --book <BOOK> --chapter <N> --version <VER> [--verse SPEC]");
    eprintln!("  bible-fetcher fetch <file>    One reference per line: SOURCE VERSION BOOK CHAPTER [VERSES]");
    eprintln!("  bible-fetcher fetch --stdin   Read reference lines from stdin");
    std::process::exit(1);
}

/// Build and dispatch one lookup per row, returning outcomes aligned with
/// the input rows. Rows that fail before dispatch settle as failures without
/// ever being sent.
pub async fn lookup_rows(client: &LookupClient, rows: &[Row]) -> Vec<LookupOutcome> {
    let mut slots: Vec<Option<LookupOutcome>> = (0..rows.len()).map(|_| None).collect();
    let mut requests = Vec::new();
    let mut request_rows = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        match build_request(row) {
            Ok(request) => {
                request_rows.push(idx);
                requests.push(request);
            }
            Err(error) => {
                slots[idx] = Some(LookupOutcome::Failure {
                    key: row.key(),
                    error,
                });
            }
        }
    }

    for (idx, outcome) in request_rows
        .into_iter()
        .zip(client.execute(requests).await)
    {
        slots[idx] = Some(outcome);
    }

    slots.into_iter().flatten().collect()
}

/// Fan-in: fold outcomes into the per-row results and the deduplicated
/// bundle. The single place the aggregate is written.
pub fn build_report(outcomes: Vec<LookupOutcome>) -> FetchReport {
    let results: Vec<RowResult> = outcomes
        .iter()
        .enumerate()
        .map(|(idx, outcome)| match outcome {
            LookupOutcome::Success { key, .. } => RowResult {
                row: idx,
                key: key.clone(),
                ok: true,
                error_kind: None,
                error: None,
            },
            LookupOutcome::Failure { key, error } => RowResult {
                row: idx,
                key: key.clone(),
                ok: false,
                error_kind: Some(error.kind()),
                error: Some(error.to_string()),
            },
        })
        .collect();

    let aggregated = aggregate(outcomes);
    let failed = aggregated.failures.len();
    let ok = results.len() - failed;

    FetchReport {
        ok,
        failed,
        results,
        bundle: aggregated.bundle,
        timestamp: Utc::now().to_rfc3339(),
    }
}

/// Write one text file per bundle entry into `dir`.
pub async fn write_archive(dir: &Path, bundle: &ResultBundle) -> Result<()> {
    fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    for entry in build_archive(bundle) {
        let path = dir.join(&entry.filename);
        fs::write(&path, &entry.content)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    eprintln!("Wrote {} file(s) to {}", bundle.len(), dir.display());
    Ok(())
}
