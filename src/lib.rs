//! bible-fetcher: Fetches Bible passages from ChatGPT or BibleGateway
//!
//! Commands:
//! - fetch: look up references against the retrieval server
//! - export: package a saved fetch report for delivery

pub mod archive;
pub mod bundle;
pub mod error;
pub mod export;
pub mod fetch;
pub mod lookup;
pub mod parse;
pub mod schema;

pub use archive::{build_archive, combined_text, ArchiveEntry};
pub use bundle::{aggregate, Aggregate, BundleEntry, ResultBundle};
pub use error::RowError;
pub use fetch::{build_report, lookup_rows, FetchReport, RowResult};
pub use lookup::{LookupClient, LookupOutcome};
pub use parse::parse_verse_spec;
pub use schema::{build_request, LookupRequest, Provider, Row, VerseReference};
