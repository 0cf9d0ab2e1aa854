//! Result aggregation
//!
//! Folds settled lookup outcomes into a keyed bundle of retrieved text.
//! Failures are carried alongside for reporting, never inside the bundle.
//! The bundle is rebuilt wholesale on every submission.

use crate::error::RowError;
use crate::lookup::LookupOutcome;
use serde::{Deserialize, Serialize};

/// One retrieved passage, keyed by its reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleEntry {
    pub key: String,
    pub text: String,
}

/// Keyed mapping of retrieved text, in insertion order. Each key appears
/// exactly once; inserting an existing key overwrites its text in place
/// (last writer wins), since identical keys are semantically duplicate
/// requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultBundle {
    entries: Vec<BundleEntry>,
}

impl ResultBundle {
    pub fn insert(&mut self, key: String, text: String) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.key == key) {
            existing.text = text;
        } else {
            self.entries.push(BundleEntry { key, text });
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.text.as_str())
    }

    pub fn entries(&self) -> &[BundleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<BundleEntry> for ResultBundle {
    fn from_iter<I: IntoIterator<Item = BundleEntry>>(iter: I) -> Self {
        let mut bundle = ResultBundle::default();
        for entry in iter {
            bundle.insert(entry.key, entry.text);
        }
        bundle
    }
}

/// A failed row, attributable by key.
#[derive(Debug, Clone)]
pub struct RowFailure {
    pub key: String,
    pub error: RowError,
}

/// Everything a submission settled into: the bundle of successes plus the
/// failures to report.
#[derive(Debug, Default)]
pub struct Aggregate {
    pub bundle: ResultBundle,
    pub failures: Vec<RowFailure>,
}

/// Fold outcomes into a bundle. Runs once, at the fan-in point, after every
/// lookup has settled.
pub fn aggregate(outcomes: Vec<LookupOutcome>) -> Aggregate {
    let mut result = Aggregate::default();
    for outcome in outcomes {
        match outcome {
            LookupOutcome::Success { key, text } => result.bundle.insert(key, text),
            LookupOutcome::Failure { key, error } => {
                result.failures.push(RowFailure { key, error })
            }
        }
    }
    result
}
