use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a whole extraction run.
///
/// Per-trial problems (missing files, malformed JSON, unknown models) are not
/// errors: they surface as `None` from the extractors and a log line.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("jobs root not found: {}", .path.display())]
    JobsRootMissing { path: PathBuf },

    #[error("no job directories matched{}", filter_suffix(.filter))]
    NoJobs { filter: Option<String> },

    #[error("no records extracted from {jobs} {}", job_dir_noun(.jobs))]
    NoRecords { jobs: usize },

    #[error("failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid model rule pattern '{pattern}': {reason}")]
    InvalidRule { pattern: String, reason: String },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json encode error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// True for the "nothing to report" outcomes that map to exit code 1.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::NoJobs { .. } | Self::NoRecords { .. })
    }
}

fn job_dir_noun(jobs: &usize) -> &'static str {
    if *jobs == 1 {
        "job directory"
    } else {
        "job directories"
    }
}

fn filter_suffix(filter: &Option<String>) -> String {
    match filter {
        Some(f) => format!(" filter '{}'", f),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
