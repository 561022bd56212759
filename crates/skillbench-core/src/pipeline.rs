//! Top-level driver: jobs → records → grouped table → files.

use std::path::{Path, PathBuf};

use crate::aggregate::{aggregate, GroupedTable};
use crate::errors::{HarnessError, Result};
use crate::extract::Extractor;
use crate::layout;
use crate::model::ExtractedRecord;
use crate::output::{write_outputs, WrittenOutputs};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub out_dir: PathBuf,
    pub script_var: String,
    pub per_model: bool,
}

#[derive(Debug)]
pub struct RunSummary {
    pub jobs: usize,
    pub extracted: usize,
    pub table: GroupedTable,
    pub outputs: WrittenOutputs,
}

/// Explicit directories when given, else every job under `jobs_root`; the
/// name filter applies either way. No match is an error.
pub fn resolve_jobs(
    jobs_root: &Path,
    explicit: &[PathBuf],
    filter: Option<&str>,
) -> Result<Vec<PathBuf>> {
    let jobs = if explicit.is_empty() {
        layout::discover_jobs(jobs_root, filter)?
    } else {
        let mut dirs: Vec<PathBuf> = explicit.iter().filter(|p| p.is_dir()).cloned().collect();
        for missing in explicit.iter().filter(|p| !p.is_dir()) {
            tracing::warn!(path = %missing.display(), "not a directory, ignoring");
        }
        dirs.sort();
        dirs.dedup();
        layout::filter_jobs(dirs, filter)
    };
    if jobs.is_empty() {
        return Err(HarnessError::NoJobs {
            filter: filter.map(String::from),
        });
    }
    Ok(jobs)
}

pub fn collect_records(extractor: &Extractor, jobs: &[PathBuf]) -> Vec<ExtractedRecord> {
    jobs.iter()
        .flat_map(|job| extractor.extract_job(job))
        .collect()
}

pub fn run(extractor: &Extractor, jobs: &[PathBuf], opts: &RunOptions) -> Result<RunSummary> {
    let records = collect_records(extractor, jobs);
    let extracted = records.len();
    if extracted == 0 {
        return Err(HarnessError::NoRecords { jobs: jobs.len() });
    }
    let table = aggregate(records);
    let outputs = write_outputs(&table, &opts.out_dir, &opts.script_var, opts.per_model)?;
    Ok(RunSummary {
        jobs: jobs.len(),
        extracted,
        table,
        outputs,
    })
}
