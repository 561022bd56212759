//! Job and trial directory discovery.
//!
//! Jobs live directly under the jobs root. Trials sit either directly inside
//! a job (flat) or one timestamp directory deeper (nested). A directory is a
//! trial when it holds one of the marker subdirectories.

use std::path::{Path, PathBuf};

use crate::errors::{HarnessError, Result};

/// Sorted subdirectories of `dir`; unreadable entries are skipped.
fn subdirs(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut out: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    out.sort();
    out
}

pub fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub fn is_trial_dir<S: AsRef<str>>(dir: &Path, markers: &[S]) -> bool {
    markers.iter().any(|m| dir.join(m.as_ref()).is_dir())
}

/// Trial directories of one job, flat or nested. Never returns the job
/// itself or an intermediate directory; an unrecognized layout yields an
/// empty list.
pub fn trial_dirs<S: AsRef<str>>(job_dir: &Path, markers: &[S]) -> Vec<PathBuf> {
    let mut trials = Vec::new();
    for child in subdirs(job_dir) {
        if is_trial_dir(&child, markers) {
            trials.push(child);
            continue;
        }
        trials.extend(
            subdirs(&child)
                .into_iter()
                .filter(|g| is_trial_dir(g, markers)),
        );
    }
    trials.sort();
    trials
}

/// All job directories under `root` whose name contains `filter`.
pub fn discover_jobs(root: &Path, filter: Option<&str>) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(HarnessError::JobsRootMissing {
            path: root.to_path_buf(),
        });
    }
    Ok(filter_jobs(subdirs(root), filter))
}

pub fn filter_jobs(jobs: Vec<PathBuf>, filter: Option<&str>) -> Vec<PathBuf> {
    match filter {
        Some(f) => jobs
            .into_iter()
            .filter(|j| dir_name(j).contains(f))
            .collect(),
        None => jobs,
    }
}
