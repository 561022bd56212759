use crate::exit_codes;
use anyhow::Context;
use skillbench_core::{HarnessConfig, HarnessError};
use std::path::Path;

pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<HarnessConfig> {
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let cfg = HarnessConfig::resolve(explicit, &cwd)?;
    Ok(cfg)
}

/// Empty selections and empty extractions are reported and mapped to
/// `NO_RESULTS`; everything else is propagated as a fatal error.
pub fn empty_result_exit(err: HarnessError) -> anyhow::Result<i32> {
    if err.is_empty_result() {
        eprintln!("error: {err}");
        return Ok(exit_codes::NO_RESULTS);
    }
    Err(err.into())
}

pub fn fmt_score(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v:.2}")
    }
}
