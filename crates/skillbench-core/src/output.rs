//! Result artifacts for the chart viewer.
//!
//! `data.json` is the canonical file; `data.js` assigns the same JSON to a
//! global so the viewer works from `file://` without a fetch. Both are
//! written from one serialized string, so their payloads are byte-identical.

use std::path::{Path, PathBuf};

use crate::aggregate::GroupedTable;
use crate::errors::{HarnessError, Result};

pub const DATA_JSON: &str = "data.json";
pub const DATA_JS: &str = "data.js";
pub const MODELS_DIR: &str = "models";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenOutputs {
    pub data_json: PathBuf,
    pub data_js: PathBuf,
    pub model_files: Vec<PathBuf>,
}

pub fn render_payload(table: &GroupedTable) -> Result<String> {
    Ok(serde_json::to_string_pretty(table)?)
}

pub fn render_script(var: &str, payload: &str) -> String {
    format!("window.{} = {};\n", var, payload)
}

/// Strips the script wrapper; `None` when `script` was not produced by
/// [`render_script`] for `var`.
pub fn script_payload<'a>(var: &str, script: &'a str) -> Option<&'a str> {
    script
        .strip_prefix(&format!("window.{} = ", var))?
        .strip_suffix(";\n")
}

/// Percent-encodes every byte outside `[A-Za-z0-9.-]`, so distinct model
/// ids always get distinct file names (`a/b` -> `a%2Fb`, `a_b` -> `a%5Fb`).
fn model_file_name(model: &str) -> String {
    let mut name = String::with_capacity(model.len() + 5);
    for b in model.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'-' => name.push(char::from(b)),
            _ => name.push_str(&format!("%{:02X}", b)),
        }
    }
    name.push_str(".json");
    name
}

fn write(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|source| HarnessError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `data.json`, `data.js` and, with `per_model`, one file per model
/// under `models/`. An empty table is refused so a failed run never
/// overwrites a previous result set with nothing.
pub fn write_outputs(
    table: &GroupedTable,
    out_dir: &Path,
    script_var: &str,
    per_model: bool,
) -> Result<WrittenOutputs> {
    if table.is_empty() {
        return Err(HarnessError::NoRecords { jobs: 0 });
    }
    std::fs::create_dir_all(out_dir).map_err(|source| HarnessError::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let payload = render_payload(table)?;
    let data_json = out_dir.join(DATA_JSON);
    let data_js = out_dir.join(DATA_JS);
    write(&data_json, &payload)?;
    write(&data_js, &render_script(script_var, &payload))?;

    let mut model_files = Vec::new();
    if per_model {
        let dir = out_dir.join(MODELS_DIR);
        std::fs::create_dir_all(&dir).map_err(|source| HarnessError::Write {
            path: dir.clone(),
            source,
        })?;
        for (model, variants) in table.models() {
            let path = dir.join(model_file_name(model));
            write(&path, &serde_json::to_string_pretty(variants)?)?;
            model_files.push(path);
        }
    }

    tracing::info!(
        out = %out_dir.display(),
        records = table.record_count(),
        model_files = model_files.len(),
        "results written"
    );
    Ok(WrittenOutputs {
        data_json,
        data_js,
        model_files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_wraps_payload_verbatim() {
        let payload = "{\n  \"a\": 1\n}";
        let script = render_script("BENCHMARK_DATA", payload);
        assert_eq!(script, "window.BENCHMARK_DATA = {\n  \"a\": 1\n};\n");
        assert_eq!(script_payload("BENCHMARK_DATA", &script), Some(payload));
        assert_eq!(script_payload("OTHER", &script), None);
    }

    #[test]
    fn model_names_become_safe_file_names() {
        assert_eq!(model_file_name("kimi-k2.5"), "kimi-k2.5.json");
        assert_eq!(model_file_name("openrouter/qwen"), "openrouter%2Fqwen.json");
    }

    #[test]
    fn distinct_models_never_share_a_file() {
        let ids = ["a/b", "a_b", "a b", "a%2Fb", "a:b"];
        let names: std::collections::BTreeSet<String> =
            ids.iter().map(|m| model_file_name(m)).collect();
        assert_eq!(names.len(), ids.len());
    }

    #[test]
    fn empty_table_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("results");
        let err = write_outputs(&GroupedTable::default(), &out, "X", true).unwrap_err();
        assert!(err.is_empty_result());
        assert!(!out.exists());
    }
}
