//! Harness configuration (`skillbench.yaml`).
//!
//! Every field has a default so an absent or partial file is valid. CLI flags
//! override what the file sets.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{HarnessError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "skillbench.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Directory holding one subdirectory per job.
    pub jobs_root: PathBuf,
    /// Where `data.json` / `data.js` are written.
    pub out_dir: PathBuf,
    /// Global assigned by the script companion file.
    pub script_var: String,
    /// Subdirectories whose presence marks a trial directory.
    pub trial_markers: Vec<String>,
    pub files: SourceFiles,
    pub markers: RewardMarkers,
    pub transcript: TranscriptLimits,
    /// Evaluated before the built-in model rules.
    pub model_rules: Vec<ModelRuleConfig>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            jobs_root: PathBuf::from("jobs"),
            out_dir: PathBuf::from("results"),
            script_var: "BENCHMARK_DATA".to_string(),
            trial_markers: vec!["verifier".to_string(), "agent".to_string()],
            files: SourceFiles::default(),
            markers: RewardMarkers::default(),
            transcript: TranscriptLimits::default(),
            model_rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceFiles {
    pub verifier_dir: String,
    pub agent_dir: String,
    pub reward: String,
    pub tracking: String,
    pub stdout: String,
    pub trial_result: String,
    pub run_config: String,
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            verifier_dir: "verifier".to_string(),
            agent_dir: "agent".to_string(),
            reward: "reward.json".to_string(),
            tracking: "tracking.json".to_string(),
            stdout: "test-stdout.txt".to_string(),
            trial_result: "result.json".to_string(),
            run_config: "config.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewardMarkers {
    pub start: String,
    pub end: String,
}

impl Default for RewardMarkers {
    fn default() -> Self {
        Self {
            start: "__REWARD_JSON_START__".to_string(),
            end: "__REWARD_JSON_END__".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranscriptLimits {
    pub max_steps: usize,
    pub max_step_chars: usize,
}

impl Default for TranscriptLimits {
    fn default() -> Self {
        Self {
            max_steps: 200,
            max_step_chars: 2000,
        }
    }
}

/// User-supplied model rule, e.g. `{ patterns: ["glm-4.7"], model: "glm-4.7" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelRuleConfig {
    pub patterns: Vec<String>,
    pub model: String,
}

impl HarnessConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|source| HarnessError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` when given, else `skillbench.yaml` in `cwd` if present,
    /// else defaults.
    pub fn resolve(path: Option<&Path>, cwd: &Path) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let candidate = cwd.join(DEFAULT_CONFIG_FILE);
                if candidate.is_file() {
                    Self::load(&candidate)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = HarnessConfig::from_yaml(
            r#"
jobs_root: /data/jobs
transcript:
  max_steps: 50
model_rules:
  - patterns: ["glm-4.7", "glm47"]
    model: glm-4.7
"#,
        )
        .unwrap();
        assert_eq!(cfg.jobs_root, PathBuf::from("/data/jobs"));
        assert_eq!(cfg.out_dir, PathBuf::from("results"));
        assert_eq!(cfg.transcript.max_steps, 50);
        assert_eq!(cfg.transcript.max_step_chars, 2000);
        assert_eq!(cfg.markers.start, "__REWARD_JSON_START__");
        assert_eq!(cfg.model_rules.len(), 1);
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(
            HarnessConfig::from_yaml("  \n").unwrap(),
            HarnessConfig::default()
        );
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(HarnessConfig::from_yaml("jobroot: x").is_err());
    }

    #[test]
    fn resolve_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = HarnessConfig::resolve(None, dir.path()).unwrap();
        assert_eq!(cfg, HarnessConfig::default());

        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "script_var: RESULTS\n").unwrap();
        let cfg = HarnessConfig::resolve(None, dir.path()).unwrap();
        assert_eq!(cfg.script_var, "RESULTS");

        let bad = dir.path().join("bad.yaml");
        std::fs::write(&bad, "out_dir: [1, 2").unwrap();
        let err = HarnessConfig::resolve(Some(&bad), dir.path()).unwrap_err();
        assert!(matches!(err, HarnessError::ConfigParse { .. }));
    }
}
