//! Model and task-variant classification from directory names.
//!
//! Names are matched against ordered rule lists; nothing here fails. A name
//! that no rule covers classifies as `None` and the caller skips the trial.

mod rules;
pub mod run_config;

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use crate::config::{ModelRuleConfig, SourceFiles};
use crate::errors::{HarnessError, Result};
use crate::layout::dir_name;
use crate::model::{RewardPayload, Sample};
pub use run_config::RunConfig;

lazy_static! {
    /// `10m`, `8m`, `2h` delimited by `-`, `_`, `/` or the string edges.
    static ref HORIZON: Regex = Regex::new(r"(?:^|[-_/])(\d+[mh])(?:$|[-_/])").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRule {
    pub patterns: Vec<String>,
    pub model: String,
}

impl ModelRule {
    fn matches(&self, lowered: &str) -> bool {
        self.patterns.iter().any(|p| lowered.contains(p.as_str()))
    }
}

/// Ordered `(patterns, model)` rules, evaluated top to bottom.
#[derive(Debug, Clone)]
pub struct ModelClassifier {
    rules: Vec<ModelRule>,
}

impl Default for ModelClassifier {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ModelClassifier {
    pub fn builtin() -> Self {
        let rules = rules::BUILTIN_MODEL_RULES
            .iter()
            .map(|(patterns, model)| ModelRule {
                patterns: patterns.iter().map(|p| p.to_string()).collect(),
                model: model.to_string(),
            })
            .collect();
        Self { rules }
    }

    /// Built-ins with `overrides` placed in front, so a configured point
    /// release is tried before any built-in family it belongs to.
    pub fn with_overrides(overrides: &[ModelRuleConfig]) -> Result<Self> {
        let mut rules = Vec::with_capacity(overrides.len());
        for o in overrides {
            if o.patterns.is_empty() || o.patterns.iter().any(|p| p.trim().is_empty()) {
                return Err(HarnessError::InvalidRule {
                    pattern: o.patterns.join(","),
                    reason: format!("empty pattern for model '{}'", o.model),
                });
            }
            rules.push(ModelRule {
                patterns: o.patterns.iter().map(|p| p.to_lowercase()).collect(),
                model: o.model.clone(),
            });
        }
        rules.extend(Self::builtin().rules);
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[ModelRule] {
        &self.rules
    }

    pub fn classify(&self, name: &str) -> Option<&str> {
        let lowered = name.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.matches(&lowered))
            .map(|r| r.model.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Objective {
    SkillXp(String),
    TotalLevel,
    Gold,
}

impl Objective {
    /// Progress value of one sample for this objective.
    pub fn score(&self, sample: &Sample) -> f64 {
        match self {
            Self::SkillXp(skill) => sample.skills.get(skill).map_or(0.0, |s| s.xp as f64),
            Self::TotalLevel => sample.total_level as f64,
            Self::Gold => sample.gold.unwrap_or(0) as f64,
        }
    }

    /// The verifier's own scalar for this objective, if it wrote one.
    pub fn direct_score(&self, reward: &RewardPayload) -> Option<f64> {
        match self {
            Self::SkillXp(_) => reward.xp,
            Self::TotalLevel => reward.total_level,
            Self::Gold => reward.gold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskVariant {
    pub objective: Objective,
    pub horizon: Option<String>,
}

impl TaskVariant {
    /// Grouping key: skill name for skill tasks, the horizon for the
    /// total-level task.
    pub fn key(&self) -> String {
        match &self.objective {
            Objective::SkillXp(skill) => skill.clone(),
            Objective::Gold => "gold".to_string(),
            Objective::TotalLevel => self
                .horizon
                .clone()
                .unwrap_or_else(|| "total-level".to_string()),
        }
    }

    pub fn matches_horizon(&self, wanted: Option<&str>) -> bool {
        match wanted {
            Some(w) => self.horizon.as_deref() == Some(w),
            None => true,
        }
    }
}

pub fn parse_horizon(name: &str) -> Option<String> {
    HORIZON
        .captures(&name.to_lowercase())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn parse_task(name: &str) -> Option<TaskVariant> {
    let lowered = name.to_lowercase();
    let objective = if rules::TOTAL_LEVEL_PATTERNS
        .iter()
        .any(|p| lowered.contains(p))
    {
        Objective::TotalLevel
    } else if let Some(skill) = rules::SKILLS.iter().find(|s| lowered.contains(*s)) {
        Objective::SkillXp(skill.to_string())
    } else if rules::GOLD_PATTERNS.iter().any(|p| lowered.contains(p)) {
        Objective::Gold
    } else {
        return None;
    };
    Some(TaskVariant {
        objective,
        horizon: parse_horizon(&lowered),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub model: String,
    pub variant: TaskVariant,
}

/// Classifies one trial from its job name, its own name, and finally the
/// stored run configuration (job-level, then trial-level).
pub fn classify_trial(
    classifier: &ModelClassifier,
    job_dir: &Path,
    trial_dir: &Path,
    files: &SourceFiles,
) -> Option<Classification> {
    let job_name = dir_name(job_dir);
    let trial_name = dir_name(trial_dir);
    let configs: Vec<RunConfig> = [job_dir, trial_dir]
        .iter()
        .filter_map(|d| RunConfig::read(&d.join(&files.run_config)))
        .collect();

    let model = classifier
        .classify(&job_name)
        .or_else(|| {
            configs
                .iter()
                .filter_map(|c| c.model_name.as_deref())
                .find_map(|m| classifier.classify(m))
        })
        .map(String::from);

    let task_paths: Vec<&str> = configs
        .iter()
        .filter_map(|c| c.task_path.as_deref())
        .collect();
    let variant = parse_task(&job_name)
        .or_else(|| parse_task(&trial_name))
        .or_else(|| task_paths.iter().copied().find_map(parse_task))
        .map(|mut v| {
            // the name that settled the objective may still omit the horizon
            if v.horizon.is_none() {
                v.horizon = parse_horizon(&trial_name)
                    .or_else(|| task_paths.iter().copied().find_map(parse_horizon));
            }
            v
        });

    match (model, variant) {
        (Some(model), Some(variant)) => Some(Classification { model, variant }),
        (None, _) => {
            tracing::warn!(job = %job_name, trial = %trial_name, "unknown model, skipping trial");
            None
        }
        (_, None) => {
            tracing::warn!(job = %job_name, trial = %trial_name, "unknown task variant, skipping trial");
            None
        }
    }
}
