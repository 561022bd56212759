use serde_json::Value;
use std::path::Path;

/// The two fields we read from a runner `config.json`. Both the job-level
/// shape (`agents[]`, `tasks[]`) and the trial-level shape (`agent`, `task`)
/// are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    pub model_name: Option<String>,
    pub task_path: Option<String>,
}

impl RunConfig {
    pub fn read(path: &Path) -> Option<Self> {
        let text = std::fs::read_to_string(path).ok()?;
        let v: Value = serde_json::from_str(&text).ok()?;
        Some(Self::from_value(&v))
    }

    pub fn from_value(v: &Value) -> Self {
        let model_name = v
            .pointer("/agent/model_name")
            .or_else(|| v.pointer("/agents/0/model_name"))
            .and_then(Value::as_str)
            .map(String::from);
        let task_path = v
            .pointer("/task/path")
            .or_else(|| v.pointer("/tasks/0/path"))
            .and_then(Value::as_str)
            .map(String::from);
        Self {
            model_name,
            task_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_trial_and_job_shapes() {
        let trial = RunConfig::from_value(&json!({
            "agent": {"name": "kimi-opencode", "model_name": "openrouter/moonshotai/kimi-k2.5"},
            "task": {"path": "tasks/woodcutting-xp-10m"}
        }));
        assert_eq!(
            trial.model_name.as_deref(),
            Some("openrouter/moonshotai/kimi-k2.5")
        );
        assert_eq!(trial.task_path.as_deref(), Some("tasks/woodcutting-xp-10m"));

        let job = RunConfig::from_value(&json!({
            "agents": [{"model_name": "openai/gpt-5.3-codex"}],
            "tasks": [{"path": "tasks/total-level-8m"}]
        }));
        assert_eq!(job.model_name.as_deref(), Some("openai/gpt-5.3-codex"));
        assert_eq!(job.task_path.as_deref(), Some("tasks/total-level-8m"));

        assert_eq!(RunConfig::from_value(&json!([])), RunConfig::default());
    }
}
