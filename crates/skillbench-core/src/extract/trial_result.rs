use chrono::DateTime;
use serde_json::Value;
use std::path::Path;

use crate::model::TokenUsage;

/// Fields read from the runner's per-trial `result.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrialResult {
    pub token_usage: Option<TokenUsage>,
    pub duration_ms: Option<u64>,
}

impl TrialResult {
    pub fn read(path: &Path) -> Self {
        super::sources::read_json::<Value>(path)
            .map(|v| Self::from_value(&v))
            .unwrap_or_default()
    }

    pub fn from_value(v: &Value) -> Self {
        Self {
            token_usage: token_usage(v),
            duration_ms: duration_ms(v),
        }
    }
}

fn token_usage(v: &Value) -> Option<TokenUsage> {
    let agent = v.get("agent_result")?;
    let field = |k: &str| agent.get(k).and_then(Value::as_u64);
    let (input, cache, output) = (
        field("n_input_tokens"),
        field("n_cache_tokens"),
        field("n_output_tokens"),
    );
    if input.is_none() && cache.is_none() && output.is_none() {
        return None;
    }
    Some(TokenUsage {
        input_tokens: input.unwrap_or(0),
        cache_tokens: cache.unwrap_or(0),
        output_tokens: output.unwrap_or(0),
    })
}

fn duration_ms(v: &Value) -> Option<u64> {
    let ts = |k: &str| {
        v.get(k)
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    };
    let (start, end) = (ts("started_at")?, ts("finished_at")?);
    u64::try_from((end - start).num_milliseconds()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_usage_and_duration() {
        let r = TrialResult::from_value(&json!({
            "started_at": "2026-03-01T10:00:00Z",
            "finished_at": "2026-03-01T10:10:30.500Z",
            "agent_result": {"n_input_tokens": 1200, "n_output_tokens": 300, "n_cache_tokens": null}
        }));
        assert_eq!(
            r.token_usage,
            Some(TokenUsage {
                input_tokens: 1200,
                cache_tokens: 0,
                output_tokens: 300
            })
        );
        assert_eq!(r.duration_ms, Some(630_500));
    }

    #[test]
    fn tolerates_missing_and_inverted() {
        let r = TrialResult::from_value(&json!({
            "started_at": "2026-03-01T10:10:00Z",
            "finished_at": "2026-03-01T10:00:00Z",
            "agent_result": {}
        }));
        assert_eq!(r, TrialResult::default());
        assert_eq!(
            TrialResult::read(Path::new("/definitely/missing/result.json")),
            TrialResult::default()
        );
    }
}
