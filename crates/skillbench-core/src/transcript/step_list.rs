use serde::Deserialize;
use serde_json::Value;

use super::{tool_call_text, u64_at, value_text, ParsedTranscript};
use crate::model::{Step, TokenUsage};

#[derive(Debug, Deserialize)]
struct TrajectoryStep {
    #[serde(default)]
    source: String,
    #[serde(default)]
    message: Value,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
    #[serde(default)]
    observation: Option<Observation>,
    #[serde(default)]
    metrics: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    #[serde(default)]
    function_name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Deserialize)]
struct Observation {
    #[serde(default)]
    results: Vec<ObservationResult>,
}

#[derive(Debug, Deserialize)]
struct ObservationResult {
    #[serde(default)]
    content: Value,
}

/// Parses a trajectory document. Only agent-authored steps and their tool
/// traffic are kept; user and system prompts are dropped.
pub(super) fn parse(text: &str) -> Option<ParsedTranscript> {
    let doc: Value = serde_json::from_str(text).ok()?;
    let raw_steps = doc.get("steps")?.as_array()?;

    let mut out = ParsedTranscript::default();
    let mut summed = TokenUsage::default();
    for raw in raw_steps {
        let Ok(step) = serde_json::from_value::<TrajectoryStep>(raw.clone()) else {
            continue;
        };
        if step.source != "agent" {
            continue;
        }
        let message = value_text(&step.message);
        if !message.trim().is_empty() {
            out.steps.push(Step::agent(message));
        }
        for call in &step.tool_calls {
            out.steps
                .push(Step::tool(tool_call_text(&call.function_name, &call.arguments)));
        }
        if let Some(obs) = &step.observation {
            for result in &obs.results {
                let content = value_text(&result.content);
                if !content.is_empty() {
                    out.steps.push(Step::tool(content));
                }
            }
        }
        if let Some(m) = &step.metrics {
            summed += TokenUsage {
                input_tokens: u64_at(m, "/prompt_tokens"),
                cache_tokens: u64_at(m, "/cached_tokens"),
                output_tokens: u64_at(m, "/completion_tokens"),
            };
        }
    }

    let totals = doc.get("final_metrics").map(|m| TokenUsage {
        input_tokens: u64_at(m, "/total_prompt_tokens"),
        cache_tokens: u64_at(m, "/total_cached_tokens"),
        output_tokens: u64_at(m, "/total_completion_tokens"),
    });
    out.usage = totals
        .filter(|t| !t.is_zero())
        .or_else(|| (!summed.is_zero()).then_some(summed));
    Some(out)
}
