use serde_json::Value;

use super::{tool_call_text, u64_at, value_text, ParsedTranscript};
use crate::model::{Step, TokenUsage};

/// OpenCode runs are wrapped in a restart loop that prints its own plain-text
/// lines (`[kimi-loop] Run 2 starting`) into the same file as the
/// `--format=json` events. Only lines that parse as JSON events are used.
pub(super) fn parse(text: &str) -> ParsedTranscript {
    let mut out = ParsedTranscript::default();
    let mut usage = TokenUsage::default();

    for line in text.lines() {
        let line = line.trim();
        if !line.starts_with('{') {
            continue;
        }
        let Ok(v) = serde_json::from_str::<Value>(line) else {
            continue;
        };
        let part = v.get("part").unwrap_or(&Value::Null);

        match v.get("type").and_then(Value::as_str) {
            Some("text") => {
                let t = part.get("text").and_then(Value::as_str).unwrap_or("");
                if !t.trim().is_empty() {
                    out.steps.push(Step::agent(t));
                }
            }
            Some("tool_use") => {
                let name = part.get("tool").and_then(Value::as_str).unwrap_or("tool");
                let state = part.get("state").unwrap_or(&Value::Null);
                let input = state.get("input").unwrap_or(&Value::Null);
                out.steps.push(Step::tool(tool_call_text(name, input)));
                if let Some(output) = state.get("output") {
                    let output = value_text(output);
                    if !output.is_empty() {
                        out.steps.push(Step::tool(output));
                    }
                }
            }
            Some("step_finish") => {
                if let Some(tokens) = part.get("tokens") {
                    usage += TokenUsage {
                        input_tokens: u64_at(tokens, "/input"),
                        cache_tokens: u64_at(tokens, "/cache/read")
                            .saturating_add(u64_at(tokens, "/cache/write")),
                        output_tokens: u64_at(tokens, "/output"),
                    };
                }
            }
            _ => {}
        }
    }

    out.usage = (!usage.is_zero()).then_some(usage);
    out
}
