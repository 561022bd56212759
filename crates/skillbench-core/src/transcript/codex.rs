use serde_json::Value;

use super::{tool_call_text, u64_at, value_text, ParsedTranscript};
use crate::model::{Step, TokenUsage};

/// Codex rollout JSONL. `response_item` lines hold messages and tool calls;
/// `event_msg` lines of type `token_count` hold running totals, so the last
/// one wins.
pub(super) fn parse(text: &str) -> ParsedTranscript {
    let mut out = ParsedTranscript::default();

    for line in text.lines() {
        let Ok(v) = serde_json::from_str::<Value>(line.trim()) else {
            continue;
        };
        let Some(payload) = v.get("payload") else {
            continue;
        };
        let payload_type = payload.get("type").and_then(Value::as_str);

        match (v.get("type").and_then(Value::as_str), payload_type) {
            (Some("response_item"), Some("message")) => {
                if payload.get("role").and_then(Value::as_str) != Some("assistant") {
                    continue;
                }
                let text = value_text(payload.get("content").unwrap_or(&Value::Null));
                if !text.trim().is_empty() {
                    out.steps.push(Step::agent(text));
                }
            }
            (Some("response_item"), Some("function_call" | "custom_tool_call")) => {
                let name = payload.get("name").and_then(Value::as_str).unwrap_or("tool");
                let args = payload
                    .get("arguments")
                    .or_else(|| payload.get("input"))
                    .unwrap_or(&Value::Null);
                out.steps.push(Step::tool(tool_call_text(name, args)));
            }
            (Some("response_item"), Some("function_call_output" | "custom_tool_call_output")) => {
                let output = payload.get("output").unwrap_or(&Value::Null);
                out.steps.push(Step::tool(value_text(output)));
            }
            (Some("event_msg"), Some("token_count")) => {
                if let Some(total) = payload.pointer("/info/total_token_usage") {
                    out.usage = Some(TokenUsage {
                        input_tokens: u64_at(total, "/input_tokens"),
                        cache_tokens: u64_at(total, "/cached_input_tokens"),
                        output_tokens: u64_at(total, "/output_tokens"),
                    });
                }
            }
            _ => {}
        }
    }

    out
}
