use serde_json::Value;
use std::collections::HashSet;

use super::{tool_call_text, u64_at, value_text, ParsedTranscript};
use crate::model::{Step, TokenUsage};

/// Stream-json log: `assistant` events carry text and `tool_use` blocks,
/// `user` events carry `tool_result` blocks. One assistant message can span
/// several lines, each repeating the same usage, so usage is counted once per
/// message id.
pub(super) fn parse(text: &str) -> ParsedTranscript {
    let mut out = ParsedTranscript::default();
    let mut usage = TokenUsage::default();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for line in text.lines() {
        let line = line.trim();
        if !line.starts_with('{') {
            continue;
        }
        let Ok(v) = serde_json::from_str::<Value>(line) else {
            continue;
        };
        let Some(message) = v.get("message") else {
            continue;
        };
        let blocks = message
            .get("content")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        match v.get("type").and_then(Value::as_str) {
            Some("assistant") => {
                for block in blocks {
                    match block.get("type").and_then(Value::as_str) {
                        Some("text") => {
                            let t = block.get("text").and_then(Value::as_str).unwrap_or("");
                            if !t.trim().is_empty() {
                                out.steps.push(Step::agent(t));
                            }
                        }
                        Some("tool_use") => {
                            let name = block.get("name").and_then(Value::as_str).unwrap_or("tool");
                            let input = block.get("input").unwrap_or(&Value::Null);
                            out.steps.push(Step::tool(tool_call_text(name, input)));
                        }
                        _ => {}
                    }
                }
                if let Some(u) = message.get("usage") {
                    let id = message
                        .get("id")
                        .and_then(Value::as_str)
                        .map(String::from);
                    let first_sighting = match id {
                        Some(id) => seen_ids.insert(id),
                        None => true,
                    };
                    if first_sighting {
                        usage += TokenUsage {
                            input_tokens: u64_at(u, "/input_tokens"),
                            cache_tokens: u64_at(u, "/cache_read_input_tokens")
                                .saturating_add(u64_at(u, "/cache_creation_input_tokens")),
                            output_tokens: u64_at(u, "/output_tokens"),
                        };
                    }
                }
            }
            Some("user") => {
                for block in blocks {
                    if block.get("type").and_then(Value::as_str) == Some("tool_result") {
                        let content = value_text(block.get("content").unwrap_or(&Value::Null));
                        out.steps.push(Step::tool(content));
                    }
                }
            }
            _ => {}
        }
    }

    out.usage = (!usage.is_zero()).then_some(usage);
    out
}
