//! Vendor transcript normalization.
//!
//! Each agent writes its log in its own shape. A [`TranscriptFormat`] knows
//! where its file lives inside the trial's `agent/` directory and how to turn
//! it into ordered [`Step`]s; [`load_transcript`] tries the formats in a fixed
//! order and keeps the first one that yields steps. Parsers skip what they
//! cannot read instead of failing.

mod claude;
mod codex;
mod opencode;
mod step_list;

use globset::{Glob, GlobMatcher};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::config::TranscriptLimits;
use crate::extract::sources::read_text_lossy;
use crate::model::{Step, TokenUsage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptFormat {
    /// `trajectory.json`: a JSON document with a `steps` array.
    StepList,
    /// `claude-code.txt`: stream-json events, one per line.
    ClaudeStream,
    /// `sessions/**/*.jsonl`: codex rollout events.
    CodexSession,
    /// `opencode*.txt`: runner chatter with `--format=json` event lines mixed in.
    OpenCodeLog,
}

/// Steps and token counts recovered from one transcript file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTranscript {
    pub steps: Vec<Step>,
    pub usage: Option<TokenUsage>,
}

impl ParsedTranscript {
    fn non_empty(self) -> Option<Self> {
        if self.steps.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub format: TranscriptFormat,
    pub path: PathBuf,
    pub steps: Vec<Step>,
    pub usage: Option<TokenUsage>,
}

impl TranscriptFormat {
    pub const ALL: [Self; 4] = [
        Self::StepList,
        Self::ClaudeStream,
        Self::CodexSession,
        Self::OpenCodeLog,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StepList => "step_list",
            Self::ClaudeStream => "claude_stream",
            Self::CodexSession => "codex_session",
            Self::OpenCodeLog => "opencode_log",
        }
    }

    pub fn locate(&self, agent_dir: &Path) -> Option<PathBuf> {
        match self {
            Self::StepList => existing(agent_dir.join("trajectory.json")),
            Self::ClaudeStream => existing(agent_dir.join("claude-code.txt")),
            Self::CodexSession => find_files(&agent_dir.join("sessions"), "**/*.jsonl", true)
                .into_iter()
                .next(),
            Self::OpenCodeLog => find_files(agent_dir, "opencode*.txt", false)
                .into_iter()
                .next(),
        }
    }

    pub fn parse(&self, text: &str) -> Option<ParsedTranscript> {
        let parsed = match self {
            Self::StepList => step_list::parse(text)?,
            Self::ClaudeStream => claude::parse(text),
            Self::CodexSession => codex::parse(text),
            Self::OpenCodeLog => opencode::parse(text),
        };
        parsed.non_empty()
    }
}

/// First format, in [`TranscriptFormat::ALL`] order, whose file exists and
/// yields at least one step.
pub fn load_transcript(agent_dir: &Path, limits: &TranscriptLimits) -> Option<Transcript> {
    TranscriptFormat::ALL.iter().find_map(|format| {
        let path = format.locate(agent_dir)?;
        let text = read_text_lossy(&path)?;
        let parsed = format.parse(&text);
        tracing::debug!(
            format = format.as_str(),
            path = %path.display(),
            steps = parsed.as_ref().map_or(0, |p| p.steps.len()),
            "transcript candidate"
        );
        let parsed = parsed?;
        Some(Transcript {
            format: *format,
            path,
            steps: cap_steps(parsed.steps, limits),
            usage: parsed.usage,
        })
    })
}

/// Keeps the first `max_steps` steps, each cut to `max_step_chars` characters.
pub fn cap_steps(steps: Vec<Step>, limits: &TranscriptLimits) -> Vec<Step> {
    steps
        .into_iter()
        .take(limits.max_steps)
        .map(|mut s| {
            if s.text.chars().count() > limits.max_step_chars {
                let mut cut: String = s.text.chars().take(limits.max_step_chars).collect();
                cut.push('…');
                s.text = cut;
            }
            s
        })
        .collect()
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}

fn find_files(dir: &Path, pattern: &str, recursive: bool) -> Vec<PathBuf> {
    let Ok(glob) = Glob::new(pattern) else {
        return Vec::new();
    };
    let matcher = glob.compile_matcher();
    let mut out = Vec::new();
    collect_files(dir, dir, &matcher, recursive, &mut out);
    out.sort();
    out
}

fn collect_files(
    root: &Path,
    dir: &Path,
    matcher: &GlobMatcher,
    recursive: bool,
    out: &mut Vec<PathBuf>,
) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            if recursive {
                collect_files(root, &path, matcher, recursive, out);
            }
        } else if path
            .strip_prefix(root)
            .map(|rel| matcher.is_match(rel))
            .unwrap_or(false)
        {
            out.push(path);
        }
    }
}

/// Text of a message or tool payload: strings as-is, content-block arrays
/// joined on their `text` fields, anything else as compact JSON.
pub(crate) fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                other => other.get("text").and_then(Value::as_str).map(String::from),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}

/// `name {args}` rendering used for every tool invocation.
pub(crate) fn tool_call_text(name: &str, args: &Value) -> String {
    match args {
        Value::Null => name.to_string(),
        Value::String(s) if s.is_empty() => name.to_string(),
        Value::String(s) => format!("{} {}", name, s),
        other => format!("{} {}", name, other),
    }
}

pub(crate) fn u64_at(v: &Value, pointer: &str) -> u64 {
    v.pointer(pointer).and_then(Value::as_u64).unwrap_or(0)
}
