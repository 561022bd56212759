//! Readers for the three reward channels of a trial's verifier directory.
//!
//! Every reader returns `None` for a missing, unreadable or malformed source;
//! the caller moves on to the next channel.

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::config::RewardMarkers;
use crate::model::{RewardPayload, TrackingData};

/// Captured output and agent logs are raw process bytes; invalid UTF-8 is
/// replaced rather than failing the whole file.
pub(crate) fn read_text_lossy(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => Some(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(path = %path.display(), "invalid utf-8, decoding lossily");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        }),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "source unavailable");
            None
        }
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let text = read_text_lossy(path)?;
    match serde_json::from_str(&text) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "malformed json, ignoring");
            None
        }
    }
}

pub fn read_reward_file(path: &Path) -> Option<RewardPayload> {
    read_json(path)
}

pub fn read_tracking_file(path: &Path) -> Option<TrackingData> {
    read_json(path)
}

/// Reward payload printed between marker lines in captured verifier output.
/// Later blocks win; a malformed block falls back to the one before it.
pub fn parse_marked_reward(text: &str, markers: &RewardMarkers) -> Option<RewardPayload> {
    marked_blocks(text, markers)
        .iter()
        .rev()
        .find_map(|block| serde_json::from_str(block).ok())
}

fn marked_blocks(text: &str, markers: &RewardMarkers) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<&str>> = None;
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed == markers.start {
            // an unterminated block is dropped when a new one opens
            current = Some(Vec::new());
        } else if trimmed == markers.end {
            if let Some(lines) = current.take() {
                blocks.push(lines.join("\n"));
            }
        } else if let Some(lines) = current.as_mut() {
            lines.push(line);
        }
    }
    blocks
}

pub fn read_marked_reward(path: &Path, markers: &RewardMarkers) -> Option<RewardPayload> {
    let text = read_text_lossy(path)?;
    let parsed = parse_marked_reward(&text, markers);
    if parsed.is_none() {
        tracing::debug!(path = %path.display(), "no complete reward block in captured output");
    }
    parsed
}
