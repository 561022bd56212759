//! Flat records shared by the extraction stages.
//!
//! JSON field names follow the tracker and viewer (camelCase); unknown fields
//! are ignored so newer tracker versions keep parsing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// Tracker counters arrive as integers, floats or numeric strings depending on
/// the tracker build; all are read as non-negative integers.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn to_u64<E: serde::de::Error>(v: Value) -> Result<Option<u64>, E> {
        match v {
            Value::Null => Ok(None),
            Value::Number(n) => match (n.as_u64(), n.as_f64()) {
                (Some(u), _) => Ok(Some(u)),
                (None, Some(f)) if f.is_finite() => Ok(Some(f.max(0.0) as u64)),
                _ => Err(E::custom(format!("counter out of range: {n}"))),
            },
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Some(f.max(0.0) as u64)),
                _ => Err(E::custom(format!("counter is not numeric: {s:?}"))),
            },
            other => Err(E::custom(format!("counter must be a number, got: {other}"))),
        }
    }

    pub fn u64<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        Ok(to_u64(Value::deserialize(d)?)?.unwrap_or(0))
    }

    pub fn u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        let n = to_u64(Value::deserialize(d)?)?.unwrap_or(0);
        Ok(u32::try_from(n).unwrap_or(u32::MAX))
    }

    pub fn opt_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        to_u64(Value::deserialize(d)?)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillProgress {
    #[serde(default, deserialize_with = "lenient::u32")]
    pub level: u32,
    #[serde(default, deserialize_with = "lenient::u64")]
    pub xp: u64,
}

/// One periodic snapshot written by the in-game tracker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, deserialize_with = "lenient::u64")]
    pub elapsed_ms: u64,
    #[serde(default)]
    pub skills: BTreeMap<String, SkillProgress>,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub total_level: u32,
    #[serde(
        default,
        deserialize_with = "lenient::opt_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub gold: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingData {
    #[serde(default)]
    pub bot_name: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub samples: Vec<Sample>,
}

impl TrackingData {
    /// Sorts samples by elapsed time and drops repeated `elapsedMs` entries
    /// (the tracker re-appends its last snapshot on restart).
    pub fn normalized(mut self) -> Self {
        self.samples.sort_by_key(|s| s.elapsed_ms);
        self.samples.dedup_by_key(|s| s.elapsed_ms);
        self
    }
}

/// Payload written by the task verifier, either as a file or between stdout markers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardPayload {
    #[serde(default)]
    pub reward: Option<f64>,
    #[serde(default)]
    pub xp: Option<f64>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub gold: Option<f64>,
    #[serde(default, alias = "total_level")]
    pub total_level: Option<f64>,
    #[serde(default)]
    pub tracking: Option<TrackingData>,
}

impl RewardPayload {
    pub fn sample_count(&self) -> usize {
        self.tracking.as_ref().map_or(0, |t| t.samples.len())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub cache_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn is_zero(&self) -> bool {
        self.input_tokens == 0 && self.cache_tokens == 0 && self.output_tokens == 0
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: Self) {
        self.input_tokens = self.input_tokens.saturating_add(rhs.input_tokens);
        self.cache_tokens = self.cache_tokens.saturating_add(rhs.cache_tokens);
        self.output_tokens = self.output_tokens.saturating_add(rhs.output_tokens);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepSource {
    Agent,
    Tool,
}

/// Normalized transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub source: StepSource,
    pub text: String,
}

impl Step {
    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            source: StepSource::Agent,
            text: text.into(),
        }
    }

    pub fn tool(text: impl Into<String>) -> Self {
        Self {
            source: StepSource::Tool,
            text: text.into(),
        }
    }
}

/// Which channel the winning reward/tracking payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    RewardFile,
    TrackingFile,
    StdoutMarkers,
}

impl RecordSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RewardFile => "reward_file",
            Self::TrackingFile => "tracking_file",
            Self::StdoutMarkers => "stdout_markers",
        }
    }
}

/// The aggregation unit: one trial's result, classified and scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecord {
    pub model: String,
    pub variant: String,
    pub job: String,
    pub trial: String,
    pub source: RecordSource,
    pub final_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    pub samples: Vec<Sample>,
    #[serde(default)]
    pub per_minute: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<TokenUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<Vec<Step>>,
}

impl ExtractedRecord {
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}
