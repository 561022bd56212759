//! Extraction and aggregation of skillbench agent runs.
//!
//! A run of the external task runner leaves one directory per job, each with
//! one or more trial directories. This crate finds the trials, reconciles
//! their reward channels, classifies model and task variant, normalizes the
//! agent transcript, keeps the best run per `(model, variant)` and writes the
//! result files the chart viewer loads.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod errors;
pub mod extract;
pub mod layout;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod series;
pub mod transcript;

pub use aggregate::{aggregate, select_best, should_replace, GroupedTable};
pub use config::HarnessConfig;
pub use errors::{HarnessError, Result};
pub use extract::{find_payload, Extractor, TrialPayload, TrialReport};
pub use model::{
    ExtractedRecord, RecordSource, RewardPayload, Sample, SkillProgress, Step, StepSource,
    TokenUsage, TrackingData,
};
pub use pipeline::{resolve_jobs, run, RunOptions, RunSummary};
