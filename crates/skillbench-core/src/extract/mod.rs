//! Per-trial extraction.
//!
//! Reward data reaches us over three channels of decreasing reliability:
//! the verifier's `reward.json`, a standalone `tracking.json`, and a copy of
//! the reward JSON printed between marker lines on the verifier's stdout.
//! File sync from the remote runner can fail silently while stdout capture
//! still works, so the channels are tried in that fixed order and the first
//! one carrying samples wins.

pub mod sources;
pub mod trial_result;

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::classify::{classify_trial, Classification, ModelClassifier, Objective};
use crate::config::{HarnessConfig, RewardMarkers, SourceFiles};
use crate::errors::Result;
use crate::layout::{self, dir_name};
use crate::model::{ExtractedRecord, RecordSource, RewardPayload, TokenUsage, TrackingData};
use crate::series;
use crate::transcript::{load_transcript, TranscriptFormat};
use sources::{read_marked_reward, read_reward_file, read_tracking_file};
use trial_result::TrialResult;

/// The winning reward channel of one trial.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialPayload {
    pub source: RecordSource,
    /// Scalar fields of the reward payload, when one was readable.
    pub reward: Option<RewardPayload>,
    /// Sorted, de-duplicated samples; never empty.
    pub tracking: TrackingData,
}

impl TrialPayload {
    fn from_reward(source: RecordSource, mut reward: RewardPayload) -> Self {
        let tracking = reward.tracking.take().unwrap_or_default().normalized();
        Self {
            source,
            reward: Some(reward),
            tracking,
        }
    }

    pub fn final_score(&self, objective: &Objective) -> f64 {
        self.reward
            .as_ref()
            .and_then(|r| objective.direct_score(r))
            .unwrap_or_else(|| series::last_score(&self.tracking.samples, objective))
    }
}

/// Tries reward file, tracking file, then stdout markers. A source that is
/// missing, malformed or has no samples falls through to the next.
pub fn find_payload(
    verifier_dir: &Path,
    files: &SourceFiles,
    markers: &RewardMarkers,
) -> Option<TrialPayload> {
    let reward = read_reward_file(&verifier_dir.join(&files.reward));
    if let Some(r) = reward.as_ref().filter(|r| r.sample_count() > 0) {
        return Some(TrialPayload::from_reward(RecordSource::RewardFile, r.clone()));
    }

    if let Some(tracking) =
        read_tracking_file(&verifier_dir.join(&files.tracking)).filter(|t| !t.samples.is_empty())
    {
        return Some(TrialPayload {
            source: RecordSource::TrackingFile,
            reward: reward.map(|mut r| {
                r.tracking = None;
                r
            }),
            tracking: tracking.normalized(),
        });
    }

    read_marked_reward(&verifier_dir.join(&files.stdout), markers)
        .filter(|r| r.sample_count() > 0)
        .map(|r| TrialPayload::from_reward(RecordSource::StdoutMarkers, r))
}

/// Stateless per-trial extractor; the same instance serves every job.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: HarnessConfig,
    classifier: ModelClassifier,
    horizon: Option<String>,
    include_transcripts: bool,
}

impl Extractor {
    pub fn new(config: HarnessConfig) -> Result<Self> {
        let classifier = ModelClassifier::with_overrides(&config.model_rules)?;
        Ok(Self {
            config,
            classifier,
            horizon: None,
            include_transcripts: true,
        })
    }

    pub fn with_horizon(mut self, horizon: Option<String>) -> Self {
        self.horizon = horizon.map(|h| h.to_lowercase());
        self
    }

    pub fn with_transcripts(mut self, include: bool) -> Self {
        self.include_transcripts = include;
        self
    }

    /// Records for every classifiable trial of `job_dir` that has reward data.
    pub fn extract_job(&self, job_dir: &Path) -> Vec<ExtractedRecord> {
        let trials = layout::trial_dirs(job_dir, &self.config.trial_markers);
        if trials.is_empty() {
            tracing::warn!(job = %job_dir.display(), "no trial directories found");
        }
        let records: Vec<ExtractedRecord> = trials
            .iter()
            .filter_map(|t| self.extract_trial(job_dir, t))
            .collect();
        tracing::info!(
            job = %dir_name(job_dir),
            trials = trials.len(),
            records = records.len(),
            "job extracted"
        );
        records
    }

    pub fn extract_trial(&self, job_dir: &Path, trial_dir: &Path) -> Option<ExtractedRecord> {
        let files = &self.config.files;
        let Classification { model, variant } =
            classify_trial(&self.classifier, job_dir, trial_dir, files)?;

        if !variant.matches_horizon(self.horizon.as_deref()) {
            tracing::info!(
                trial = %dir_name(trial_dir),
                horizon = ?variant.horizon,
                "horizon filtered out"
            );
            return None;
        }

        let Some(payload) = find_payload(
            &trial_dir.join(&files.verifier_dir),
            files,
            &self.config.markers,
        ) else {
            tracing::warn!(trial = %trial_dir.display(), "no reward or tracking data");
            return None;
        };
        tracing::debug!(
            trial = %dir_name(trial_dir),
            source = payload.source.as_str(),
            samples = payload.tracking.samples.len(),
            "payload found"
        );

        let final_score = payload.final_score(&variant.objective);
        let per_minute = series::per_minute(&payload.tracking.samples, &variant.objective);
        let trial_result = TrialResult::read(&trial_dir.join(&files.trial_result));

        let transcript = if self.include_transcripts || trial_result.token_usage.is_none() {
            load_transcript(&trial_dir.join(&files.agent_dir), &self.config.transcript)
        } else {
            None
        };
        let token_usage = trial_result
            .token_usage
            .or_else(|| transcript.as_ref().and_then(|t| t.usage));

        let samples = payload.tracking.samples;
        let duration_ms = samples
            .last()
            .map(|s| s.elapsed_ms)
            .filter(|ms| *ms > 0)
            .or(trial_result.duration_ms);

        Some(ExtractedRecord {
            model,
            variant: variant.key(),
            job: dir_name(job_dir),
            trial: dir_name(trial_dir),
            source: payload.source,
            final_score,
            duration_ms,
            samples,
            per_minute,
            token_usage,
            transcript: transcript
                .filter(|_| self.include_transcripts)
                .map(|t| t.steps),
        })
    }

    /// Diagnostic view of one trial: what each stage produced, even when a
    /// later stage would have dropped it.
    pub fn inspect_trial(&self, trial_dir: &Path) -> TrialReport {
        let files = &self.config.files;
        let job_dir = self.job_dir_for(trial_dir);
        let classification = job_dir
            .as_deref()
            .and_then(|job| classify_trial(&self.classifier, job, trial_dir, files));
        let payload = find_payload(
            &trial_dir.join(&files.verifier_dir),
            files,
            &self.config.markers,
        );
        let trial_result = TrialResult::read(&trial_dir.join(&files.trial_result));
        let transcript = load_transcript(&trial_dir.join(&files.agent_dir), &self.config.transcript);

        TrialReport {
            trial: trial_dir.to_path_buf(),
            job: job_dir,
            model: classification.as_ref().map(|c| c.model.clone()),
            variant: classification.as_ref().map(|c| c.variant.key()),
            horizon: classification.as_ref().and_then(|c| c.variant.horizon.clone()),
            source: payload.as_ref().map(|p| p.source),
            samples: payload.as_ref().map_or(0, |p| p.tracking.samples.len()),
            final_score: match (&payload, &classification) {
                (Some(p), Some(c)) => Some(p.final_score(&c.variant.objective)),
                _ => None,
            },
            token_usage: trial_result
                .token_usage
                .or_else(|| transcript.as_ref().and_then(|t| t.usage)),
            transcript_format: transcript.as_ref().map(|t| t.format),
            transcript_steps: transcript.as_ref().map_or(0, |t| t.steps.len()),
        }
    }

    /// Parent of the trial, or the grandparent when the parent is a
    /// timestamp directory whose name names no model.
    fn job_dir_for(&self, trial_dir: &Path) -> Option<PathBuf> {
        let parent = trial_dir.parent()?;
        if self.classifier.classify(&dir_name(parent)).is_some() {
            return Some(parent.to_path_buf());
        }
        match parent.parent() {
            Some(gp) if self.classifier.classify(&dir_name(gp)).is_some() => Some(gp.to_path_buf()),
            _ => Some(parent.to_path_buf()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialReport {
    pub trial: PathBuf,
    pub job: Option<PathBuf>,
    pub model: Option<String>,
    pub variant: Option<String>,
    pub horizon: Option<String>,
    pub source: Option<RecordSource>,
    pub samples: usize,
    pub final_score: Option<f64>,
    pub token_usage: Option<TokenUsage>,
    pub transcript_format: Option<TranscriptFormat>,
    pub transcript_steps: usize,
}
