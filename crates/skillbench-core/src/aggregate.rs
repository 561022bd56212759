//! Best-run selection and grouping.
//!
//! One record survives per `(model, variant)`. A candidate with more than
//! twice the samples of the incumbent replaces it outright; one with less
//! than half never does; otherwise the strictly higher final score wins and
//! ties keep the incumbent. This keeps an aborted run that spiked early from
//! displacing a complete one.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::ExtractedRecord;

/// `model -> variant -> best record`, in sorted key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GroupedTable(pub BTreeMap<String, BTreeMap<String, ExtractedRecord>>);

impl GroupedTable {
    pub fn record_count(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    pub fn models(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, ExtractedRecord>)> {
        self.0.iter()
    }

    pub fn get(&self, model: &str, variant: &str) -> Option<&ExtractedRecord> {
        self.0.get(model).and_then(|v| v.get(variant))
    }

    /// Folds one record in, keeping whichever of it and the incumbent
    /// [`select_best`] prefers.
    pub fn insert(mut self, record: ExtractedRecord) -> Self {
        let variants = self.0.entry(record.model.clone()).or_default();
        let winner = match variants.remove(&record.variant) {
            Some(existing) => select_best(existing, record),
            None => record,
        };
        variants.insert(winner.variant.clone(), winner);
        self
    }
}

pub fn should_replace(existing: &ExtractedRecord, candidate: &ExtractedRecord) -> bool {
    let (have, new) = (existing.sample_count(), candidate.sample_count());
    if new > have.saturating_mul(2) {
        return true;
    }
    if have > new.saturating_mul(2) {
        return false;
    }
    candidate.final_score > existing.final_score
}

pub fn select_best(existing: ExtractedRecord, candidate: ExtractedRecord) -> ExtractedRecord {
    if should_replace(&existing, &candidate) {
        tracing::debug!(
            model = %candidate.model,
            variant = %candidate.variant,
            kept = %candidate.trial,
            dropped = %existing.trial,
            "better run replaces incumbent"
        );
        candidate
    } else {
        existing
    }
}

pub fn aggregate<I>(records: I) -> GroupedTable
where
    I: IntoIterator<Item = ExtractedRecord>,
{
    records
        .into_iter()
        .fold(GroupedTable::default(), GroupedTable::insert)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RecordSource, Sample};

    fn record(model: &str, variant: &str, trial: &str, score: f64, samples: usize) -> ExtractedRecord {
        ExtractedRecord {
            model: model.into(),
            variant: variant.into(),
            job: "job".into(),
            trial: trial.into(),
            source: RecordSource::RewardFile,
            final_score: score,
            duration_ms: None,
            samples: (0..samples)
                .map(|i| Sample {
                    elapsed_ms: i as u64 * 1000,
                    ..Default::default()
                })
                .collect(),
            per_minute: Vec::new(),
            token_usage: None,
            transcript: None,
        }
    }

    #[test]
    fn higher_score_wins_when_comparable() {
        let a = record("m", "mining", "a", 100.0, 20);
        let b = record("m", "mining", "b", 150.0, 15);
        assert_eq!(select_best(a.clone(), b.clone()).trial, "b");
        assert_eq!(select_best(b, a).trial, "b");
    }

    #[test]
    fn truncated_spike_loses() {
        let full = record("m", "mining", "full", 100.0, 20);
        let short = record("m", "mining", "short", 500.0, 9);
        assert_eq!(select_best(full.clone(), short.clone()).trial, "full");
        assert_eq!(select_best(short, full).trial, "full");
    }

    #[test]
    fn exactly_half_is_comparable() {
        let full = record("m", "mining", "full", 100.0, 20);
        let half = record("m", "mining", "half", 101.0, 10);
        assert_eq!(select_best(full, half).trial, "half");
    }

    #[test]
    fn ties_keep_incumbent() {
        let a = record("m", "mining", "a", 100.0, 10);
        let b = record("m", "mining", "b", 100.0, 10);
        assert_eq!(select_best(a, b).trial, "a");
    }

    #[test]
    fn empty_incumbent_is_replaced_by_any_sampled_run() {
        let empty = record("m", "mining", "empty", 1000.0, 0);
        let one = record("m", "mining", "one", 1.0, 1);
        assert_eq!(select_best(empty, one).trial, "one");
    }

    #[test]
    fn groups_by_model_and_variant() {
        let table = aggregate(vec![
            record("kimi-k2.5", "mining", "k1", 10.0, 5),
            record("kimi-k2.5", "fishing", "k2", 20.0, 5),
            record("kimi-k2.5", "mining", "k3", 30.0, 5),
            record("gpt-5.2-codex", "mining", "g1", 5.0, 5),
        ]);
        assert_eq!(table.record_count(), 3);
        assert_eq!(table.get("kimi-k2.5", "mining").unwrap().trial, "k3");
        assert_eq!(table.get("kimi-k2.5", "fishing").unwrap().trial, "k2");
        let models: Vec<&String> = table.models().map(|(m, _)| m).collect();
        assert_eq!(models, vec!["gpt-5.2-codex", "kimi-k2.5"]);
        assert!(aggregate(Vec::new()).is_empty());
    }
}
