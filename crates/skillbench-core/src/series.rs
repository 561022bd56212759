//! Score series derived from tracker samples.

use crate::classify::Objective;
use crate::model::Sample;

const MINUTE_MS: u64 = 60_000;
/// A bogus `elapsedMs` must not allocate an unbounded bucket vector.
const MAX_MINUTES: usize = 24 * 60;

/// Score gained in each minute of the run. Bucket `i` sums the deltas of
/// consecutive sample pairs whose later sample falls in minute `i`; later
/// minutes beyond a day are folded into the last bucket. Samples must already
/// be sorted by elapsed time.
pub fn per_minute(samples: &[Sample], objective: &Objective) -> Vec<f64> {
    let Some(last) = samples.last() else {
        return Vec::new();
    };
    if samples.len() < 2 {
        return Vec::new();
    }
    let minute = |s: &Sample| ((s.elapsed_ms / MINUTE_MS) as usize).min(MAX_MINUTES);
    let mut buckets = vec![0.0; minute(last) + 1];
    for pair in samples.windows(2) {
        let delta = objective.score(&pair[1]) - objective.score(&pair[0]);
        buckets[minute(&pair[1])] += delta;
    }
    buckets
}

/// Score of the final sample, `0.0` for an empty series.
pub fn last_score(samples: &[Sample], objective: &Objective) -> f64 {
    samples.last().map_or(0.0, |s| objective.score(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SkillProgress;

    fn sample(ms: u64, xp: u64) -> Sample {
        let mut s = Sample {
            elapsed_ms: ms,
            ..Default::default()
        };
        s.skills
            .insert("mining".into(), SkillProgress { level: 1, xp });
        s
    }

    #[test]
    fn buckets_gains_by_minute() {
        let obj = Objective::SkillXp("mining".into());
        let samples = vec![
            sample(0, 0),
            sample(30_000, 50),
            sample(60_000, 120),
            sample(90_000, 200),
            sample(185_000, 260),
        ];
        assert_eq!(per_minute(&samples, &obj), vec![50.0, 150.0, 0.0, 60.0]);
        assert_eq!(last_score(&samples, &obj), 260.0);
    }

    #[test]
    fn short_series() {
        let obj = Objective::TotalLevel;
        assert!(per_minute(&[], &obj).is_empty());
        assert!(per_minute(&[sample(0, 1)], &obj).is_empty());
        assert_eq!(last_score(&[], &obj), 0.0);
    }

    #[test]
    fn runaway_elapsed_is_clamped() {
        let obj = Objective::SkillXp("mining".into());
        let buckets = per_minute(&[sample(0, 0), sample(u64::MAX, 10)], &obj);
        assert_eq!(buckets.len(), MAX_MINUTES + 1);
        assert_eq!(buckets[MAX_MINUTES], 10.0);
    }
}
