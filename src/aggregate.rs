use crate::{
    client::{parse_scores, Annotator},
    dimension::{Dimension, DIMENSION_COUNT},
};

/// Raw scores collected over repeated runs, one sequence per dimension.
///
/// Sequences are in call order and may be shorter than the requested run
/// count when calls fail or labels are missing from a response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSets([Vec<i64>; DIMENSION_COUNT]);

impl RunSets {
    pub fn get(&self, dim: Dimension) -> &[i64] {
        &self.0[dim.index()]
    }

    pub fn push(&mut self, dim: Dimension, score: i64) {
        self.0[dim.index()].push(score);
    }
}

/// Issue `runs` independent calls for the same prompt.
///
/// A failed call is logged and skipped; it is never retried and never stops
/// the remaining runs.
pub async fn annotate_with_retries<A>(
    annotator: &A,
    prompt: &str,
    runs: usize,
    bias_mode: bool,
) -> RunSets
where
    A: Annotator + ?Sized,
{
    let mut sets = RunSets::default();
    for run in 1..=runs {
        match annotator.request_annotation(prompt, bias_mode).await {
            Ok(text) => {
                let scores = parse_scores(&text);
                for dim in Dimension::ALL {
                    if let Some(score) = scores.get(dim) {
                        sets.push(dim, score);
                    }
                }
            }
            Err(e) => log::warn!("Run {run} failed: {e}"),
        }
    }
    sets
}

/// Arithmetic mean of a run set, NaN when nothing was collected
pub fn aggregate(scores: &[i64]) -> f64 {
    if scores.is_empty() {
        return f64::NAN;
    }
    scores.iter().sum::<i64>() as f64 / scores.len() as f64
}

/// Consensus score: the mean rounded half to even, kept inside the
/// dimension's range. `None` for an empty run set.
pub fn consensus(dim: Dimension, scores: &[i64]) -> Option<i64> {
    let mean = aggregate(scores);
    if mean.is_nan() {
        return None;
    }
    Some((mean.round_ties_even() as i64).clamp(0, dim.max_score()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Scripted(Mutex<Vec<Result<String>>>);

    impl Scripted {
        fn new(mut replies: Vec<Result<String>>) -> Self {
            replies.reverse();
            Self(Mutex::new(replies))
        }
    }

    #[async_trait]
    impl Annotator for Scripted {
        async fn request_annotation(&self, _prompt: &str, _bias_mode: bool) -> Result<String> {
            self.0
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(Error::MalformedResponse("script exhausted".into())))
        }
    }

    #[test]
    fn empty_run_set_is_nan_not_zero() {
        assert!(aggregate(&[]).is_nan());
        assert_eq!(consensus(Dimension::Strength, &[]), None);
        assert_eq!(consensus(Dimension::Strength, &[0]), Some(0));
    }

    #[test]
    fn consensus_rounds_half_to_even() {
        assert_eq!(consensus(Dimension::Strength, &[1, 2]), Some(2));
        assert_eq!(consensus(Dimension::Strength, &[0, 1]), Some(0));
        assert_eq!(consensus(Dimension::Strength, &[1, 1, 2]), Some(1));
        assert_eq!(consensus(Dimension::Objectivity, &[1, 1, 0]), Some(1));
    }

    #[test]
    fn consensus_stays_in_range() {
        for a in 0..=2 {
            for b in 0..=2 {
                for c in 0..=2 {
                    let s = consensus(Dimension::Persuasiveness, &[a, b, c]).unwrap();
                    assert!(Dimension::Persuasiveness.in_range(s));
                }
            }
        }
        for a in 0..=1 {
            for b in 0..=1 {
                let s = consensus(Dimension::Objectivity, &[a, b]).unwrap();
                assert!(Dimension::Objectivity.in_range(s));
            }
        }
    }

    #[tokio::test]
    async fn failed_run_is_skipped_not_retried() {
        let annotator = Scripted::new(vec![
            Ok("Strength: 2\nObjectivity: 1".into()),
            Err(Error::RemoteCall { status: 500, body: "boom".into() }),
            Ok("Strength: 1\nObjectivity: 0".into()),
            Ok("Strength: 0".into()),
        ]);

        let sets = annotate_with_retries(&annotator, "prompt", 3, false).await;
        assert_eq!(sets.get(Dimension::Strength), &[2, 1]);
        assert_eq!(sets.get(Dimension::Objectivity), &[1, 0]);
        assert!(sets.get(Dimension::Specificity).is_empty());

        // the fourth reply was never requested
        assert_eq!(annotator.0.lock().unwrap().len(), 1);
    }
}
