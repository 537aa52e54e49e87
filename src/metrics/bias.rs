//! Drift between an unbiased and a bias-injected annotation of the same
//! arguments. Rows are paired by position; undefined scores are left out
//! of every mean.

use super::{nan_mean, DimensionStats};
use crate::{dimension::Dimension, error::Result, table::ScoreTable};

fn paired(unbiased: &ScoreTable, biased: &ScoreTable, dim: Dimension) -> Vec<(f64, f64)> {
    unbiased
        .rows()
        .iter()
        .zip(biased.rows())
        .filter_map(|(u, b)| Some((u.score(dim)? as f64, b.score(dim)? as f64)))
        .collect()
}

fn reduce(
    unbiased: &ScoreTable,
    biased: &ScoreTable,
    dims: &[Dimension],
    f: impl Fn(f64, f64) -> f64,
) -> Result<DimensionStats> {
    unbiased.require_scores(dims)?;
    biased.require_scores(dims)?;
    Ok(dims
        .iter()
        .map(|&dim| {
            let values = paired(unbiased, biased, dim).into_iter().map(|(u, b)| f(u, b));
            (dim, nan_mean(values))
        })
        .collect())
}

/// Mean bias error: mean of `biased - unbiased`
pub fn compute_mbe(
    unbiased: &ScoreTable,
    biased: &ScoreTable,
    dims: &[Dimension],
) -> Result<DimensionStats> {
    reduce(unbiased, biased, dims, |u, b| b - u)
}

/// Mean absolute error: mean of `|unbiased - biased|`
pub fn compute_mae(
    unbiased: &ScoreTable,
    biased: &ScoreTable,
    dims: &[Dimension],
) -> Result<DimensionStats> {
    reduce(unbiased, biased, dims, |u, b| (u - b).abs())
}

/// Mean absolute percentage error in percent. Pairs whose unbiased score
/// is 0 have no defined percentage and are left out.
pub fn compute_mape(
    unbiased: &ScoreTable,
    biased: &ScoreTable,
    dims: &[Dimension],
) -> Result<DimensionStats> {
    let mut stats = reduce(unbiased, biased, dims, |u, b| {
        if u == 0.0 {
            f64::NAN
        } else {
            ((u - b) / u).abs()
        }
    })?;
    for (_, v) in &mut stats {
        *v *= 100.0;
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ScoreRow;

    fn table(scores: &[Option<i64>]) -> ScoreTable {
        ScoreTable::from_rows(
            "t",
            scores
                .iter()
                .enumerate()
                .map(|(i, &s)| {
                    ScoreRow::new(format!("Q{i}")).with_score(Dimension::Persuasiveness, s)
                })
                .collect(),
        )
    }

    const D: [Dimension; 1] = [Dimension::Persuasiveness];

    #[test]
    fn mbe_is_signed() {
        let u = table(&[Some(2), Some(2), Some(1), Some(0)]);
        let b = table(&[Some(1), Some(1), Some(1), Some(2)]);
        // deltas: -1, -1, 0, +2
        assert_eq!(compute_mbe(&u, &b, &D).unwrap()[0].1, 0.0);
        assert_eq!(compute_mae(&u, &b, &D).unwrap()[0].1, 1.0);
    }

    #[test]
    fn mape_skips_zero_denominators() {
        let u = table(&[Some(2), Some(1), Some(0)]);
        let b = table(&[Some(1), Some(1), Some(2)]);
        // 50%, 0%, undefined
        assert_eq!(compute_mape(&u, &b, &D).unwrap()[0].1, 25.0);
    }

    #[test]
    fn undefined_scores_are_excluded() {
        let u = table(&[Some(2), None]);
        let b = table(&[Some(1), Some(0)]);
        assert_eq!(compute_mbe(&u, &b, &D).unwrap()[0].1, -1.0);

        let all_zero = table(&[Some(0)]);
        assert!(compute_mape(&all_zero, &all_zero, &D).unwrap()[0].1.is_nan());
    }

    #[test]
    fn identical_tables_have_no_drift() {
        let t = table(&[Some(0), Some(1), Some(2)]);
        assert_eq!(compute_mbe(&t, &t, &D).unwrap()[0].1, 0.0);
        assert_eq!(compute_mae(&t, &t, &D).unwrap()[0].1, 0.0);
        assert_eq!(compute_mape(&t, &t, &D).unwrap()[0].1, 0.0);
    }
}
