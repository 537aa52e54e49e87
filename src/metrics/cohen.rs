use super::{kappa::cohen_kappa, DimensionStats};
use crate::{
    dimension::Dimension,
    error::{Error, Result},
    table::ScoreTable,
};

/// Cohen's Kappa between ground truth and predictions, rows paired by
/// position. Pairs with an undefined score on either side are skipped.
pub fn compute_cohen_kappa(
    ground_truth: &ScoreTable,
    predictions: &ScoreTable,
    dims: &[Dimension],
) -> Result<DimensionStats> {
    ground_truth.require_scores(dims)?;
    predictions.require_scores(dims)?;
    if ground_truth.len() != predictions.len() {
        return Err(Error::LengthMismatch {
            left: ground_truth.len(),
            right: predictions.len(),
        });
    }

    Ok(dims
        .iter()
        .map(|&dim| {
            let (truth, pred): (Vec<i64>, Vec<i64>) = ground_truth
                .rows()
                .iter()
                .zip(predictions.rows())
                .filter_map(|(t, p)| Some((t.score(dim)?, p.score(dim)?)))
                .unzip();
            (dim, cohen_kappa(&pred, &truth))
        })
        .collect())
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
                .map(|(i, &s)| ScoreRow::new(format!("Q{i}")).with_score(Dimension::Specificity, s))
                .collect(),
        )
    }

    #[test]
    fn perfect_agreement_is_one() {
        let t = table(&[Some(0), Some(1), Some(2), Some(2)]);
        let k = compute_cohen_kappa(&t, &t.clone(), &[Dimension::Specificity]).unwrap();
        assert_eq!(k[0].0, Dimension::Specificity);
        assert!((k[0].1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn undefined_pairs_are_dropped() {
        let truth = table(&[Some(0), Some(1), None, Some(1)]);
        let preds = table(&[Some(0), Some(1), Some(2), Some(1)]);
        let k = compute_cohen_kappa(&truth, &preds, &[Dimension::Specificity]).unwrap();
        assert!((k[0].1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let short = table(&[Some(0)]);
        let long = table(&[Some(0), Some(1)]);
        let err = compute_cohen_kappa(&short, &long, &[Dimension::Specificity]).unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { left: 1, right: 2 }));
    }

    #[test]
    fn all_identical_ratings_are_nan() {
        let t = table(&[Some(2), Some(2), Some(2)]);
        let k = compute_cohen_kappa(&t, &t.clone(), &[Dimension::Specificity]).unwrap();
        assert!(k[0].1.is_nan());
    }
}
