use std::collections::HashMap;

use super::DimensionStats;
use crate::{
    dimension::Dimension,
    error::Result,
    table::{ScoreRow, ScoreTable, ARG_ID},
};

#[derive(Clone, Debug, PartialEq)]
pub struct AccuracyReport {
    pub per_dimension: DimensionStats,
    /// Unweighted mean of the per-dimension accuracies
    pub overall: f64,
}

/// Exact-match rate of `predictions` against `ground_truth` per dimension.
///
/// When both tables carry `argQ_id` the predictions are looked up by id;
/// a ground-truth row without a prediction counts as a miss. Otherwise rows
/// are compared by position.
pub fn compute_accuracy(
    ground_truth: &ScoreTable,
    predictions: &ScoreTable,
    dims: &[Dimension],
) -> Result<AccuracyReport> {
    ground_truth.require_scores(dims)?;
    predictions.require_scores(dims)?;

    let aligned: Vec<Option<&ScoreRow>> =
        if ground_truth.has_column(ARG_ID) && predictions.has_column(ARG_ID) {
            let mut by_id: HashMap<&str, &ScoreRow> = HashMap::new();
            for row in predictions.rows() {
                if let Some(id) = row.arg_id.as_deref() {
                    by_id.entry(id).or_insert(row);
                }
            }
            ground_truth
                .rows()
                .iter()
                .map(|t| t.arg_id.as_deref().and_then(|id| by_id.get(id).copied()))
                .collect()
        } else {
            (0..ground_truth.len())
                .map(|i| predictions.rows().get(i))
                .collect()
        };

    let total = ground_truth.len() as f64;
    let per_dimension: DimensionStats = dims
        .iter()
        .map(|&dim| {
            let correct = ground_truth
                .rows()
                .iter()
                .zip(&aligned)
                .filter(|(truth, pred)| match (truth.score(dim), pred.and_then(|p| p.score(dim))) {
                    (Some(t), Some(p)) => t == p,
                    _ => false,
                })
                .count();
            (dim, correct as f64 / total)
        })
        .collect();

    let overall = per_dimension.iter().map(|(_, v)| v).sum::<f64>() / dims.len() as f64;
    Ok(AccuracyReport {
        per_dimension,
        overall,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn table(name: &str, rows: &[(&str, i64, i64)]) -> ScoreTable {
        ScoreTable::from_rows(
            name,
            rows.iter()
                .map(|&(id, s, o)| {
                    ScoreRow::new(id)
                        .with_score(Dimension::Strength, Some(s))
                        .with_score(Dimension::Objectivity, Some(o))
                })
                .collect(),
        )
    }

    const DIMS: [Dimension; 2] = [Dimension::Strength, Dimension::Objectivity];

    #[test]
    fn identical_tables_are_fully_accurate() {
        let t = table("truth", &[("Q1", 2, 1), ("Q2", 0, 0), ("Q3", 1, 1)]);
        let r = compute_accuracy(&t, &t.clone(), &DIMS).unwrap();
        assert!(r.per_dimension.iter().all(|&(_, v)| v == 1.0));
        assert_eq!(r.overall, 1.0);
    }

    #[test]
    fn aligns_by_id_and_counts_missing_as_wrong() {
        let truth = table("truth", &[("Q1", 2, 1), ("Q2", 0, 0), ("Q3", 1, 1), ("Q4", 2, 0)]);
        // shuffled, Q4 absent, Q2 strength wrong
        let preds = table("preds", &[("Q3", 1, 1), ("Q2", 1, 0), ("Q1", 2, 1)]);
        let r = compute_accuracy(&truth, &preds, &DIMS).unwrap();
        assert_eq!(
            r.per_dimension,
            vec![(Dimension::Strength, 0.5), (Dimension::Objectivity, 0.75)]
        );
        assert_eq!(r.overall, 0.625);
    }

    #[test]
    fn missing_score_never_matches() {
        let truth = ScoreTable::from_rows(
            "truth",
            vec![ScoreRow::new("Q1").with_score(Dimension::Strength, None)],
        );
        let r = compute_accuracy(&truth, &truth.clone(), &[Dimension::Strength]).unwrap();
        assert_eq!(r.overall, 0.0);
    }

    #[test]
    fn missing_dimension_column_is_fatal() {
        let truth = ScoreTable::from_reader("truth", "argQ_id,STRONG\nQ1,2\n".as_bytes()).unwrap();
        let preds = table("preds", &[("Q1", 2, 1)]);
        let err = compute_accuracy(&truth, &preds, &DIMS).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { ref column, .. } if column == "OBJECTIVE"));
    }
}
