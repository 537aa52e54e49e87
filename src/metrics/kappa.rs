//! Chance-corrected agreement kernels.
//!
//! Both return NaN where the statistic is 0/0: no items, or every rating
//! in a single category so that expected agreement is already 1.

use std::collections::BTreeMap;

/// Cohen's Kappa between two raters over paired labels.
pub fn cohen_kappa(a: &[i64], b: &[i64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return f64::NAN;
    }

    // label -> (count for a, count for b)
    let mut marginals: BTreeMap<i64, (usize, usize)> = BTreeMap::new();
    let mut agree = 0usize;
    for (&x, &y) in a.iter().zip(b) {
        marginals.entry(x).or_default().0 += 1;
        marginals.entry(y).or_default().1 += 1;
        if x == y {
            agree += 1;
        }
    }

    let n = n as f64;
    let p_o = agree as f64 / n;
    let p_e: f64 = marginals
        .values()
        .map(|&(ca, cb)| (ca as f64 / n) * (cb as f64 / n))
        .sum();
    if p_e >= 1.0 {
        return f64::NAN;
    }
    (p_o - p_e) / (1.0 - p_e)
}

/// Fleiss' Kappa over an items x categories count table.
///
/// The rater count is taken from the largest row total, so callers drop
/// rows with a different total first.
pub fn fleiss_kappa<const K: usize>(table: &[[u32; K]]) -> f64 {
    if table.is_empty() {
        return f64::NAN;
    }
    let n_rat = table
        .iter()
        .map(|row| row.iter().sum::<u32>())
        .max()
        .unwrap_or(0) as f64;
    if n_rat < 2.0 {
        return f64::NAN;
    }

    let mut col_sums = [0f64; K];
    let mut total = 0f64;
    let mut p_rows = 0f64;
    for row in table {
        let mut sq = 0f64;
        for (k, &c) in row.iter().enumerate() {
            let c = f64::from(c);
            col_sums[k] += c;
            total += c;
            sq += c * c;
        }
        p_rows += (sq - n_rat) / (n_rat * (n_rat - 1.0));
    }

    let p_mean = p_rows / table.len() as f64;
    let p_e: f64 = col_sums.iter().map(|s| (s / total).powi(2)).sum();
    if p_e >= 1.0 {
        return f64::NAN;
    }
    (p_mean - p_e) / (1.0 - p_e)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn cohen_perfect_agreement() {
        assert!(close(cohen_kappa(&[0, 1, 2, 1], &[0, 1, 2, 1]), 1.0));
    }

    #[test]
    fn cohen_known_value() {
        // p_o = 0.5, p_e = 0.5 -> 0
        assert!(close(cohen_kappa(&[0, 0, 1, 1], &[0, 1, 0, 1]), 0.0));
        // p_o = 0.75, p_e = 0.5 -> 0.5
        assert!(close(cohen_kappa(&[0, 0, 1, 1], &[0, 0, 1, 0]), 0.5));
    }

    #[test]
    fn cohen_single_label_is_undefined() {
        assert!(cohen_kappa(&[2, 2, 2], &[2, 2, 2]).is_nan());
        assert!(cohen_kappa(&[], &[]).is_nan());
    }

    #[test]
    fn fleiss_perfect_agreement() {
        let t = [[3, 0, 0], [0, 3, 0], [0, 0, 3]];
        assert!(close(fleiss_kappa(&t), 1.0));
    }

    #[test]
    fn fleiss_known_value() {
        // P_i = 1, 1/3, 1/3 -> P̄ = 5/9; p = (4/9, 4/9, 1/9) -> P_e = 33/81
        let t = [[3, 0, 0], [1, 2, 0], [0, 2, 1]];
        let expected = (5.0 / 9.0 - 33.0 / 81.0) / (1.0 - 33.0 / 81.0);
        assert!(close(fleiss_kappa(&t), expected));
    }

    #[test]
    fn fleiss_single_category_is_undefined() {
        assert!(fleiss_kappa(&[[0, 3, 0], [0, 3, 0]]).is_nan());
        assert!(fleiss_kappa::<3>(&[]).is_nan());
    }
}
