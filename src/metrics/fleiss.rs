use super::{kappa::fleiss_kappa, sampling::RUNS_PER_ITEM, DimensionStats};
use crate::{dimension::Dimension, error::Result, table::ScoreTable};

/// Score categories counted per item
const CATEGORIES: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct FleissReport {
    pub kappas: DimensionStats,
    /// Rows left out because some dimension lacked exactly three valid runs
    pub dropped: usize,
}

/// Count how often each score 0, 1, 2 occurs in a run list. Other values
/// are ignored, so a list with one bad entry sums to less than three.
pub fn score_frequencies(runs: &[i64]) -> [u32; CATEGORIES] {
    let mut freq = [0u32; CATEGORIES];
    for &s in runs {
        if let Ok(i) = usize::try_from(s) {
            if i < CATEGORIES {
                freq[i] += 1;
            }
        }
    }
    freq
}

/// Fleiss' Kappa over the three raw runs of every argument.
///
/// A row is kept only when every requested dimension yields exactly three
/// ratings; the number of dropped rows is logged and returned.
pub fn compute_fleiss_kappa(table: &ScoreTable, dims: &[Dimension]) -> Result<FleissReport> {
    table.require_runs(dims)?;

    let mut counts: Vec<Vec<[u32; CATEGORIES]>> = vec![Vec::new(); dims.len()];
    let mut dropped = 0usize;
    for row in table.rows() {
        let freqs: Vec<[u32; CATEGORIES]> = dims
            .iter()
            .map(|&d| row.runs(d).map(score_frequencies).unwrap_or_default())
            .collect();
        if freqs
            .iter()
            .any(|f| f.iter().sum::<u32>() as usize != RUNS_PER_ITEM)
        {
            dropped += 1;
            continue;
        }
        for (slot, f) in counts.iter_mut().zip(freqs) {
            slot.push(f);
        }
    }
    log::info!("Removed {dropped} rows with inconsistent annotation counts.");

    let kappas = dims
        .iter()
        .zip(&counts)
        .map(|(&d, c)| (d, fleiss_kappa(c)))
        .collect();
    Ok(FleissReport { kappas, dropped })
}
