use rand::{seq::index, Rng};

use super::kappa::cohen_kappa;
use crate::{
    dimension::Dimension,
    error::{Error, Result},
    table::{ScoreTable, COMPANY_NAME},
};

/// Runs recorded per argument in the sampled experiments
pub const RUNS_PER_ITEM: usize = 3;

/// Kappa between two randomly chosen runs treated as virtual raters
#[derive(Clone, Debug, PartialEq)]
pub struct RandomKappa {
    pub dimension: Dimension,
    pub runs: (usize, usize),
    pub kappa: f64,
}

impl RandomKappa {
    pub fn chosen_runs(&self) -> String {
        format!("{} vs {}", self.runs.0, self.runs.1)
    }
}

/// Stratified sample: `⌊len·fraction⌋` rows split evenly over `companies`,
/// drawn without replacement from each company's rows.
pub fn create_sample<R: Rng + ?Sized>(
    table: &ScoreTable,
    companies: &[String],
    fraction: f64,
    rng: &mut R,
) -> Result<ScoreTable> {
    if companies.is_empty() {
        return Err(Error::InvalidValue("no companies to sample from".into()));
    }
    if !(0.0..=1.0).contains(&fraction) {
        return Err(Error::InvalidValue(format!("sample fraction {fraction} outside [0, 1]")));
    }
    table.require_column(COMPANY_NAME)?;

    let total = (table.len() as f64 * fraction) as usize;
    let per_company = total / companies.len();

    let mut sample = Vec::with_capacity(per_company * companies.len());
    for company in companies {
        let rows: Vec<_> = table
            .rows()
            .iter()
            .filter(|r| r.company_name.as_deref() == Some(company.as_str()))
            .collect();
        if rows.len() < per_company {
            return Err(Error::InsufficientRows {
                company: company.clone(),
                requested: per_company,
                available: rows.len(),
            });
        }
        for i in index::sample(rng, rows.len(), per_company) {
            sample.push(rows[i].clone());
        }
    }
    log::info!(
        "sampled {} rows ({per_company} per company) from {}",
        sample.len(),
        table.name()
    );
    Ok(table.with_rows(sample))
}

/// For each dimension pick two of the three runs at random and compute
/// Cohen's Kappa between them across the sample. Rows whose run list does
/// not hold exactly three scores are left out.
pub fn compute_random_cohens_kappa<R: Rng + ?Sized>(
    sample: &ScoreTable,
    dims: &[Dimension],
    rng: &mut R,
) -> Result<Vec<RandomKappa>> {
    sample.require_runs(dims)?;

    let mut out = Vec::with_capacity(dims.len());
    for &dim in dims {
        let picked = index::sample(rng, RUNS_PER_ITEM, 2);
        let (r1, r2) = (picked.index(0), picked.index(1));

        let (first, second): (Vec<i64>, Vec<i64>) = sample
            .rows()
            .iter()
            .filter_map(|row| row.runs(dim))
            .filter(|runs| runs.len() == RUNS_PER_ITEM)
            .map(|runs| (runs[r1], runs[r2]))
            .unzip();

        let skipped = sample.len() - first.len();
        if skipped > 0 {
            log::warn!("{dim}: skipped {skipped} rows without exactly {RUNS_PER_ITEM} runs");
        }
        out.push(RandomKappa {
            dimension: dim,
            runs: (r1, r2),
            kappa: cohen_kappa(&first, &second),
        });
    }
    Ok(out)
}
