//! Summary tables written by the metric binaries.

use std::{fs, io::Write, path::Path};

use crate::{
    dimension::Dimension,
    error::Result,
    metrics::{
        delta::{evaluation, DeltaMerge},
        sampling::RandomKappa,
        AccuracyReport, DimensionStats,
    },
};

/// Round half to even at `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round_ties_even() / scale
}

/// Rounded value as a CSV cell; undefined values become an empty cell.
pub fn cell(value: f64, decimals: u32) -> String {
    if value.is_nan() {
        String::new()
    } else {
        round_to(value, decimals).to_string()
    }
}

fn opt_cell(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Open a CSV writer, creating parent directories as needed.
pub fn create_csv(path: &Path) -> Result<csv::Writer<fs::File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(csv::Writer::from_path(path)?)
}

/// Named scalars for a per-dimension summary row
pub fn stats_entries(stats: &DimensionStats) -> Vec<(String, f64)> {
    stats.iter().map(|(d, v)| (d.column().to_string(), *v)).collect()
}

pub fn accuracy_entries(report: &AccuracyReport) -> Vec<(String, f64)> {
    let mut entries = stats_entries(&report.per_dimension);
    entries.push(("Overall_Accuracy".to_string(), report.overall));
    entries
}

/// One row: `Model, Setting, <entry names...>`
pub fn write_dimension_summary<W: Write>(
    wtr: &mut csv::Writer<W>,
    model: &str,
    setting: &str,
    entries: &[(String, f64)],
    decimals: u32,
) -> Result<()> {
    let mut header = vec!["Model".to_string(), "Setting".to_string()];
    header.extend(entries.iter().map(|(name, _)| name.clone()));
    wtr.write_record(&header)?;

    let mut row = vec![model.to_string(), setting.to_string()];
    row.extend(entries.iter().map(|(_, v)| cell(*v, decimals)));
    wtr.write_record(&row)?;
    wtr.flush()?;
    Ok(())
}

pub fn write_random_kappa<W: Write>(
    wtr: &mut csv::Writer<W>,
    model: &str,
    setting: &str,
    results: &[RandomKappa],
    decimals: u32,
) -> Result<()> {
    wtr.write_record(["Model Name", "Setting", "Dimension", "Chosen Runs", "Kappa"])?;
    for r in results {
        wtr.write_record([
            model.to_string(),
            setting.to_string(),
            r.dimension.column().to_string(),
            r.chosen_runs(),
            cell(r.kappa, decimals),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// MBE, MAE and MAPE for one dimension
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ErrorRow {
    pub dimension: Dimension,
    pub mbe: f64,
    pub mae: f64,
    pub mape: f64,
}

pub fn error_rows(
    mbe: &DimensionStats,
    mae: &DimensionStats,
    mape: &DimensionStats,
) -> Vec<ErrorRow> {
    mbe.iter()
        .zip(mae)
        .zip(mape)
        .map(|((&(dimension, mbe), &(_, mae)), &(_, mape))| ErrorRow {
            dimension,
            mbe,
            mae,
            mape,
        })
        .collect()
}

/// Rows indexed by dimension
pub fn write_error_summary<W: Write>(
    wtr: &mut csv::Writer<W>,
    model: &str,
    setting: &str,
    rows: &[ErrorRow],
    decimals: u32,
) -> Result<()> {
    wtr.write_record([
        "Dimension",
        "Mean Bias Error",
        "Mean Absolute Error",
        "MAPE (%)",
        "model_name",
        "setting",
    ])?;
    for r in rows {
        wtr.write_record([
            r.dimension.column().to_string(),
            cell(r.mbe, decimals),
            cell(r.mae, decimals),
            cell(r.mape, decimals),
            model.to_string(),
            setting.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn delta_header(dims: &[Dimension]) -> Vec<String> {
    let mut header = vec![
        "argQ_id".to_string(),
        "claim_text".to_string(),
        "premise_texts".to_string(),
    ];
    for d in dims {
        let c = d.column();
        header.extend([
            format!("{c}_orig"),
            format!("{c}_llm"),
            format!("{c}_llm_female"),
            format!("{c}_llm_male"),
            format!("{c}_female_llm_delta"),
            format!("{c}_male_llm_delta"),
            format!("{c}_llm_female_evals"),
            format!("{c}_llm_male_evals"),
        ]);
    }
    header
}

pub fn write_delta_table<W: Write>(wtr: &mut csv::Writer<W>, merged: &DeltaMerge) -> Result<()> {
    wtr.write_record(delta_header(&merged.dimensions))?;
    for row in &merged.rows {
        let mut rec = vec![row.arg_id.clone(), row.claim_text.clone(), row.premise_texts.clone()];
        for d in &row.dimensions {
            rec.extend([
                opt_cell(d.original),
                opt_cell(d.llm),
                opt_cell(d.llm_female),
                opt_cell(d.llm_male),
                opt_cell(d.female_delta),
                opt_cell(d.male_delta),
                evaluation(d.llm_female, d.female_label()),
                evaluation(d.llm_male, d.male_label()),
            ]);
        }
        wtr.write_record(&rec)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(f: impl FnOnce(&mut csv::Writer<Vec<u8>>) -> Result<()>) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        f(&mut wtr).unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn rounding_is_half_to_even() {
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(2.0 / 3.0, 3), 0.667);
        assert_eq!(cell(f64::NAN, 2), "");
        assert_eq!(cell(1.0, 2), "1");
    }

    #[test]
    fn accuracy_summary_row() {
        let report = AccuracyReport {
            per_dimension: vec![(Dimension::Strength, 0.5), (Dimension::Objectivity, 2.0 / 3.0)],
            overall: 0.58333,
        };
        let entries = accuracy_entries(&report);
        let out = written(|w| write_dimension_summary(w, "llama3.1", "unbiased", &entries, 2));
        assert_eq!(
            out,
            "Model,Setting,STRONG,OBJECTIVE,Overall_Accuracy\nllama3.1,unbiased,0.5,0.67,0.58\n"
        );
    }

    #[test]
    fn error_summary_is_indexed_by_dimension() {
        let mbe = vec![(Dimension::Strength, -0.25)];
        let mae = vec![(Dimension::Strength, 0.5)];
        let mape = vec![(Dimension::Strength, f64::NAN)];
        let rows = error_rows(&mbe, &mae, &mape);
        let out = written(|w| write_error_summary(w, "m", "bias_female", &rows, 2));
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[1], "STRONG,-0.25,0.5,,m,bias_female");
    }

    #[test]
    fn delta_header_suffixes() {
        let h = delta_header(&[Dimension::Objectivity]);
        assert_eq!(h.len(), 3 + 8);
        assert_eq!(h[3], "OBJECTIVE_orig");
        assert_eq!(h[10], "OBJECTIVE_llm_male_evals");
    }
}
