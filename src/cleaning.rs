use std::io::{Read, Write};

use crate::{
    dimension::Dimension,
    error::{Error, Result},
    table::parse_score,
};

/// Validation counts gathered while cleaning consensus columns
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CleaningReport {
    pub rows: usize,
    /// Cells that held something other than a whole number (before rounding)
    pub non_integer: usize,
    /// Cleaned values outside their dimension's range
    pub out_of_range: usize,
    /// Empty cells per dimension after cleaning
    pub missing: Vec<(Dimension, usize)>,
}

impl CleaningReport {
    pub fn all_integers(&self) -> bool {
        self.non_integer == 0
    }

    pub fn all_in_range(&self) -> bool {
        self.out_of_range == 0
    }
}

/// Rewrite the consensus columns of a table as rounded integers, keeping
/// every other column untouched. Non-numeric cells become empty.
pub fn clean_scores<R: Read, W: Write>(
    name: &str,
    reader: R,
    writer: W,
    dims: &[Dimension],
) -> Result<CleaningReport> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let columns: Vec<(Dimension, usize)> = dims
        .iter()
        .map(|&d| {
            headers
                .iter()
                .position(|h| h == d.column())
                .map(|i| (d, i))
                .ok_or_else(|| Error::missing_column(d.column(), name))
        })
        .collect::<Result<_>>()?;

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&headers)?;

    let mut report = CleaningReport {
        missing: dims.iter().map(|&d| (d, 0)).collect(),
        ..CleaningReport::default()
    };
    for rec in rdr.records() {
        let rec = rec?;
        let mut out: Vec<String> = rec.iter().map(str::to_owned).collect();
        for (slot, &(dim, at)) in columns.iter().enumerate() {
            let raw = rec.get(at).unwrap_or_default();
            let cleaned = parse_score(raw);
            let was_integer = raw.trim().parse::<f64>().is_ok_and(|f| f.fract() == 0.0);
            match cleaned {
                Some(v) => {
                    if !was_integer {
                        report.non_integer += 1;
                    }
                    if !dim.in_range(v) {
                        report.out_of_range += 1;
                    }
                    out[at] = v.to_string();
                }
                None => {
                    if !raw.trim().is_empty() && !raw.trim().eq_ignore_ascii_case("nan") {
                        report.non_integer += 1;
                    }
                    report.missing[slot].1 += 1;
                    out[at] = String::new();
                }
            }
        }
        wtr.write_record(&out)?;
        report.rows += 1;
    }
    wtr.flush()?;
    Ok(report)
}
