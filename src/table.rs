//! CSV tables: argument inputs, annotated outputs and the generic score
//! tables the metrics read back.

use std::{
    fs,
    io::{Read, Write},
    path::Path,
};

use serde::Deserialize;
use serde_json::Value;

use crate::{
    aggregate::{consensus, RunSets},
    dimension::{Dimension, DIMENSION_COUNT},
    error::{Error, Result},
};

pub const ARG_ID: &str = "argQ_id";
pub const CLAIM_TEXT: &str = "claim_text";
pub const PREMISE_TEXTS: &str = "premise_texts";
pub const COMPANY_NAME: &str = "company_name";

const REQUIRED_INPUT: [&str; 4] = [ARG_ID, CLAIM_TEXT, PREMISE_TEXTS, COMPANY_NAME];

/// One argument to be annotated
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgumentRecord {
    pub arg_id: String,
    pub claim_text: String,
    pub premise_texts: String,
    pub company_name: String,
}

#[derive(Debug, Deserialize)]
struct InputRow {
    #[serde(rename = "argQ_id")]
    arg_id: Option<String>,
    claim_text: Option<String>,
    premise_texts: Option<String>,
    company_name: Option<String>,
}

impl InputRow {
    fn complete(self) -> Option<ArgumentRecord> {
        let keep = |v: Option<String>| v.filter(|s| !is_null(s));
        Some(ArgumentRecord {
            arg_id: keep(self.arg_id)?,
            claim_text: keep(self.claim_text)?,
            premise_texts: keep(self.premise_texts)?,
            company_name: keep(self.company_name)?,
        })
    }
}

/// An argument together with its raw runs and consensus scores
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatedRecord {
    pub argument: ArgumentRecord,
    pub runs: RunSets,
}

impl AnnotatedRecord {
    pub fn consensus(&self, dim: Dimension) -> Option<i64> {
        consensus(dim, self.runs.get(dim))
    }
}

fn is_null(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || t.eq_ignore_ascii_case("nan")
}

/// Read the argument table, dropping rows with a null in any required column.
pub fn read_arguments(path: &Path) -> Result<Vec<ArgumentRecord>> {
    let file = fs::File::open(path)?;
    read_arguments_from(&path.display().to_string(), file)
}

pub fn read_arguments_from<R: Read>(name: &str, reader: R) -> Result<Vec<ArgumentRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    for col in REQUIRED_INPUT {
        if !headers.iter().any(|h| h == col) {
            return Err(Error::missing_column(col, name));
        }
    }

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for row in rdr.deserialize::<InputRow>() {
        match row?.complete() {
            Some(r) => records.push(r),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        log::info!("dropped {dropped} rows with missing values from {name}");
    }
    Ok(records)
}

pub fn format_runs(runs: &[i64]) -> String {
    let inner = runs.iter().map(i64::to_string).collect::<Vec<_>>().join(", ");
    format!("[{inner}]")
}

/// Parse a bracketed run list such as `[2, 1, 2]`. Anything that is not a
/// list of whole numbers yields `None`.
pub fn parse_run_list(field: &str) -> Option<Vec<i64>> {
    let items: Vec<Value> = serde_json::from_str(field.trim()).ok()?;
    items
        .iter()
        .map(|v| {
            v.as_i64().or_else(|| {
                v.as_f64()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| f as i64)
            })
        })
        .collect()
}

/// Parse a consensus cell, coercing floats to the nearest integer
/// (half to even). Empty, `NaN` and non-numeric cells are `None`.
pub fn parse_score(field: &str) -> Option<i64> {
    let f: f64 = field.trim().parse().ok()?;
    if !f.is_finite() {
        return None;
    }
    Some(f.round_ties_even() as i64)
}

fn score_cell(score: Option<i64>) -> String {
    score.map(|s| s.to_string()).unwrap_or_default()
}

pub fn annotated_header() -> Vec<&'static str> {
    let mut header = REQUIRED_INPUT.to_vec();
    header.extend(Dimension::ALL.iter().map(|d| d.runs_column()));
    header.extend(Dimension::ALL.iter().map(|d| d.column()));
    header
}

pub fn write_annotated_to<W: Write>(writer: W, records: &[AnnotatedRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(annotated_header())?;
    for rec in records {
        let arg = &rec.argument;
        let mut row = vec![
            arg.arg_id.clone(),
            arg.claim_text.clone(),
            arg.premise_texts.clone(),
            arg.company_name.clone(),
        ];
        row.extend(Dimension::ALL.iter().map(|&d| format_runs(rec.runs.get(d))));
        row.extend(Dimension::ALL.iter().map(|&d| score_cell(rec.consensus(d))));
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the annotated table, creating parent directories as needed.
pub fn write_annotated(path: &Path, records: &[AnnotatedRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_annotated_to(fs::File::create(path)?, records)
}

/// A row of any scored table: human labels or LLM annotations
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreRow {
    pub arg_id: Option<String>,
    pub claim_text: Option<String>,
    pub premise_texts: Option<String>,
    pub company_name: Option<String>,
    scores: [Option<i64>; DIMENSION_COUNT],
    runs: [Option<Vec<i64>>; DIMENSION_COUNT],
}

impl ScoreRow {
    pub fn new(arg_id: impl Into<String>) -> Self {
        Self {
            arg_id: Some(arg_id.into()),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, claim: impl Into<String>, premises: impl Into<String>) -> Self {
        self.claim_text = Some(claim.into());
        self.premise_texts = Some(premises.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company_name = Some(company.into());
        self
    }

    pub fn with_score(mut self, dim: Dimension, score: Option<i64>) -> Self {
        self.scores[dim.index()] = score;
        self
    }

    pub fn with_runs(mut self, dim: Dimension, runs: Vec<i64>) -> Self {
        self.runs[dim.index()] = Some(runs);
        self
    }

    pub fn score(&self, dim: Dimension) -> Option<i64> {
        self.scores[dim.index()]
    }

    pub fn runs(&self, dim: Dimension) -> Option<&[i64]> {
        self.runs[dim.index()].as_deref()
    }

    /// `premise_texts + "_" + argQ_id + "_" + claim_text`
    pub fn composite_key(&self) -> Option<String> {
        Some(format!(
            "{}_{}_{}",
            self.premise_texts.as_deref()?,
            self.arg_id.as_deref()?,
            self.claim_text.as_deref()?
        ))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScoreTable {
    name: String,
    headers: Vec<String>,
    rows: Vec<ScoreRow>,
}

impl ScoreTable {
    /// Build a table in memory; every key, consensus and run column is
    /// treated as present.
    pub fn from_rows(name: impl Into<String>, rows: Vec<ScoreRow>) -> Self {
        Self {
            name: name.into(),
            headers: annotated_header().into_iter().map(String::from).collect(),
            rows,
        }
    }

    pub fn from_annotated(name: impl Into<String>, records: &[AnnotatedRecord]) -> Self {
        let rows = records
            .iter()
            .map(|rec| {
                let arg = &rec.argument;
                let mut row = ScoreRow::new(arg.arg_id.clone())
                    .with_text(arg.claim_text.clone(), arg.premise_texts.clone())
                    .with_company(arg.company_name.clone());
                for dim in Dimension::ALL {
                    row = row
                        .with_score(dim, rec.consensus(dim))
                        .with_runs(dim, rec.runs.get(dim).to_vec());
                }
                row
            })
            .collect();
        Self::from_rows(name, rows)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        Self::from_reader(path.display().to_string(), file)
    }

    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();
        let position = |col: &str| headers.iter().position(|h| h == col);

        let id_at = position(ARG_ID);
        let claim_at = position(CLAIM_TEXT);
        let premise_at = position(PREMISE_TEXTS);
        let company_at = position(COMPANY_NAME);
        let score_at = Dimension::ALL.map(|d| position(d.column()));
        let runs_at = Dimension::ALL.map(|d| position(d.runs_column()));

        let mut rows = Vec::new();
        for rec in rdr.records() {
            let rec = rec?;
            let text = |at: Option<usize>| {
                at.and_then(|i| rec.get(i))
                    .filter(|s| !is_null(s))
                    .map(str::to_owned)
            };
            let mut row = ScoreRow {
                arg_id: text(id_at),
                claim_text: text(claim_at),
                premise_texts: text(premise_at),
                company_name: text(company_at),
                ..ScoreRow::default()
            };
            for dim in Dimension::ALL {
                let i = dim.index();
                row.scores[i] = score_at[i].and_then(|at| rec.get(at)).and_then(parse_score);
                row.runs[i] = runs_at[i].and_then(|at| rec.get(at)).and_then(parse_run_list);
            }
            rows.push(row);
        }
        Ok(Self {
            name: name.into(),
            headers,
            rows,
        })
    }

    /// Same name and columns, different rows
    pub fn with_rows(&self, rows: Vec<ScoreRow>) -> Self {
        Self {
            name: self.name.clone(),
            headers: self.headers.clone(),
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[ScoreRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    pub fn require_column(&self, column: &str) -> Result<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(Error::missing_column(column, &self.name))
        }
    }

    pub fn require_scores(&self, dims: &[Dimension]) -> Result<()> {
        dims.iter().try_for_each(|d| self.require_column(d.column()))
    }

    pub fn require_runs(&self, dims: &[Dimension]) -> Result<()> {
        dims.iter().try_for_each(|d| self.require_column(d.runs_column()))
    }
}
