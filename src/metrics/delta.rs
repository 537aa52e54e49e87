use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use crate::{
    dimension::Dimension,
    error::{Error, Result},
    table::{ScoreRow, ScoreTable, ARG_ID, CLAIM_TEXT, PREMISE_TEXTS},
};

/// Direction of a biased score relative to the unbiased LLM score
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BiasLabel {
    Positive,
    Negative,
    Neutral,
}

impl BiasLabel {
    pub fn from_delta(delta: i64) -> Self {
        match delta {
            d if d > 0 => BiasLabel::Positive,
            d if d < 0 => BiasLabel::Negative,
            _ => BiasLabel::Neutral,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BiasLabel::Positive => "positive",
            BiasLabel::Negative => "negative",
            BiasLabel::Neutral => "neutral",
        }
    }

    pub fn commentary(self) -> &'static str {
        match self {
            BiasLabel::Positive => "positively biased",
            BiasLabel::Negative => "negatively biased",
            BiasLabel::Neutral => "neutral",
        }
    }
}

impl fmt::Display for BiasLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four tables joined by the delta computation
#[derive(Clone, Copy)]
pub struct DeltaSources<'a> {
    pub original: &'a ScoreTable,
    pub llm: &'a ScoreTable,
    pub female: &'a ScoreTable,
    pub male: &'a ScoreTable,
}

/// One dimension of a joined row, one field per source
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DimensionDelta {
    pub dimension: Dimension,
    pub original: Option<i64>,
    pub llm: Option<i64>,
    pub llm_female: Option<i64>,
    pub llm_male: Option<i64>,
    /// `llm_female - llm`
    pub female_delta: Option<i64>,
    /// `llm_male - llm`
    pub male_delta: Option<i64>,
}

impl DimensionDelta {
    fn new(dimension: Dimension, rows: [&ScoreRow; 4]) -> Self {
        let [original, llm, female, male] = rows.map(|r| r.score(dimension));
        let delta = |biased: Option<i64>| Some(biased? - llm?);
        Self {
            dimension,
            original,
            llm,
            llm_female: female,
            llm_male: male,
            female_delta: delta(female),
            male_delta: delta(male),
        }
    }

    pub fn female_label(&self) -> Option<BiasLabel> {
        self.female_delta.map(BiasLabel::from_delta)
    }

    pub fn male_label(&self) -> Option<BiasLabel> {
        self.male_delta.map(BiasLabel::from_delta)
    }
}

/// `"<score> (<commentary>)"`, empty when the score or delta is undefined
pub fn evaluation(score: Option<i64>, label: Option<BiasLabel>) -> String {
    match (score, label) {
        (Some(s), Some(l)) => format!("{s} ({})", l.commentary()),
        _ => String::new(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeltaRow {
    pub arg_id: String,
    pub claim_text: String,
    pub premise_texts: String,
    pub dimensions: Vec<DimensionDelta>,
}

/// Duplicate composite keys discarded per source
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SourceCounts {
    pub original: usize,
    pub llm: usize,
    pub female: usize,
    pub male: usize,
}

impl SourceCounts {
    pub fn total(&self) -> usize {
        self.original + self.llm + self.female + self.male
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeltaMerge {
    pub dimensions: Vec<Dimension>,
    pub rows: Vec<DeltaRow>,
    pub duplicates: SourceCounts,
}

impl DeltaMerge {
    /// Fail if any source had colliding composite keys
    pub fn ensure_unique(&self, sources: &DeltaSources<'_>) -> Result<()> {
        let d = &self.duplicates;
        for (count, table) in [
            (d.original, sources.original),
            (d.llm, sources.llm),
            (d.female, sources.female),
            (d.male, sources.male),
        ] {
            if count > 0 {
                return Err(Error::DuplicateKeys {
                    table: table.name().to_string(),
                    count,
                });
            }
        }
        Ok(())
    }
}

/// Keep the first row per composite key; returns (rows in order, duplicates).
fn dedup(table: &ScoreTable) -> (Vec<(String, &ScoreRow)>, usize) {
    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(table.len());
    let mut duplicates = 0usize;
    let mut unkeyed = 0usize;
    for row in table.rows() {
        let Some(key) = row.composite_key() else {
            unkeyed += 1;
            continue;
        };
        if seen.insert(key.clone()) {
            rows.push((key, row));
        } else {
            duplicates += 1;
        }
    }
    if unkeyed > 0 {
        log::warn!("{}: skipped {unkeyed} rows with an incomplete composite key", table.name());
    }
    if duplicates > 0 {
        log::warn!(
            "{}: {duplicates} rows share a composite key with an earlier row and were discarded",
            table.name()
        );
    }
    (rows, duplicates)
}

fn require_join_columns(table: &ScoreTable, dims: &[Dimension]) -> Result<()> {
    for col in [ARG_ID, CLAIM_TEXT, PREMISE_TEXTS] {
        table.require_column(col)?;
    }
    table.require_scores(dims)
}

/// Inner-join the original labels, the unbiased LLM run and both
/// bias-injected runs on `premise_texts_argQ_id_claim_text`, then compute
/// the signed female and male deltas against the unbiased LLM score.
///
/// Output rows follow the order of `original`.
pub fn merge_annotations_for_delta(
    sources: DeltaSources<'_>,
    dims: &[Dimension],
) -> Result<DeltaMerge> {
    for table in [sources.original, sources.llm, sources.female, sources.male] {
        require_join_columns(table, dims)?;
    }

    let (original, dup_orig) = dedup(sources.original);
    let (llm, dup_llm) = dedup(sources.llm);
    let (female, dup_female) = dedup(sources.female);
    let (male, dup_male) = dedup(sources.male);

    let llm: HashMap<_, _> = llm.into_iter().collect();
    let female: HashMap<_, _> = female.into_iter().collect();
    let male: HashMap<_, _> = male.into_iter().collect();

    let rows = original
        .into_iter()
        .filter_map(|(key, orig)| {
            let joined = [orig, *llm.get(&key)?, *female.get(&key)?, *male.get(&key)?];
            Some(DeltaRow {
                arg_id: orig.arg_id.clone().unwrap_or_default(),
                claim_text: orig.claim_text.clone().unwrap_or_default(),
                premise_texts: orig.premise_texts.clone().unwrap_or_default(),
                dimensions: dims.iter().map(|&d| DimensionDelta::new(d, joined)).collect(),
            })
        })
        .collect();

    Ok(DeltaMerge {
        dimensions: dims.to_vec(),
        rows,
        duplicates: SourceCounts {
            original: dup_orig,
            llm: dup_llm,
            female: dup_female,
            male: dup_male,
        },
    })
}
