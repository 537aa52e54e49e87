use std::{fmt, str::FromStr};

/// Number of dimensions every annotation carries
pub const DIMENSION_COUNT: usize = 4;

/// The four argument-quality dimensions rated by the annotator.
///
/// Each dimension has three names: the label the model answers with
/// (`Strength:`), the public consensus column (`STRONG`) and the column
/// holding the raw run sequence (`Strength_runs`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Strength,
    Specificity,
    Persuasiveness,
    Objectivity,
}

impl Dimension {
    pub const ALL: [Dimension; DIMENSION_COUNT] = [
        Dimension::Strength,
        Dimension::Specificity,
        Dimension::Persuasiveness,
        Dimension::Objectivity,
    ];

    pub fn index(self) -> usize {
        match self {
            Dimension::Strength => 0,
            Dimension::Specificity => 1,
            Dimension::Persuasiveness => 2,
            Dimension::Objectivity => 3,
        }
    }

    /// Label as it appears in the rubric and in model responses
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Strength => "Strength",
            Dimension::Specificity => "Specificity",
            Dimension::Persuasiveness => "Persuasiveness",
            Dimension::Objectivity => "Objectivity",
        }
    }

    /// Consensus column name in annotated and human-labelled tables
    pub fn column(self) -> &'static str {
        match self {
            Dimension::Strength => "STRONG",
            Dimension::Specificity => "SPECIFIC",
            Dimension::Persuasiveness => "PERSUASIVE",
            Dimension::Objectivity => "OBJECTIVE",
        }
    }

    pub fn runs_column(self) -> &'static str {
        match self {
            Dimension::Strength => "Strength_runs",
            Dimension::Specificity => "Specificity_runs",
            Dimension::Persuasiveness => "Persuasiveness_runs",
            Dimension::Objectivity => "Objectivity_runs",
        }
    }

    /// Highest valid score; the lowest is always 0.
    pub fn max_score(self) -> i64 {
        match self {
            Dimension::Objectivity => 1,
            _ => 2,
        }
    }

    pub fn in_range(self, score: i64) -> bool {
        (0..=self.max_score()).contains(&score)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Dimension::ALL
            .into_iter()
            .find(|d| {
                d.column().eq_ignore_ascii_case(wanted) || d.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| {
                format!(
                    "unknown dimension {wanted} (expected STRONG, SPECIFIC, PERSUASIVE or OBJECTIVE)"
                )
            })
    }
}
