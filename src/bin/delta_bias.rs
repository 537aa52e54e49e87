/*
cargo run --release --bin delta_bias -- \
  --original data/human_labels.csv \
  --llm output/llama3.1/unbiased.csv \
  --female output/llama3.1/bias_female.csv \
  --male output/llama3.1/bias_male.csv \
  --output output/llama3.1/delta_bias.csv
*/

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use argq_annotate::{
    logging,
    metrics::{
        delta::DimensionDelta, merge_annotations_for_delta, BiasLabel, DeltaSources,
    },
    report::{create_csv, write_delta_table},
    table::ScoreTable,
    Dimension,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Join human, unbiased and bias-injected annotations, label the drift")]
struct Cli {
    #[arg(long)]
    original: PathBuf,

    #[arg(long)]
    llm: PathBuf,

    #[arg(long)]
    female: PathBuf,

    #[arg(long)]
    male: PathBuf,

    #[arg(long)]
    output: PathBuf,

    #[arg(long, value_delimiter = ',', default_values_t = Dimension::ALL.to_vec())]
    dimensions: Vec<Dimension>,

    /// Fail instead of discarding rows with duplicate composite keys
    #[arg(long)]
    strict: bool,
}

fn load(path: &Path) -> Result<ScoreTable> {
    ScoreTable::read(path).with_context(|| format!("reading {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&logging::stem_of(&cli.output, "delta_bias"))?;

    let original = load(&cli.original)?;
    let llm = load(&cli.llm)?;
    let female = load(&cli.female)?;
    let male = load(&cli.male)?;
    let sources = DeltaSources {
        original: &original,
        llm: &llm,
        female: &female,
        male: &male,
    };

    let merged = merge_annotations_for_delta(sources, &cli.dimensions)?;
    if cli.strict {
        merged.ensure_unique(&sources)?;
    }
    log::info!(
        "joined {} of {} original rows ({} duplicate keys discarded)",
        merged.rows.len(),
        original.len(),
        merged.duplicates.total()
    );

    for (i, &dim) in merged.dimensions.iter().enumerate() {
        let count = |pick: fn(&DimensionDelta) -> Option<BiasLabel>, label: BiasLabel| {
            merged
                .rows
                .iter()
                .filter(|r| pick(&r.dimensions[i]) == Some(label))
                .count()
        };
        log::info!(
            "{dim}: female +{} -{} ={} | male +{} -{} ={}",
            count(|d| d.female_label(), BiasLabel::Positive),
            count(|d| d.female_label(), BiasLabel::Negative),
            count(|d| d.female_label(), BiasLabel::Neutral),
            count(|d| d.male_label(), BiasLabel::Positive),
            count(|d| d.male_label(), BiasLabel::Negative),
            count(|d| d.male_label(), BiasLabel::Neutral),
        );
    }

    let mut wtr = create_csv(&cli.output)?;
    write_delta_table(&mut wtr, &merged)?;
    println!("Delta bias table saved to {}", cli.output.display());
    Ok(())
}
