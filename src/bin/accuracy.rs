/*
cargo run --release --bin accuracy -- \
  --ground-truth data/human_labels.csv \
  --predictions output/llama3.1/unbiased.csv \
  --output output/llama3.1/accuracy_unbiased.csv \
  --model llama3.1 --setting unbiased
*/

use std::path::PathBuf;

use anyhow::{Context, Result};
use argq_annotate::{
    logging,
    metrics::compute_accuracy,
    report::{accuracy_entries, create_csv, write_dimension_summary},
    table::ScoreTable,
    Dimension,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Exact-match accuracy of LLM consensus scores against human labels")]
struct Cli {
    #[arg(long)]
    ground_truth: PathBuf,

    #[arg(long)]
    predictions: PathBuf,

    /// Summary CSV path
    #[arg(long)]
    output: PathBuf,

    #[arg(long)]
    model: String,

    #[arg(long, default_value = "unbiased")]
    setting: String,

    #[arg(long, value_delimiter = ',', default_values_t = Dimension::ALL.to_vec())]
    dimensions: Vec<Dimension>,

    #[arg(long, default_value_t = 2)]
    decimals: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&logging::stem_of(&cli.output, "accuracy"))?;

    let truth = ScoreTable::read(&cli.ground_truth)
        .with_context(|| format!("reading {}", cli.ground_truth.display()))?;
    let preds = ScoreTable::read(&cli.predictions)
        .with_context(|| format!("reading {}", cli.predictions.display()))?;

    let report = compute_accuracy(&truth, &preds, &cli.dimensions)?;
    for (dim, acc) in &report.per_dimension {
        log::info!("{dim}: {acc:.3}");
    }
    log::info!("Overall_Accuracy: {:.3}", report.overall);

    let mut wtr = create_csv(&cli.output)?;
    let entries = accuracy_entries(&report);
    write_dimension_summary(&mut wtr, &cli.model, &cli.setting, &entries, cli.decimals)?;
    println!("Accuracy results saved to {}", cli.output.display());
    Ok(())
}
